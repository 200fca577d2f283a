// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixtures shared by the unit tests, the integration tests and the doc examples.

// Attach sources.
pub mod destination_fixtures;
pub mod hook_fixtures;

// Re-export.
pub use destination_fixtures::*;
pub use hook_fixtures::*;
