// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod guard_api;

// Re-export.
pub use guard_api::*;
