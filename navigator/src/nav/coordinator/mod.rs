// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod coordinator_builder;
pub mod coordinator_impl;
pub mod deep_link;
pub mod nav_snapshot;
pub mod outcomes;

// Re-export.
pub use coordinator_builder::*;
pub use coordinator_impl::*;
pub use deep_link::*;
pub use nav_snapshot::*;
pub use outcomes::*;
