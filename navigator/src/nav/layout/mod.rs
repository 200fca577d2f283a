// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod layout_instances;
pub mod layout_registry;
pub mod layout_resolver;

// Re-export.
pub use layout_instances::*;
pub use layout_registry::*;
pub use layout_resolver::*;
