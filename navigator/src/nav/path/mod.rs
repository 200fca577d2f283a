// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod path_arena;
pub mod path_impl;
pub mod path_types;

// Re-export.
pub use path_arena::*;
pub use path_impl::*;
pub use path_types::*;
