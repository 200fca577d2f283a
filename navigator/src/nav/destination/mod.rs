// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod completion;
pub mod destination_id;
pub mod destination_impl;

// Re-export.
pub use completion::*;
pub use destination_id::*;
pub use destination_impl::*;
