// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod coordinator;
pub mod destination;
pub mod guard;
pub mod layout;
pub mod path;
pub mod redirect;
pub mod stack_diff;

// Re-export.
pub use coordinator::*;
pub use destination::*;
pub use guard::*;
pub use layout::*;
pub use path::*;
pub use redirect::*;
pub use stack_diff::*;
