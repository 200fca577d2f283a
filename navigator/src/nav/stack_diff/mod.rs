// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod edit_script;
pub mod myers_diff;

// Re-export.
pub use edit_script::*;
pub use myers_diff::*;
