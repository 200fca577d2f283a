// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod nav_constants;
pub mod nav_error;
pub mod navigator_config;

// Re-export.
pub use nav_constants::*;
pub use nav_error::*;
pub use navigator_config::*;
