// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod redirect_api;
pub mod redirect_resolver;
pub mod redirect_rules;

// Re-export.
pub use redirect_api::*;
pub use redirect_resolver::*;
pub use redirect_rules::*;
