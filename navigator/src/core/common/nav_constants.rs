// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Enable or disable verbose tracing of the coordinator pipeline (resolve, layout plan,
/// commit, notify). Events are only emitted when this is `true`.
pub const DEBUG_NAV_PIPELINE: bool = false;

// Enable or disable verbose tracing of the individual subsystems.
pub const DEBUG_NAV_REDIRECT: bool = false;
pub const DEBUG_NAV_LAYOUT: bool = false;
pub const DEBUG_NAV_DIFF: bool = false;

/// Upper bound on the number of substitutions the redirect resolver performs for a single
/// operation before giving up with [`crate::NavError::RedirectCycle`].
pub const DEFAULT_MAX_REDIRECT_DEPTH: usize = 16;

/// Debug label given to the root [`crate::Path`] when none is configured.
pub const ROOT_PATH_LABEL: &str = "root";

/// File name used when a log path names a folder.
pub const DEFAULT_LOG_FILE_NAME: &str = "navigator.log";
