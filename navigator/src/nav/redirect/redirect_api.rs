// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use async_trait::async_trait;

use crate::{Destination, NavSnapshot};

/// What a [`Redirect`] decided for a candidate destination.
#[derive(Debug, Clone)]
pub enum RedirectOutcome {
    /// Show the candidate as is.
    Stable,
    /// Show this destination instead. Its own redirect capability is consulted next.
    /// Redirecting to a destination equal to the candidate counts as [`Self::Stable`].
    Redirect(Destination),
    /// Cancel the whole navigation operation. Nothing is mutated.
    Abort,
}

/// State handed to a [`Redirect`] while it decides.
#[derive(Debug, Clone)]
pub struct RedirectContext {
    /// Navigation state at the moment the operation started.
    pub snapshot: NavSnapshot,
    /// How many substitutions happened so far in this resolution (0 for the requested
    /// destination).
    pub depth: usize,
}

/// The *redirectable* capability. Consulted before a destination becomes visible.
///
/// This runs while the coordinator's operation gate is held. Calling back into the same
/// [`crate::Coordinator`]'s operations from here will deadlock. Read what you need from
/// [`RedirectContext::snapshot`] instead.
///
/// Errors returned from here reach the caller of the navigation operation unchanged.
#[async_trait]
pub trait Redirect: Send + Sync {
    async fn redirect(
        &self,
        ctx: &RedirectContext,
        candidate: &Destination,
    ) -> miette::Result<RedirectOutcome>;
}
