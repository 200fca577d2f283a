// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEBUG_NAV_REDIRECT, Destination, NavError, NavSnapshot, NavigatorResult,
            RedirectContext, RedirectOutcome};

/// Substitutes destinations until one is stable.
///
/// ```text
/// candidate ─► redirectable? ─no─► Some(candidate)
///                  │yes
///                  ▼
///              redirect() ── Stable / same id ──► Some(candidate)
///                  │ Redirect(x)         │ Abort
///                  ▼                     ▼
///        depth += 1, candidate = x      None
/// ```
///
/// Every substitution increases the depth. Going past `max_depth` raises
/// [`NavError::RedirectCycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectResolver {
    pub max_depth: usize,
}

impl RedirectResolver {
    #[must_use]
    pub fn new(max_depth: usize) -> Self { Self { max_depth } }

    /// Returns `None` if a redirect aborted the operation.
    ///
    /// # Errors
    ///
    /// [`NavError::RedirectCycle`], or whatever a redirect hook returned.
    pub async fn resolve(
        &self,
        destination: Destination,
        snapshot: &NavSnapshot,
    ) -> NavigatorResult<Option<Destination>> {
        let mut candidate = destination;
        let mut depth = 0;

        loop {
            let Some(redirect) = candidate.redirect().cloned() else {
                return Ok(Some(candidate));
            };

            let ctx = RedirectContext {
                snapshot: snapshot.clone(),
                depth,
            };

            match redirect.redirect(&ctx, &candidate).await? {
                RedirectOutcome::Stable => return Ok(Some(candidate)),
                RedirectOutcome::Abort => {
                    DEBUG_NAV_REDIRECT.then(|| {
                        tracing::debug!(
                            message = "redirect -> abort",
                            candidate = %candidate.id(),
                            depth
                        );
                    });
                    return Ok(None);
                }
                RedirectOutcome::Redirect(next) if next == candidate => {
                    return Ok(Some(candidate));
                }
                RedirectOutcome::Redirect(next) => {
                    depth += 1;
                    DEBUG_NAV_REDIRECT.then(|| {
                        tracing::debug!(
                            message = "redirect -> substitute",
                            from = %candidate.id(),
                            to = %next.id(),
                            depth
                        );
                    });
                    if depth > self.max_depth {
                        return Err(NavError::RedirectCycle {
                            depth: self.max_depth,
                            last: next.id().to_string(),
                        }
                        .into());
                    }
                    candidate = next;
                }
            }
        }
    }
}

/// Convenience wrapper around [`RedirectResolver::resolve`].
///
/// # Errors
///
/// See [`RedirectResolver::resolve`].
pub async fn resolve_redirects(
    destination: Destination,
    snapshot: &NavSnapshot,
    max_depth: usize,
) -> NavigatorResult<Option<Destination>> {
    RedirectResolver::new(max_depth)
        .resolve(destination, snapshot)
        .await
}
