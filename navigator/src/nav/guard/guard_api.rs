// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use async_trait::async_trait;

use crate::{Destination, NavigatorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny,
}

impl From<bool> for GuardDecision {
    fn from(allow: bool) -> Self { if allow { Self::Allow } else { Self::Deny } }
}

/// The *guarded* capability. Consulted only before the **normal** pop of a mutable path
/// removes this destination. Resets, replace-all, declared-stack edits and teardown never
/// consult it.
///
/// A [`GuardDecision::Deny`] leaves the path untouched. If the host showed the removal
/// optimistically (eg: a swipe back gesture), it should resynchronize from
/// [`crate::Coordinator::snapshot`].
///
/// Same deadlock rule as [`crate::Redirect`]: do not call the coordinator's operations
/// from here.
#[async_trait]
pub trait Guard: Send + Sync {
    async fn may_remove(&self, destination: &Destination) -> miette::Result<GuardDecision>;
}

/// Adapter for a plain (sync) closure guard.
pub struct GuardFn<F>(F);

impl<F> std::fmt::Debug for GuardFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str("GuardFn") }
}

impl<F> GuardFn<F>
where
    F: Fn(&Destination) -> GuardDecision + Send + Sync,
{
    pub fn new(f: F) -> Self { Self(f) }
}

#[async_trait]
impl<F> Guard for GuardFn<F>
where
    F: Fn(&Destination) -> GuardDecision + Send + Sync,
{
    async fn may_remove(&self, destination: &Destination) -> miette::Result<GuardDecision> {
        Ok((self.0)(destination))
    }
}

/// `true` if `destination` may be popped. Destinations without a guard always may.
///
/// # Errors
///
/// Whatever the guard returned.
pub async fn check_may_remove(destination: &Destination) -> NavigatorResult<bool> {
    let Some(guard) = destination.guard().cloned() else {
        return Ok(true);
    };
    let decision = guard.may_remove(destination).await?;
    if decision == GuardDecision::Deny {
        tracing::debug!(message = "guard -> deny", destination = %destination.id());
    }
    Ok(decision == GuardDecision::Allow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unguarded_may_always_be_removed() {
        assert!(check_may_remove(&Destination::new("home")).await.unwrap());
    }

    #[tokio::test]
    async fn test_guard_decision_is_honored() {
        let editor = Destination::builder("editor")
            .guard(GuardFn::new(|_| GuardDecision::Deny))
            .build();
        assert!(!check_may_remove(&editor).await.unwrap());

        let viewer = Destination::builder("viewer")
            .guard(GuardFn::new(|_| true.into()))
            .build();
        assert!(check_may_remove(&viewer).await.unwrap());
    }
}
