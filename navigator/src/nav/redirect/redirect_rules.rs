// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          sync::Arc};

use async_trait::async_trait;

use crate::{Destination, Redirect, RedirectContext, RedirectOutcome};

/// Result of a single [`RedirectRule`].
#[derive(Debug, Clone)]
pub enum RuleOutcome {
    /// This rule has nothing to say. Evaluate the next one.
    Continue,
    /// Abort the navigation operation.
    Stop,
    /// Substitute the candidate with this destination.
    RedirectTo(Destination),
}

/// One entry in an ordered [`RedirectRules`] list.
#[async_trait]
pub trait RedirectRule: Send + Sync {
    async fn evaluate(
        &self,
        ctx: &RedirectContext,
        candidate: &Destination,
    ) -> miette::Result<RuleOutcome>;
}

/// Ordered list of rules that together act as one [`Redirect`]. Rules run in the order
/// they were added and the first result that is not [`RuleOutcome::Continue`] wins.
///
/// ```
/// use r3bl_navigator::{Destination, RedirectRules, RuleFn, RuleOutcome};
///
/// let rules = RedirectRules::default()
///     .rule(RuleFn::new(|_ctx, _candidate| RuleOutcome::Continue))
///     .rule(RuleFn::new(|_ctx, _candidate| {
///         RuleOutcome::RedirectTo(Destination::new("login"))
///     }));
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct RedirectRules {
    rules: Vec<Arc<dyn RedirectRule>>,
}

impl RedirectRules {
    #[must_use]
    pub fn rule(mut self, rule: impl RedirectRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize { self.rules.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.rules.is_empty() }
}

impl Debug for RedirectRules {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RedirectRules({} rules)", self.rules.len())
    }
}

#[async_trait]
impl Redirect for RedirectRules {
    async fn redirect(
        &self,
        ctx: &RedirectContext,
        candidate: &Destination,
    ) -> miette::Result<RedirectOutcome> {
        for rule in &self.rules {
            match rule.evaluate(ctx, candidate).await? {
                RuleOutcome::Continue => continue,
                RuleOutcome::Stop => return Ok(RedirectOutcome::Abort),
                RuleOutcome::RedirectTo(it) => return Ok(RedirectOutcome::Redirect(it)),
            }
        }
        Ok(RedirectOutcome::Stable)
    }
}

/// Adapter for a plain (sync) closure rule.
pub struct RuleFn<F>(F);

impl<F> Debug for RuleFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str("RuleFn") }
}

impl<F> RuleFn<F>
where
    F: Fn(&RedirectContext, &Destination) -> RuleOutcome + Send + Sync,
{
    pub fn new(f: F) -> Self { Self(f) }
}

#[async_trait]
impl<F> RedirectRule for RuleFn<F>
where
    F: Fn(&RedirectContext, &Destination) -> RuleOutcome + Send + Sync,
{
    async fn evaluate(
        &self,
        ctx: &RedirectContext,
        candidate: &Destination,
    ) -> miette::Result<RuleOutcome> {
        Ok((self.0)(ctx, candidate))
    }
}

/// Adapter for a plain (sync) closure redirect.
pub struct RedirectFn<F>(F);

impl<F> Debug for RedirectFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str("RedirectFn") }
}

impl<F> RedirectFn<F>
where
    F: Fn(&RedirectContext, &Destination) -> RedirectOutcome + Send + Sync,
{
    pub fn new(f: F) -> Self { Self(f) }
}

#[async_trait]
impl<F> Redirect for RedirectFn<F>
where
    F: Fn(&RedirectContext, &Destination) -> RedirectOutcome + Send + Sync,
{
    async fn redirect(
        &self,
        ctx: &RedirectContext,
        candidate: &Destination,
    ) -> miette::Result<RedirectOutcome> {
        Ok((self.0)(ctx, candidate))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::NavSnapshot;

    fn ctx() -> RedirectContext {
        RedirectContext {
            snapshot: NavSnapshot::default(),
            depth: 0,
        }
    }

    #[tokio::test]
    async fn test_all_continue_is_stable() {
        let rules = RedirectRules::default()
            .rule(RuleFn::new(|_, _| RuleOutcome::Continue))
            .rule(RuleFn::new(|_, _| RuleOutcome::Continue));
        let outcome = rules.redirect(&ctx(), &Destination::new("home")).await.unwrap();
        assert!(matches!(outcome, RedirectOutcome::Stable));
    }

    #[tokio::test]
    async fn test_first_non_continue_short_circuits() {
        let evaluated_after_stop = Arc::new(AtomicUsize::new(0));
        let counter = evaluated_after_stop.clone();

        let rules = RedirectRules::default()
            .rule(RuleFn::new(|_, _| RuleOutcome::Continue))
            .rule(RuleFn::new(|_, _| RuleOutcome::Stop))
            .rule(RuleFn::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                RuleOutcome::RedirectTo(Destination::new("login"))
            }));

        let outcome = rules.redirect(&ctx(), &Destination::new("home")).await.unwrap();
        assert!(matches!(outcome, RedirectOutcome::Abort));
        assert_eq!(evaluated_after_stop.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_redirect_to_becomes_redirect() {
        let rules = RedirectRules::default()
            .rule(RuleFn::new(|_, _| RuleOutcome::RedirectTo(Destination::new("login"))));
        let outcome = rules.redirect(&ctx(), &Destination::new("home")).await.unwrap();
        let RedirectOutcome::Redirect(it) = outcome else {
            panic!("expected a redirect");
        };
        assert_eq!(it.id().name(), "login");
    }
}
