// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          hash::{Hash, Hasher},
          sync::{Arc, Mutex, MutexGuard, PoisonError,
                 atomic::{AtomicU64, Ordering}}};

use tokio::sync::oneshot;

use crate::{Completion, DeepLinkStrategy, DestinationId, Guard, LayoutKey, NavError,
            NavigatorResult, PendingResult, Redirect};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(0);

/// Where a destination is in its lifecycle: created → bound to one path → settled.
#[derive(Debug)]
enum Binding {
    Unbound,
    Bound(oneshot::Sender<Completion>),
    Settled,
}

/// Optional, composable behaviors attached to a destination. Each pipeline step checks
/// for the one it cares about.
#[derive(Clone, Default)]
pub struct Capabilities {
    /// *redirectable*: consulted by the redirect resolver before display.
    pub redirect: Option<Arc<dyn Redirect>>,
    /// *guarded*: consulted before a normal pop removes this destination.
    pub guard: Option<Arc<dyn Guard>>,
    /// *is-a-layout*: this destination owns the child path for this key.
    pub layout: Option<LayoutKey>,
    /// How deep link recovery dispatches this destination.
    pub link_strategy: Option<DeepLinkStrategy>,
}

impl Debug for Capabilities {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("redirect", &self.redirect.is_some())
            .field("guard", &self.guard.is_some())
            .field("layout", &self.layout)
            .field("link_strategy", &self.link_strategy)
            .finish()
    }
}

#[derive(Debug)]
struct DestinationRecord {
    id: DestinationId,
    instance_id: u64,
    parent: Option<LayoutKey>,
    external_link: Option<String>,
    capabilities: Capabilities,
    binding: Mutex<Binding>,
}

/// "A place the user can be". This is a cheap to clone handle to a shared record, so the
/// same instance can sit in a [`crate::Path`] and in a snapshot at the same time.
///
/// - Equality (and hashing) is by [`DestinationId`].
/// - Instance identity is by [`Destination::same_instance`].
///
/// A destination is bound to at most one path, and its completion handle is settled
/// exactly once. After that it is detached and binding it again is an error.
#[derive(Clone)]
pub struct Destination {
    record: Arc<DestinationRecord>,
}

impl Destination {
    /// Plain destination with no parent and no capabilities.
    pub fn new(id: impl Into<DestinationId>) -> Self { Self::builder(id).build() }

    pub fn builder(id: impl Into<DestinationId>) -> DestinationBuilder {
        DestinationBuilder {
            id: id.into(),
            parent: None,
            external_link: None,
            capabilities: Capabilities::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &DestinationId { &self.record.id }

    /// Process-unique number of this instance. Equal destinations have different instance
    /// ids unless they are clones of the same handle.
    #[must_use]
    pub fn instance_id(&self) -> u64 { self.record.instance_id }

    #[must_use]
    pub fn parent(&self) -> Option<&LayoutKey> { self.record.parent.as_ref() }

    #[must_use]
    pub fn external_link(&self) -> Option<&str> { self.record.external_link.as_deref() }

    #[must_use]
    pub fn capabilities(&self) -> &Capabilities { &self.record.capabilities }

    #[must_use]
    pub fn redirect(&self) -> Option<&Arc<dyn Redirect>> {
        self.record.capabilities.redirect.as_ref()
    }

    #[must_use]
    pub fn guard(&self) -> Option<&Arc<dyn Guard>> { self.record.capabilities.guard.as_ref() }

    /// Key of the child path this destination is the layout for, if it is a layout.
    #[must_use]
    pub fn layout_key(&self) -> Option<&LayoutKey> { self.record.capabilities.layout.as_ref() }

    #[must_use]
    pub fn is_layout(&self) -> bool { self.layout_key().is_some() }

    #[must_use]
    pub fn link_strategy(&self) -> Option<&DeepLinkStrategy> {
        self.record.capabilities.link_strategy.as_ref()
    }

    #[must_use]
    pub fn same_instance(&self, other: &Destination) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }

    #[must_use]
    pub fn is_bound(&self) -> bool { matches!(*self.binding(), Binding::Bound(_)) }

    #[must_use]
    pub fn is_settled(&self) -> bool { matches!(*self.binding(), Binding::Settled) }

    /// Check that [`Destination::bind`] would succeed, without binding.
    ///
    /// # Errors
    ///
    /// [`NavError::DestinationAlreadyBound`] or [`NavError::DestinationSettled`].
    pub fn ensure_bindable(&self) -> NavigatorResult<()> {
        match *self.binding() {
            Binding::Unbound => Ok(()),
            Binding::Bound(_) => Err(NavError::DestinationAlreadyBound {
                destination: self.id().to_string(),
            }
            .into()),
            Binding::Settled => Err(NavError::DestinationSettled {
                destination: self.id().to_string(),
            }
            .into()),
        }
    }

    /// Bind this destination to a path. Returns the receiving half of its completion
    /// handle.
    ///
    /// # Errors
    ///
    /// [`NavError::DestinationAlreadyBound`] or [`NavError::DestinationSettled`].
    pub(crate) fn bind(&self) -> NavigatorResult<PendingResult> {
        let mut binding = self.binding();
        match *binding {
            Binding::Unbound => {
                let (sender, pending) = PendingResult::new(self.id().clone());
                *binding = Binding::Bound(sender);
                Ok(pending)
            }
            Binding::Bound(_) => Err(NavError::DestinationAlreadyBound {
                destination: self.id().to_string(),
            }
            .into()),
            Binding::Settled => Err(NavError::DestinationSettled {
                destination: self.id().to_string(),
            }
            .into()),
        }
    }

    /// Settle the completion handle. Returns `false` if it was already settled, in which
    /// case nothing happens. A receiver that was dropped is not an error.
    pub(crate) fn settle(&self, completion: Completion) -> bool {
        let mut binding = self.binding();
        match std::mem::replace(&mut *binding, Binding::Settled) {
            Binding::Bound(sender) => {
                let _unused = sender.send(completion);
                true
            }
            Binding::Unbound => true,
            Binding::Settled => false,
        }
    }

    fn binding(&self) -> MutexGuard<'_, Binding> {
        self.record
            .binding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool { self.record.id == other.record.id }
}

impl Eq for Destination {}

impl Hash for Destination {
    fn hash<H: Hasher>(&self, state: &mut H) { self.record.id.hash(state); }
}

impl Debug for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Destination")
            .field("id", &self.record.id.to_string())
            .field("instance_id", &self.record.instance_id)
            .field("parent", &self.record.parent)
            .field("capabilities", &self.record.capabilities)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Destination`]s that carry a parent key, an external link or
/// capabilities.
///
/// ```
/// use r3bl_navigator::{Destination, LayoutKey};
///
/// let detail = Destination::builder("detail")
///     .parent(LayoutKey::new("search"))
///     .external_link("app://search/detail")
///     .build();
/// assert_eq!(detail.parent(), Some(&LayoutKey::new("search")));
/// ```
#[derive(Debug)]
pub struct DestinationBuilder {
    id: DestinationId,
    parent: Option<LayoutKey>,
    external_link: Option<String>,
    capabilities: Capabilities,
}

impl DestinationBuilder {
    #[must_use]
    pub fn parent(mut self, key: impl Into<LayoutKey>) -> Self {
        self.parent = Some(key.into());
        self
    }

    #[must_use]
    pub fn external_link(mut self, link: impl Into<String>) -> Self {
        self.external_link = Some(link.into());
        self
    }

    #[must_use]
    pub fn redirect(mut self, redirect: impl Redirect + 'static) -> Self {
        self.capabilities.redirect = Some(Arc::new(redirect));
        self
    }

    #[must_use]
    pub fn shared_redirect(mut self, redirect: Arc<dyn Redirect>) -> Self {
        self.capabilities.redirect = Some(redirect);
        self
    }

    #[must_use]
    pub fn guard(mut self, guard: impl Guard + 'static) -> Self {
        self.capabilities.guard = Some(Arc::new(guard));
        self
    }

    #[must_use]
    pub fn shared_guard(mut self, guard: Arc<dyn Guard>) -> Self {
        self.capabilities.guard = Some(guard);
        self
    }

    /// Mark the destination as the layout (container) for `key`.
    #[must_use]
    pub fn layout(mut self, key: impl Into<LayoutKey>) -> Self {
        self.capabilities.layout = Some(key.into());
        self
    }

    #[must_use]
    pub fn link_strategy(mut self, strategy: DeepLinkStrategy) -> Self {
        self.capabilities.link_strategy = Some(strategy);
        self
    }

    #[must_use]
    pub fn build(self) -> Destination {
        Destination {
            record: Arc::new(DestinationRecord {
                id: self.id,
                instance_id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
                parent: self.parent,
                external_link: self.external_link,
                capabilities: self.capabilities,
                binding: Mutex::new(Binding::Unbound),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_equality_is_by_id_not_instance() {
        let a = Destination::new(DestinationId::new("detail").with_arg("id", "1"));
        let b = Destination::new(DestinationId::new("detail").with_arg("id", "1"));
        assert_eq!(a, b);
        assert!(!a.same_instance(&b));
        assert!(a.same_instance(&a.clone()));
        assert!(a.instance_id() != b.instance_id());
    }

    #[tokio::test]
    async fn test_settles_exactly_once() {
        let home = Destination::new("home");
        let pending = home.bind().unwrap();
        assert!(home.is_bound());

        assert!(home.settle(Completion::Result(Some(serde_json::json!(42)))));
        assert!(!home.settle(Completion::Discarded));
        assert!(home.is_settled());

        assert_eq!(
            pending.wait().await,
            Completion::Result(Some(serde_json::json!(42)))
        );
    }

    #[test]
    fn test_lifecycle_errors() {
        let home = Destination::new("home");
        let _pending = home.bind().unwrap();

        let err = home.bind().unwrap_err();
        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::DestinationAlreadyBound {
                destination: "home".into()
            })
        );

        home.settle(Completion::Discarded);
        let err = home.ensure_bindable().unwrap_err();
        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::DestinationSettled {
                destination: "home".into()
            })
        );
    }

    #[tokio::test]
    async fn test_dropped_destination_resolves_as_discarded() {
        let pending = {
            let home = Destination::new("home");
            home.bind().unwrap()
        };
        assert_eq!(pending.wait().await, Completion::Discarded);
    }
}
