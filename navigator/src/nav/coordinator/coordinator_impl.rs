// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          sync::Arc};

use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use crate::{ActivationStrategy, Completion, CoordinatorId, DEBUG_NAV_PIPELINE,
            DeclaredOutcome, DeepLinkParser, DeepLinkStrategy, Destination, EnterOutcome,
            Layout, LayoutInstances, LayoutKey, LayoutRegistry, NavChange, NavError,
            NavListener, NavSnapshot, NavigatorConfig, NavigatorResult, PathArena, PathId,
            PathKind, PathSnapshot, PlannedContainer, PopOutcome, ReconcileOutcome,
            RecoverOutcome, RedirectResolver, ReplaceOutcome, RestorationEntry, ResultValue,
            check_may_remove, commit_layout_plan, diff, plan_layout_chain,
            plan_layout_chain_reusing};

/// Everything the operation gate protects.
#[derive(Debug)]
pub(crate) struct NavState {
    pub arena: PathArena,
    pub root: PathId,
    pub registry: LayoutRegistry,
    pub instances: LayoutInstances,
}

impl NavState {
    /// Root, then the child path of the layout active in it, and so on.
    fn active_chain_ids(&self) -> Vec<PathId> {
        let mut chain = vec![];
        let mut current = Some(self.root);
        while let Some(id) = current {
            let Ok(path) = self.arena.path(id) else {
                break;
            };
            if chain.contains(&id) {
                break;
            }
            chain.push(id);
            current = path
                .active()
                .and_then(|it| self.instances.owned_by(it))
                .map(|it| it.child_path);
        }
        chain
    }

    /// Deepest active mutable path with at least two entries.
    fn leave_target(&self) -> Option<PathId> {
        self.active_chain_ids().into_iter().rev().find(|id| {
            self.arena
                .path(*id)
                .is_ok_and(|path| path.kind() == PathKind::Mutable && path.len() >= 2)
        })
    }

    fn snapshot(&self, coordinator: CoordinatorId) -> NavSnapshot {
        let active_chain = self
            .active_chain_ids()
            .into_iter()
            .filter_map(|id| self.arena.path(id).ok().map(crate::Path::snapshot))
            .collect();
        NavSnapshot {
            coordinator: Some(coordinator),
            active_chain,
            paths: self.arena.nodes().map(|node| node.path.snapshot()).collect(),
        }
    }

    fn prune(&mut self) -> bool { !self.instances.prune_detached(&mut self.arena).is_empty() }
}

/// The target of an operation must fit the path it lands in.
fn validate_target(
    container: &PlannedContainer<'_>,
    destination: &Destination,
) -> NavigatorResult<()> {
    match container.kind() {
        PathKind::Fixed if !container.contains(destination) => Err(NavError::RouteNotInStack {
            destination: destination.id().to_string(),
            path: container.label().to_string(),
        }
        .into()),
        PathKind::Fixed => Ok(()),
        PathKind::Mutable => destination.ensure_bindable(),
    }
}

pub(crate) struct CoordinatorInner {
    pub id: CoordinatorId,
    pub config: NavigatorConfig,
    /// FIFO operation gate. [`tokio::sync::Mutex`] is fair.
    pub gate: Mutex<()>,
    pub state: RwLock<NavState>,
    pub listeners: RwLock<Vec<Arc<dyn NavListener>>>,
    pub deep_link_parser: Option<Arc<dyn DeepLinkParser>>,
}

impl Drop for CoordinatorInner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        state.arena.dispose_all();
        state.instances.clear();
    }
}

/// Orchestrates every navigation operation. Cheap to clone: clones share the same
/// state.
///
/// Operations are serialized by a FIFO operation gate: a second operation waits until
/// the first one (including its hooks and listeners) has finished.
///
/// ```
/// use r3bl_navigator::{Coordinator, Destination, EnterOutcome};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> miette::Result<()> {
/// let coordinator = Coordinator::builder()
///     .root_members(vec![Destination::new("home")])
///     .build()?;
///
/// let outcome = coordinator.enter(Destination::new("detail")).await?;
/// assert!(matches!(outcome, EnterOutcome::Pushed(_)));
///
/// let root = coordinator.path_snapshot(coordinator.root_path_id()).await?;
/// assert_eq!(root.names(), vec!["home", "detail"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

impl Debug for Coordinator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("id", &self.inner.id)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub(crate) fn from_inner(inner: CoordinatorInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    #[must_use]
    pub fn builder() -> crate::CoordinatorBuilder { crate::CoordinatorBuilder::default() }

    #[must_use]
    pub fn id(&self) -> CoordinatorId { self.inner.id }

    #[must_use]
    pub fn config(&self) -> &NavigatorConfig { &self.inner.config }
}

// Operations.
impl Coordinator {
    /// Resolve redirects, activate the layout chain (push-to-top), then push onto the
    /// target path. A fixed target path activates the member instead. Guards are not
    /// consulted.
    ///
    /// # Errors
    ///
    /// Configuration and structural [`NavError`]s (state is left unchanged), or
    /// whatever a redirect hook returned.
    #[instrument(skip(self, destination), fields(destination = %destination.id()))]
    pub async fn enter(&self, destination: Destination) -> NavigatorResult<EnterOutcome> {
        let _gate = self.inner.gate.lock().await;
        let Some(destination) = self.resolve(destination).await? else {
            return Ok(EnterOutcome::Aborted);
        };
        self.enter_resolved(destination).await
    }

    async fn enter_resolved(&self, destination: Destination) -> NavigatorResult<EnterOutcome> {
        let (outcome, changed) = {
            let mut guard = self.inner.state.write().await;
            let state = &mut *guard;

            let plan = plan_layout_chain(
                &destination,
                &state.registry,
                &state.instances,
                &state.arena,
                state.root,
            )?;
            {
                let container = plan.target_container(&state.arena, state.root)?;
                validate_target(&container, &destination)?;
            }

            let chain = commit_layout_plan(
                plan,
                ActivationStrategy::PushToTop,
                &mut state.arena,
                &mut state.instances,
                state.root,
            )?;

            let path = state.arena.path_mut(chain.target)?;
            let result = match path.kind() {
                PathKind::Fixed => {
                    let before = path.active_index();
                    path.activate_route(destination)?;
                    (
                        EnterOutcome::Activated,
                        chain.changed || before != path.active_index(),
                    )
                }
                PathKind::Mutable => (EnterOutcome::Pushed(path.push(destination)?), true),
            };
            state.prune();
            result
        };

        DEBUG_NAV_PIPELINE.then(|| {
            tracing::debug!(message = "enter", outcome = ?outcome, changed);
        });

        if changed {
            self.notify(NavChange::Entered).await;
        }
        Ok(outcome)
    }

    /// Guarded pop of the deepest active mutable path that has at least two entries.
    /// The removed destination settles with `result`.
    ///
    /// # Errors
    ///
    /// Whatever the guard returned.
    #[instrument(skip(self, result))]
    pub async fn leave(&self, result: Option<ResultValue>) -> NavigatorResult<PopOutcome> {
        let _gate = self.inner.gate.lock().await;

        let (path_id, top) = {
            let state = self.inner.state.read().await;
            let Some(path_id) = state.leave_target() else {
                return Ok(PopOutcome::NothingToPop);
            };
            let Some(top) = state.arena.path(path_id)?.active().cloned() else {
                return Ok(PopOutcome::NothingToPop);
            };
            (path_id, top)
        };

        // No state lock is held while the guard runs.
        if !check_may_remove(&top).await? {
            return Ok(PopOutcome::Vetoed(top));
        }

        {
            let mut state = self.inner.state.write().await;
            state
                .arena
                .path_mut(path_id)?
                .remove_top(Completion::Result(result));
            state.prune();
        }

        DEBUG_NAV_PIPELINE.then(|| {
            tracing::debug!(message = "leave", removed = %top.id(), path = %path_id);
        });

        self.notify(NavChange::Left).await;
        Ok(PopOutcome::Removed(top))
    }

    /// Resolve redirects, reset every path (no guards), activate the layout chain
    /// (override), then activate the destination in its path. Clears history.
    ///
    /// # Errors
    ///
    /// Configuration and structural [`NavError`]s (detected before anything is reset),
    /// or whatever a redirect hook returned.
    #[instrument(skip(self, destination), fields(destination = %destination.id()))]
    pub async fn replace_all(&self, destination: Destination) -> NavigatorResult<ReplaceOutcome> {
        let _gate = self.inner.gate.lock().await;
        let Some(destination) = self.resolve(destination).await? else {
            return Ok(ReplaceOutcome::Aborted);
        };
        self.replace_all_resolved(destination).await
    }

    async fn replace_all_resolved(
        &self,
        destination: Destination,
    ) -> NavigatorResult<ReplaceOutcome> {
        let pending = {
            let mut guard = self.inner.state.write().await;
            let state = &mut *guard;

            // Dry run against the current state, so errors surface before the reset.
            // Layouts it built are reused below.
            let mut built = {
                let plan = plan_layout_chain(
                    &destination,
                    &state.registry,
                    &state.instances,
                    &state.arena,
                    state.root,
                )?;
                let container = plan.target_container(&state.arena, state.root)?;
                validate_target(&container, &destination)?;
                plan.into_new_layouts()
            };

            for path in state.arena.paths_mut() {
                path.reset();
            }
            state.prune();

            let plan = plan_layout_chain_reusing(
                &destination,
                &state.registry,
                &mut built,
                &state.instances,
                &state.arena,
                state.root,
            )?;
            let chain = commit_layout_plan(
                plan,
                ActivationStrategy::Override,
                &mut state.arena,
                &mut state.instances,
                state.root,
            )?;
            let pending = state.arena.path_mut(chain.target)?.activate_route(destination)?;
            state.prune();
            pending
        };

        DEBUG_NAV_PIPELINE.then(|| {
            tracing::debug!(message = "replace_all", pushed = pending.is_some());
        });

        self.notify(NavChange::Replaced).await;
        Ok(ReplaceOutcome::Replaced(pending))
    }

    /// Resolve redirects and activate the layout chain (push-to-top). Then, if the
    /// destination is already in its path, pop (guarded, frame by frame) down to it;
    /// otherwise enter it. A veto part way keeps the frames already removed.
    ///
    /// # Errors
    ///
    /// Configuration and structural [`NavError`]s, or whatever a hook returned.
    #[instrument(skip(self, destination), fields(destination = %destination.id()))]
    pub async fn reconcile(&self, destination: Destination) -> NavigatorResult<ReconcileOutcome> {
        let _gate = self.inner.gate.lock().await;
        let Some(destination) = self.resolve(destination).await? else {
            return Ok(ReconcileOutcome::Aborted);
        };
        self.reconcile_resolved(destination).await
    }

    async fn reconcile_resolved(
        &self,
        destination: Destination,
    ) -> NavigatorResult<ReconcileOutcome> {
        enum Next {
            Done(ReconcileOutcome),
            PopTo { path_id: PathId, position: usize },
        }

        let (next, mut changed) = {
            let mut guard = self.inner.state.write().await;
            let state = &mut *guard;

            let plan = plan_layout_chain(
                &destination,
                &state.registry,
                &state.instances,
                &state.arena,
                state.root,
            )?;
            let present = {
                let container = plan.target_container(&state.arena, state.root)?;
                let present = container.contains(&destination);
                if !present {
                    validate_target(&container, &destination)?;
                }
                present
            };

            let chain = commit_layout_plan(
                plan,
                ActivationStrategy::PushToTop,
                &mut state.arena,
                &mut state.instances,
                state.root,
            )?;
            let path = state.arena.path_mut(chain.target)?;

            let result = match (path.kind(), present) {
                (PathKind::Fixed, _) => {
                    let before = path.active_index();
                    path.activate_route(destination)?;
                    let changed = chain.changed || before != path.active_index();
                    (Next::Done(ReconcileOutcome::Activated), changed)
                }
                (PathKind::Mutable, false) => (
                    Next::Done(ReconcileOutcome::Entered(path.push(destination)?)),
                    true,
                ),
                (PathKind::Mutable, true) => {
                    let position = path
                        .entries()
                        .iter()
                        .rposition(|it| *it == destination)
                        .unwrap_or_default();
                    (
                        Next::PopTo {
                            path_id: chain.target,
                            position,
                        },
                        chain.changed,
                    )
                }
            };
            state.prune();
            result
        };

        let outcome = match next {
            Next::Done(outcome) => outcome,
            Next::PopTo { path_id, position } => {
                let mut removed = vec![];
                let mut vetoed_by = None;

                loop {
                    let top = {
                        let state = self.inner.state.read().await;
                        let path = state.arena.path(path_id)?;
                        if path.len() <= position + 1 {
                            break;
                        }
                        path.active().cloned()
                    };
                    let Some(top) = top else {
                        break;
                    };

                    // No state lock is held while the guard runs.
                    if !check_may_remove(&top).await? {
                        vetoed_by = Some(top);
                        break;
                    }

                    let mut state = self.inner.state.write().await;
                    state
                        .arena
                        .path_mut(path_id)?
                        .remove_top(Completion::Result(None));
                    state.prune();
                    removed.push(top);
                }

                changed |= !removed.is_empty();
                match vetoed_by {
                    Some(vetoed_by) => ReconcileOutcome::Vetoed { removed, vetoed_by },
                    None if removed.is_empty() => ReconcileOutcome::Activated,
                    None => ReconcileOutcome::PoppedTo { removed },
                }
            }
        };

        DEBUG_NAV_PIPELINE.then(|| {
            tracing::debug!(message = "reconcile", outcome = ?outcome, changed);
        });

        if changed {
            self.notify(NavChange::Reconciled).await;
        }
        Ok(outcome)
    }

    /// Parse an external link with the installed [`DeepLinkParser`], resolve redirects,
    /// then dispatch by the destination's [`DeepLinkStrategy`].
    ///
    /// # Errors
    ///
    /// [`NavError::MissingDeepLinkParser`], errors of the dispatched operation, or
    /// whatever a hook (parser, redirect, handler) returned.
    #[instrument(skip(self))]
    pub async fn recover(&self, uri: &str) -> NavigatorResult<RecoverOutcome> {
        let gate = self.inner.gate.lock().await;

        let parser = self
            .inner
            .deep_link_parser
            .clone()
            .ok_or(NavError::MissingDeepLinkParser)?;
        let Some(parsed) = parser.parse_destination_from_external_link(uri).await? else {
            tracing::debug!(message = "deep link not recognized", uri);
            return Ok(RecoverOutcome::Unparsed);
        };
        let Some(destination) = self.resolve(parsed).await? else {
            return Ok(RecoverOutcome::Aborted);
        };

        match destination.link_strategy().cloned().unwrap_or_default() {
            DeepLinkStrategy::Enter => Ok(RecoverOutcome::Entered(
                self.enter_resolved(destination).await?,
            )),
            DeepLinkStrategy::ReplaceAll => Ok(RecoverOutcome::Replaced(
                self.replace_all_resolved(destination).await?,
            )),
            DeepLinkStrategy::Navigate => Ok(RecoverOutcome::Navigated(
                self.reconcile_resolved(destination).await?,
            )),
            DeepLinkStrategy::Custom(handler) => {
                // The handler may call operations, so the gate must be free.
                drop(gate);
                handler.handle(self, destination).await?;
                Ok(RecoverOutcome::Handled)
            }
        }
    }

    /// Diff the path's entries against `declared` and apply the edit script. Retained
    /// entries keep their instance, removed ones settle as discarded. Neither redirects
    /// nor guards are consulted.
    ///
    /// # Errors
    ///
    /// [`NavError::UnknownPath`], [`NavError::FixedPathMutation`], or a declared
    /// destination that can't be bound. The path is unchanged on error.
    #[instrument(skip(self, declared), fields(path = %path_id, declared = declared.len()))]
    pub async fn apply_declared_stack(
        &self,
        path_id: PathId,
        declared: Vec<Destination>,
    ) -> NavigatorResult<DeclaredOutcome> {
        let _gate = self.inner.gate.lock().await;

        let outcome = {
            let mut state = self.inner.state.write().await;
            let path = state.arena.path_mut(path_id)?;
            let script = diff(path.entries(), &declared);
            let applied = path.apply_edit_script(&script, &declared)?;
            state.prune();
            DeclaredOutcome {
                script,
                removed: applied.removed,
                pending: applied.pending,
            }
        };

        DEBUG_NAV_PIPELINE.then(|| {
            tracing::debug!(
                message = "apply_declared_stack",
                inserted = outcome.script.insert_count(),
                removed = outcome.script.remove_count()
            );
        });

        if outcome.script.has_changes() {
            self.notify(NavChange::Declared(path_id)).await;
        }
        Ok(outcome)
    }

    /// Make member `index` of a fixed path active (eg: switch tabs).
    ///
    /// # Errors
    ///
    /// [`NavError::UnknownPath`] or [`NavError::IndexOutOfRange`].
    pub async fn activate_index(&self, path_id: PathId, index: usize) -> NavigatorResult<()> {
        let _gate = self.inner.gate.lock().await;
        let changed = {
            let mut state = self.inner.state.write().await;
            let path = state.arena.path_mut(path_id)?;
            let before = path.active_index();
            path.activate_index(index)?;
            before != path.active_index()
        };
        if changed {
            self.notify(NavChange::Activated(path_id)).await;
        }
        Ok(())
    }

    /// Tear everything down. Every destination of every path settles as discarded.
    /// Operations after this fail with [`NavError::UnknownPath`].
    pub async fn dispose(&self) {
        let _gate = self.inner.gate.lock().await;
        {
            let mut state = self.inner.state.write().await;
            state.arena.dispose_all();
            state.instances.clear();
        }
        tracing::debug!(message = "coordinator disposed", id = %self.inner.id);
        self.notify(NavChange::Disposed).await;
    }

    /// Register (or replace) the constructor for a layout key.
    pub async fn register_layout_constructor(
        &self,
        key: impl Into<LayoutKey>,
        factory: impl Fn() -> NavigatorResult<Layout> + Send + Sync + 'static,
    ) {
        let _gate = self.inner.gate.lock().await;
        self.inner.state.write().await.registry.register(key, factory);
    }
}

// Read API, listeners and internals.
impl Coordinator {
    pub async fn snapshot(&self) -> NavSnapshot {
        self.inner.state.read().await.snapshot(self.inner.id)
    }

    /// Paths from the root down to the deepest active one.
    pub async fn active_path_chain(&self) -> Vec<PathSnapshot> {
        self.snapshot().await.active_chain
    }

    /// # Errors
    ///
    /// [`NavError::UnknownPath`].
    pub async fn path_snapshot(&self, path_id: PathId) -> NavigatorResult<PathSnapshot> {
        Ok(self.inner.state.read().await.arena.path(path_id)?.snapshot())
    }

    /// Id of the root path. Stable for the life of the coordinator.
    #[must_use]
    pub fn root_path_id(&self) -> PathId { PathId(0) }

    pub async fn known_paths(&self) -> Vec<PathId> {
        self.inner.state.read().await.arena.ids().collect()
    }

    /// Child path of the layout `key`, if that layout currently exists.
    pub async fn layout_child_path(&self, key: &LayoutKey) -> Option<PathId> {
        self.inner
            .state
            .read()
            .await
            .instances
            .get(key)
            .map(|it| it.child_path)
    }

    /// Position of every destination, for hosts that persist navigation state.
    pub async fn restoration_entries(&self) -> Vec<RestorationEntry> {
        let state = self.inner.state.read().await;
        state
            .arena
            .nodes()
            .flat_map(|node| {
                let active_index = node.path.active_index();
                node.path
                    .entries()
                    .iter()
                    .enumerate()
                    .map(move |(index, it)| RestorationEntry {
                        path_id: node.id,
                        parent_path: node.parent,
                        layout: node.owner_layout.clone(),
                        index,
                        destination: it.id().clone(),
                        external_link: it.external_link().map(ToString::to_string),
                        active: active_index == Some(index),
                    })
            })
            .collect()
    }

    pub async fn add_listener(&self, listener: impl NavListener + 'static) {
        self.inner.listeners.write().await.push(Arc::new(listener));
    }

    pub async fn clear_listeners(&self) { self.inner.listeners.write().await.clear(); }

    async fn resolve(&self, destination: Destination) -> NavigatorResult<Option<Destination>> {
        let snapshot = self.snapshot().await;
        RedirectResolver::new(self.inner.config.max_redirect_depth)
            .resolve(destination, &snapshot)
            .await
    }

    async fn notify(&self, change: NavChange) {
        let listeners = self.inner.listeners.read().await.clone();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot().await;
        for listener in listeners {
            listener.on_change(&change, &snapshot).await;
        }
    }
}
