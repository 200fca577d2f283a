// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Layout resolution happens in two phases:
//!
//! ```text
//! plan_layout_chain()  (pure)                  commit_layout_plan()  (mutates)
//! ┌─────────────────────────────────┐          ┌──────────────────────────────────┐
//! │ walk parent keys leaf ─► root   │          │ walk steps root ─► leaf          │
//! │ reuse existing instances        │   Ok ─►  │ activate each layout in its      │
//! │ build missing ones (factories)  │          │ parent path, create child paths  │
//! │ detect cycles / key mismatches  │          │ return the target path           │
//! │ validate fixed memberships      │          └──────────────────────────────────┘
//! └─────────────────────────────────┘
//! ```
//!
//! Every error surfaces from the plan, before anything is touched.

use std::collections::HashSet;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use strum_macros::Display;

use crate::{ChildPathSpec, DEBUG_NAV_LAYOUT, Destination, Layout, LayoutInstance,
            LayoutInstances, LayoutKey, LayoutRegistry, NavError, NavigatorResult, Path,
            PathArena, PathId, PathKind};

/// How a layout is made active inside its parent path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ActivationStrategy {
    /// Mutable parent: move to top if present, else push. Fixed parent: activate.
    PushToTop,
    /// Mutable parent: keep only this layout. Fixed parent: activate.
    Override,
}

/// One layout in a [`LayoutPlan`].
#[derive(Debug, Clone)]
pub enum PlanStep {
    /// The layout already exists.
    Existing(LayoutInstance),
    /// The layout must be created from this freshly built [`Layout`].
    New { key: LayoutKey, layout: Layout },
}

impl PlanStep {
    #[must_use]
    pub fn key(&self) -> &LayoutKey {
        match self {
            PlanStep::Existing(instance) => &instance.key,
            PlanStep::New { key, .. } => key,
        }
    }
}

/// Either a path that exists, or the shape of one that a plan will create.
#[derive(Debug, Clone, Copy)]
pub enum PlannedContainer<'a> {
    Existing(&'a Path),
    Planned(&'a ChildPathSpec),
}

impl PlannedContainer<'_> {
    #[must_use]
    pub fn kind(&self) -> PathKind {
        match self {
            PlannedContainer::Existing(path) => path.kind(),
            PlannedContainer::Planned(spec) => spec.kind(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            PlannedContainer::Existing(path) => path.label(),
            PlannedContainer::Planned(spec) => spec.label(),
        }
    }

    /// Holds an element equal to `destination`.
    #[must_use]
    pub fn contains(&self, destination: &Destination) -> bool {
        match self {
            PlannedContainer::Existing(path) => path.contains(destination),
            PlannedContainer::Planned(ChildPathSpec::Fixed { members, .. }) => {
                members.contains(destination)
            }
            PlannedContainer::Planned(ChildPathSpec::Mutable { .. }) => false,
        }
    }
}

/// Layout chain of a target destination, root to leaf. Existing layouts always come
/// before new ones.
#[derive(Debug, Clone, Default)]
pub struct LayoutPlan {
    pub steps: SmallVec<[PlanStep; 4]>,
}

impl LayoutPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.steps.len() }

    /// Keys root to leaf.
    #[must_use]
    pub fn keys(&self) -> Vec<&LayoutKey> { self.steps.iter().map(PlanStep::key).collect() }

    /// The layouts this plan built, by key. Hand them to
    /// [`plan_layout_chain_reusing`] to plan again without running their factories.
    #[must_use]
    pub fn into_new_layouts(self) -> FxHashMap<LayoutKey, Layout> {
        self.steps
            .into_iter()
            .filter_map(|step| match step {
                PlanStep::New { key, layout } => Some((key, layout)),
                PlanStep::Existing(_) => None,
            })
            .collect()
    }

    /// The path the target destination will land in.
    ///
    /// # Errors
    ///
    /// [`NavError::UnknownPath`] if an existing layout's child path is gone.
    pub fn target_container<'a>(
        &'a self,
        arena: &'a PathArena,
        root: PathId,
    ) -> NavigatorResult<PlannedContainer<'a>> {
        match self.steps.last() {
            None => Ok(PlannedContainer::Existing(arena.path(root)?)),
            Some(PlanStep::Existing(instance)) => {
                Ok(PlannedContainer::Existing(arena.path(instance.child_path)?))
            }
            Some(PlanStep::New { layout, .. }) => Ok(PlannedContainer::Planned(&layout.child)),
        }
    }
}

/// Plan the layout chain `target` is nested in. Pure, apart from running layout
/// constructors.
///
/// # Errors
///
/// - [`NavError::LayoutCycle`] if the chain of parent keys revisits a key.
/// - [`NavError::MissingLayoutConstructor`], [`NavError::LayoutKeyMismatch`].
/// - [`NavError::RouteNotInStack`] if a layout must be activated in a fixed path that
///   doesn't hold it.
/// - Binding errors for destinations a new layout would bind.
pub fn plan_layout_chain(
    target: &Destination,
    registry: &LayoutRegistry,
    instances: &LayoutInstances,
    arena: &PathArena,
    root: PathId,
) -> NavigatorResult<LayoutPlan> {
    plan_layout_chain_reusing(
        target,
        registry,
        &mut FxHashMap::default(),
        instances,
        arena,
        root,
    )
}

/// Same as [`plan_layout_chain`], except that a missing layout is taken out of `built`
/// when it is there. Its factory only runs otherwise.
///
/// # Errors
///
/// See [`plan_layout_chain`].
pub fn plan_layout_chain_reusing(
    target: &Destination,
    registry: &LayoutRegistry,
    built: &mut FxHashMap<LayoutKey, Layout>,
    instances: &LayoutInstances,
    arena: &PathArena,
    root: PathId,
) -> NavigatorResult<LayoutPlan> {
    let mut seen: HashSet<LayoutKey> = HashSet::new();
    if let Some(key) = target.layout_key() {
        seen.insert(key.clone());
    }

    // Leaf to root.
    let mut steps: SmallVec<[PlanStep; 4]> = SmallVec::new();
    let mut next_key = target.parent().cloned();

    while let Some(key) = next_key {
        if !seen.insert(key.clone()) {
            return Err(NavError::LayoutCycle {
                key: key.to_string(),
            }
            .into());
        }

        let step = match instances.get(&key) {
            Some(instance) => PlanStep::Existing(instance.clone()),
            None => {
                let layout = match built.remove(&key) {
                    Some(it) => it,
                    None => registry.build(&key)?,
                };
                PlanStep::New {
                    key: key.clone(),
                    layout,
                }
            }
        };

        next_key = match &step {
            PlanStep::Existing(instance) => instance.destination.parent().cloned(),
            PlanStep::New { layout, .. } => layout.destination.parent().cloned(),
        };
        steps.push(step);
    }

    steps.reverse();
    let plan = LayoutPlan { steps };

    validate(&plan, arena, root)?;

    DEBUG_NAV_LAYOUT.then(|| {
        tracing::debug!(
            message = "layout plan",
            target = %target.id(),
            chain = ?plan.keys()
        );
    });

    Ok(plan)
}

fn validate(plan: &LayoutPlan, arena: &PathArena, root: PathId) -> NavigatorResult<()> {
    let mut container = PlannedContainer::Existing(arena.path(root)?);

    for step in &plan.steps {
        match step {
            PlanStep::Existing(instance) => {
                container = PlannedContainer::Existing(arena.path(instance.child_path)?);
            }
            PlanStep::New { layout, .. } => {
                let adopted = container.contains(&layout.destination);
                if container.kind() == PathKind::Fixed && !adopted {
                    return Err(NavError::RouteNotInStack {
                        destination: layout.destination.id().to_string(),
                        path: container.label().to_string(),
                    }
                    .into());
                }
                if !adopted {
                    layout.destination.ensure_bindable()?;
                }
                if let ChildPathSpec::Fixed { members, .. } = &layout.child {
                    for (index, member) in members.iter().enumerate() {
                        member.ensure_bindable()?;
                        if members[..index].iter().any(|it| it.same_instance(member)) {
                            return Err(NavError::DestinationAlreadyBound {
                                destination: member.id().to_string(),
                            }
                            .into());
                        }
                    }
                }
                container = PlannedContainer::Planned(&layout.child);
            }
        }
    }

    Ok(())
}

/// Result of [`commit_layout_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedChain {
    /// Path the target destination goes into.
    pub target: PathId,
    /// Whether any path was modified.
    pub changed: bool,
}

/// Activate every layout of `plan` root to leaf, creating the new ones. Each layout is
/// active in its parent path before the next level is touched.
///
/// The caller prunes detached layouts afterwards ([`ActivationStrategy::Override`] can
/// discard siblings).
///
/// # Errors
///
/// Only if `plan` is stale (not made against this exact state).
pub fn commit_layout_plan(
    plan: LayoutPlan,
    strategy: ActivationStrategy,
    arena: &mut PathArena,
    instances: &mut LayoutInstances,
    root: PathId,
) -> NavigatorResult<CommittedChain> {
    let mut parent = root;
    let mut changed = false;

    for step in plan.steps {
        match step {
            PlanStep::Existing(instance) => {
                let path = arena.path_mut(parent)?;
                changed |= activate(path, &instance.destination, strategy)?;
                parent = instance.child_path;
            }
            PlanStep::New { key, layout } => {
                let path = arena.path_mut(parent)?;
                let chosen = path
                    .entries()
                    .iter()
                    .rev()
                    .find(|it| **it == layout.destination)
                    .cloned()
                    .unwrap_or(layout.destination);
                activate(path, &chosen, strategy)?;

                let child = match layout.child {
                    ChildPathSpec::Mutable { label } => Path::new_mutable(label),
                    ChildPathSpec::Fixed { label, members } => Path::new_fixed(label, members)?,
                };
                let child_path = arena.add_new_path(child, Some(parent), Some(key.clone()));

                DEBUG_NAV_LAYOUT.then(|| {
                    tracing::debug!(
                        message = "layout created",
                        key = %key,
                        parent_path = %parent,
                        child_path = %child_path
                    );
                });

                instances.insert(LayoutInstance {
                    key,
                    destination: chosen,
                    child_path,
                    parent_path: parent,
                });
                changed = true;
                parent = child_path;
            }
        }
    }

    Ok(CommittedChain {
        target: parent,
        changed,
    })
}

/// Make `destination` active in `path`. Returns whether `path` changed.
fn activate(
    path: &mut Path,
    destination: &Destination,
    strategy: ActivationStrategy,
) -> NavigatorResult<bool> {
    let before = (
        path.len(),
        path.active().map(Destination::instance_id),
    );

    match (path.kind(), strategy) {
        (PathKind::Fixed, _) => {
            path.activate_route(destination.clone())?;
        }
        (PathKind::Mutable, ActivationStrategy::PushToTop) => {
            if !path.move_instance_to_top(destination) {
                let _unused = path.push(destination.clone())?;
            }
        }
        (PathKind::Mutable, ActivationStrategy::Override) => {
            let _unused = path.override_with(destination.clone())?;
        }
    }

    let after = (
        path.len(),
        path.active().map(Destination::instance_id),
    );
    Ok(before != after)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::CoordinatorId;

    fn registry() -> LayoutRegistry {
        let mut registry = LayoutRegistry::default();
        registry.register("tabs", || {
            Ok(Layout::with_fixed_child(
                Destination::builder("tabs").layout("tabs").build(),
                vec![
                    Destination::builder("feed").parent("tabs").build(),
                    Destination::builder("search")
                        .parent("tabs")
                        .layout("search")
                        .build(),
                ],
            ))
        });
        registry.register("search", || {
            Ok(Layout::with_mutable_child(
                Destination::builder("search")
                    .parent("tabs")
                    .layout("search")
                    .build(),
            ))
        });
        registry
    }

    fn setup() -> (PathArena, PathId) {
        let mut arena = PathArena::new(CoordinatorId::new());
        let root = arena.add_new_path(Path::new_mutable("root"), None, None);
        arena
            .path_mut(root)
            .unwrap()
            .push(Destination::new("home"))
            .unwrap();
        (arena, root)
    }

    #[test]
    fn test_nested_chain_is_planned_root_to_leaf_and_committed() {
        let (mut arena, root) = setup();
        let mut instances = LayoutInstances::default();
        let result = Destination::builder("result").parent("search").build();

        let plan = plan_layout_chain(&result, &registry(), &instances, &arena, root).unwrap();
        assert_eq!(
            plan.keys(),
            vec![&LayoutKey::new("tabs"), &LayoutKey::new("search")]
        );

        let committed = commit_layout_plan(
            plan,
            ActivationStrategy::PushToTop,
            &mut arena,
            &mut instances,
            root,
        )
        .unwrap();
        assert!(committed.changed);

        // root: [home, tabs*]
        let root_path = arena.path(root).unwrap();
        assert_eq!(root_path.snapshot().names(), vec!["home", "tabs"]);

        // tabs: [feed, search*], and the fixed member was adopted as the layout.
        let tabs = instances.get(&LayoutKey::new("tabs")).unwrap();
        let tabs_path = arena.path(tabs.child_path).unwrap();
        assert_eq!(tabs_path.active().unwrap().id().name(), "search");
        let search = instances.get(&LayoutKey::new("search")).unwrap();
        assert!(tabs_path.contains_instance(&search.destination));
        assert_eq!(committed.target, search.child_path);

        // Planning again reuses both instances and changes nothing.
        let plan = plan_layout_chain(&result, &registry(), &instances, &arena, root).unwrap();
        assert!(plan.steps.iter().all(|it| matches!(it, PlanStep::Existing(_))));
        let again = commit_layout_plan(
            plan,
            ActivationStrategy::PushToTop,
            &mut arena,
            &mut instances,
            root,
        )
        .unwrap();
        assert!(!again.changed);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_replanning_reuses_built_layouts() {
        use std::sync::{Arc,
                        atomic::{AtomicUsize, Ordering}};

        let (arena, root) = setup();
        let instances = LayoutInstances::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = LayoutRegistry::default();
        let counter = calls.clone();
        registry.register("settings", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Layout::with_mutable_child(
                Destination::builder("settings").layout("settings").build(),
            ))
        });
        let about = Destination::builder("about").parent("settings").build();

        let plan = plan_layout_chain(&about, &registry, &instances, &arena, root).unwrap();
        let mut built = plan.into_new_layouts();
        assert_eq!(built.len(), 1);

        let plan =
            plan_layout_chain_reusing(&about, &registry, &mut built, &instances, &arena, root)
                .unwrap();
        assert_eq!(plan.keys(), vec![&LayoutKey::new("settings")]);
        assert!(built.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_constructor_leaves_state_untouched() {
        let (arena, root) = setup();
        let instances = LayoutInstances::default();
        let orphan = Destination::builder("orphan").parent("nowhere").build();

        let err = plan_layout_chain(&orphan, &registry(), &instances, &arena, root).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::MissingLayoutConstructor {
                key: "nowhere".into()
            })
        );
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_cycle_is_detected() {
        let (arena, root) = setup();
        let mut registry = LayoutRegistry::default();
        registry.register("a", || {
            Ok(Layout::with_mutable_child(
                Destination::builder("a").layout("a").parent("b").build(),
            ))
        });
        registry.register("b", || {
            Ok(Layout::with_mutable_child(
                Destination::builder("b").layout("b").parent("a").build(),
            ))
        });

        let leaf = Destination::builder("leaf").parent("a").build();
        let err = plan_layout_chain(&leaf, &registry, &LayoutInstances::default(), &arena, root)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::LayoutCycle { key: "a".into() })
        );
    }

    #[test]
    fn test_layout_missing_from_fixed_parent_is_rejected() {
        let (arena, root) = setup();
        let mut registry = registry();
        registry.register("settings", || {
            Ok(Layout::with_mutable_child(
                Destination::builder("settings")
                    .parent("tabs")
                    .layout("settings")
                    .build(),
            ))
        });

        let leaf = Destination::builder("about").parent("settings").build();
        let err = plan_layout_chain(&leaf, &registry, &LayoutInstances::default(), &arena, root)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NavError>(),
            Some(NavError::RouteNotInStack { .. })
        ));
    }
}
