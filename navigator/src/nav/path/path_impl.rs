// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Completion, CoordinatorId, Destination, EditOp, EditScript, NavError,
            NavigatorResult, PathId, PathKind, PathSnapshot, PendingResult, PopOutcome,
            ResultValue, check_may_remove};

/// Ordered container of [`Destination`]s plus an active pointer.
///
/// | Kind                | Membership           | Active element      |
/// | :------------------ | :------------------- | :------------------ |
/// | [`PathKind::Mutable`] | push / pop           | always the last one |
/// | [`PathKind::Fixed`]   | set at construction  | `active_index`      |
///
/// Every destination a path holds is bound to it. Whenever one leaves, its completion
/// handle is settled: with the pop's result for a normal pop, and with
/// [`Completion::Discarded`] for everything else.
///
/// Paths owned by a [`crate::Coordinator`] live in its [`crate::PathArena`] and are
/// mutated through the coordinator's operations. A detached path (created here and never
/// attached) can be driven directly, which is what the unit tests do.
#[derive(Debug)]
pub struct Path {
    id: Option<PathId>,
    owner: Option<CoordinatorId>,
    label: String,
    kind: PathKind,
    entries: Vec<Destination>,
    active_index: usize,
}

/// What [`Path::apply_edit_script`] did.
#[derive(Debug, Default)]
pub struct AppliedScript {
    /// Destinations that left the path (settled with [`Completion::Discarded`]).
    pub removed: Vec<Destination>,
    /// Completion handles of the newly inserted destinations, in path order.
    pub pending: Vec<PendingResult>,
}

impl Path {
    pub fn new_mutable(label: impl Into<String>) -> Self {
        Self {
            id: None,
            owner: None,
            label: label.into(),
            kind: PathKind::Mutable,
            entries: vec![],
            active_index: 0,
        }
    }

    /// Fixed path over `members`. The first member is active.
    ///
    /// # Errors
    ///
    /// A member that is already bound, settled, or listed twice.
    pub fn new_fixed(label: impl Into<String>, members: Vec<Destination>) -> NavigatorResult<Self> {
        let label = label.into();
        for (index, member) in members.iter().enumerate() {
            member.ensure_bindable()?;
            if members[..index].iter().any(|it| it.same_instance(member)) {
                return Err(NavError::DestinationAlreadyBound {
                    destination: member.id().to_string(),
                }
                .into());
            }
        }
        for member in &members {
            // Nobody awaits fixed members, dropping the receiver is fine.
            let _unused = member.bind()?;
        }
        Ok(Self {
            id: None,
            owner: None,
            label,
            kind: PathKind::Fixed,
            entries: members,
            active_index: 0,
        })
    }

    pub(crate) fn attach(&mut self, owner: CoordinatorId, id: PathId) {
        self.owner = Some(owner);
        self.id = Some(id);
    }

    #[must_use]
    pub fn id(&self) -> Option<PathId> { self.id }

    #[must_use]
    pub fn owner(&self) -> Option<CoordinatorId> { self.owner }

    #[must_use]
    pub fn label(&self) -> &str { &self.label }

    #[must_use]
    pub fn kind(&self) -> PathKind { self.kind }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn entries(&self) -> &[Destination] { &self.entries }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        match self.kind {
            PathKind::Mutable => Some(self.entries.len() - 1),
            PathKind::Fixed => Some(self.active_index),
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<&Destination> {
        self.active_index().and_then(|index| self.entries.get(index))
    }

    #[must_use]
    pub fn contains(&self, destination: &Destination) -> bool {
        self.position_of(destination).is_some()
    }

    /// Index of the element equal to `destination`.
    #[must_use]
    pub fn position_of(&self, destination: &Destination) -> Option<usize> {
        self.entries.iter().position(|it| it == destination)
    }

    #[must_use]
    pub fn contains_instance(&self, destination: &Destination) -> bool {
        self.entries.iter().any(|it| it.same_instance(destination))
    }

    /// # Errors
    ///
    /// [`NavError::FixedPathMutation`], or a destination that can't be bound.
    pub fn push(&mut self, destination: Destination) -> NavigatorResult<PendingResult> {
        self.ensure_mutable()?;
        let pending = destination.bind()?;
        self.entries.push(destination);
        Ok(pending)
    }

    /// Guarded pop. On [`GuardDecision::Deny`](crate::GuardDecision::Deny) the path is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// [`NavError::FixedPathMutation`], or whatever the guard returned.
    pub async fn pop(&mut self, result: Option<ResultValue>) -> NavigatorResult<PopOutcome> {
        self.ensure_mutable()?;
        let Some(top) = self.entries.last().cloned() else {
            return Ok(PopOutcome::NothingToPop);
        };
        if !check_may_remove(&top).await? {
            return Ok(PopOutcome::Vetoed(top));
        }
        Ok(self
            .remove_top(Completion::Result(result))
            .map_or(PopOutcome::NothingToPop, PopOutcome::Removed))
    }

    /// Unguarded removal of the top, settled with `completion`.
    pub(crate) fn remove_top(&mut self, completion: Completion) -> Option<Destination> {
        let top = self.entries.pop()?;
        top.settle(completion);
        Some(top)
    }

    /// Relocate an equal element to the top without settling it, else push. Returns
    /// `None` when an existing element was moved (the argument is not bound).
    ///
    /// # Errors
    ///
    /// [`NavError::FixedPathMutation`], or a destination that can't be bound.
    pub fn push_or_move_to_top(
        &mut self,
        destination: Destination,
    ) -> NavigatorResult<Option<PendingResult>> {
        self.ensure_mutable()?;
        match self.position_of(&destination) {
            Some(index) => {
                let existing = self.entries.remove(index);
                self.entries.push(existing);
                Ok(None)
            }
            None => self.push(destination).map(Some),
        }
    }

    /// Move this very instance to the top. Returns `false` if the path doesn't hold it.
    pub(crate) fn move_instance_to_top(&mut self, destination: &Destination) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|it| it.same_instance(destination))
        else {
            return false;
        };
        let it = self.entries.remove(index);
        self.entries.push(it);
        true
    }

    /// - Empty: plain push.
    /// - One element: settle it with `result` (no guard), then push.
    /// - More: guarded [`Path::pop`] with `result`, then push. Returns `None` if vetoed.
    ///
    /// # Errors
    ///
    /// [`NavError::FixedPathMutation`], a destination that can't be bound, or whatever
    /// the guard returned.
    pub async fn push_replacement(
        &mut self,
        destination: Destination,
        result: Option<ResultValue>,
    ) -> NavigatorResult<Option<PendingResult>> {
        self.ensure_mutable()?;
        destination.ensure_bindable()?;
        match self.entries.len() {
            0 => {}
            1 => {
                self.remove_top(Completion::Result(result));
            }
            _ => {
                if let PopOutcome::Vetoed(_) = self.pop(result).await? {
                    return Ok(None);
                }
            }
        }
        self.push(destination).map(Some)
    }

    /// Mutable: settle every element with [`Completion::Discarded`] and empty the path.
    /// Fixed: active index back to 0. Never consults guards.
    pub fn reset(&mut self) -> Vec<Destination> {
        match self.kind {
            PathKind::Mutable => self.dispose(),
            PathKind::Fixed => {
                self.active_index = 0;
                vec![]
            }
        }
    }

    /// Fixed: make the equal member active. Mutable: [`Path::reset`] then push.
    ///
    /// # Errors
    ///
    /// [`NavError::RouteNotInStack`] for a fixed path, or a destination that can't be
    /// bound for a mutable one.
    pub fn activate_route(
        &mut self,
        destination: Destination,
    ) -> NavigatorResult<Option<PendingResult>> {
        match self.kind {
            PathKind::Fixed => {
                let index = self.position_of(&destination).ok_or_else(|| {
                    NavError::RouteNotInStack {
                        destination: destination.id().to_string(),
                        path: self.label.clone(),
                    }
                })?;
                self.active_index = index;
                Ok(None)
            }
            PathKind::Mutable => {
                destination.ensure_bindable()?;
                self.reset();
                self.push(destination).map(Some)
            }
        }
    }

    /// Fixed: set the active index. Mutable: the active element is always the last one,
    /// so only that index is accepted.
    ///
    /// # Errors
    ///
    /// [`NavError::IndexOutOfRange`].
    pub fn activate_index(&mut self, index: usize) -> NavigatorResult<()> {
        let len = self.entries.len();
        let accepted = match self.kind {
            PathKind::Fixed => index < len,
            PathKind::Mutable => len > 0 && index == len - 1,
        };
        if !accepted {
            return Err(NavError::IndexOutOfRange {
                index,
                len,
                path: self.label.clone(),
            }
            .into());
        }
        if self.kind == PathKind::Fixed {
            self.active_index = index;
        }
        Ok(())
    }

    /// Unconditionally make `destination` active.
    /// - Fixed: same as [`Path::activate_route`].
    /// - Mutable, holding this very instance: drop everything else (discarded).
    /// - Mutable otherwise: reset then push.
    ///
    /// # Errors
    ///
    /// See [`Path::activate_route`].
    pub(crate) fn override_with(
        &mut self,
        destination: Destination,
    ) -> NavigatorResult<Option<PendingResult>> {
        if self.kind == PathKind::Mutable && self.contains_instance(&destination) {
            let (keep, drop): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
                .into_iter()
                .partition(|it| it.same_instance(&destination));
            for it in drop {
                it.settle(Completion::Discarded);
            }
            self.entries = keep;
            return Ok(None);
        }
        self.activate_route(destination)
    }

    /// Teardown. Settles every element, of either kind, with [`Completion::Discarded`].
    pub fn dispose(&mut self) -> Vec<Destination> {
        self.active_index = 0;
        let removed = std::mem::take(&mut self.entries);
        // Top first, the same order pops would have used.
        for it in removed.iter().rev() {
            it.settle(Completion::Discarded);
        }
        removed
    }

    /// Apply a [`crate::diff`] of `self.entries()` against `declared`.
    ///
    /// - Retained elements keep their instance (the declared copy is dropped).
    /// - Removed elements are settled with [`Completion::Discarded`], no guard.
    /// - Inserted elements are bound. If an inserted element is the very instance that
    ///   this script removes elsewhere, it is moved instead, and stays unsettled.
    ///
    /// Everything is validated before the path is touched, so an error leaves it as it
    /// was.
    ///
    /// # Errors
    ///
    /// [`NavError::FixedPathMutation`], [`NavError::IndexOutOfRange`] for a script that
    /// does not fit, an inserted destination that can't be bound, or
    /// [`NavError::DestinationAlreadyBound`] for one instance inserted twice.
    pub fn apply_edit_script(
        &mut self,
        script: &EditScript,
        declared: &[Destination],
    ) -> NavigatorResult<AppliedScript> {
        self.ensure_mutable()?;

        let removed_indices: Vec<usize> = script
            .ops
            .iter()
            .filter_map(|op| match op {
                EditOp::Remove { old_index } => Some(*old_index),
                _ => None,
            })
            .collect();

        // Validate. Each instance may be claimed by one insert only, and a moved
        // instance resolves to the removed slot it came from.
        let mut claimed: Vec<&Destination> = vec![];
        for op in &script.ops {
            let (old, new) = match op {
                EditOp::Retain {
                    old_index,
                    new_index,
                } => (Some(*old_index), Some(*new_index)),
                EditOp::Insert { new_index } => (None, Some(*new_index)),
                EditOp::Remove { old_index } => (Some(*old_index), None),
            };
            if let Some(index) = old.filter(|it| *it >= self.entries.len()) {
                return Err(self.out_of_range(index));
            }
            if let Some(index) = new.filter(|it| *it >= declared.len()) {
                return Err(NavError::IndexOutOfRange {
                    index,
                    len: declared.len(),
                    path: self.label.clone(),
                }
                .into());
            }
            if let EditOp::Insert { new_index } = op {
                let candidate = &declared[*new_index];
                if claimed.iter().any(|it| it.same_instance(candidate)) {
                    return Err(NavError::DestinationAlreadyBound {
                        destination: candidate.id().to_string(),
                    }
                    .into());
                }
                let moved = removed_indices
                    .iter()
                    .filter_map(|it| self.entries.get(*it))
                    .any(|it| it.same_instance(candidate));
                if !moved {
                    candidate.ensure_bindable()?;
                }
                claimed.push(candidate);
            }
        }

        // Commit.
        let old_entries = std::mem::take(&mut self.entries);
        let mut moved: Vec<usize> = vec![];
        let mut applied = AppliedScript::default();

        for op in &script.ops {
            match op {
                EditOp::Retain { old_index, .. } => {
                    self.entries.push(old_entries[*old_index].clone());
                }
                EditOp::Insert { new_index } => {
                    let candidate = &declared[*new_index];
                    if let Some(old_index) = removed_indices
                        .iter()
                        .find(|it| old_entries[**it].same_instance(candidate))
                    {
                        moved.push(*old_index);
                        self.entries.push(old_entries[*old_index].clone());
                    } else {
                        applied.pending.push(candidate.bind()?);
                        self.entries.push(candidate.clone());
                    }
                }
                EditOp::Remove { .. } => {}
            }
        }

        for old_index in removed_indices {
            if !moved.contains(&old_index) {
                let it = &old_entries[old_index];
                it.settle(Completion::Discarded);
                applied.removed.push(it.clone());
            }
        }

        Ok(applied)
    }

    #[must_use]
    pub fn snapshot(&self) -> PathSnapshot {
        PathSnapshot {
            id: self.id.unwrap_or(PathId(usize::MAX)),
            label: self.label.clone(),
            kind: self.kind,
            entries: self.entries.clone(),
            active_index: self.active_index(),
        }
    }

    fn ensure_mutable(&self) -> NavigatorResult<()> {
        match self.kind {
            PathKind::Mutable => Ok(()),
            PathKind::Fixed => Err(NavError::FixedPathMutation {
                path: self.label.clone(),
            }
            .into()),
        }
    }

    fn out_of_range(&self, index: usize) -> miette::Report {
        NavError::IndexOutOfRange {
            index,
            len: self.entries.len(),
            path: self.label.clone(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{GuardDecision, GuardFn, diff};

    fn names(path: &Path) -> Vec<String> { path.snapshot().names() }

    #[tokio::test]
    async fn test_push_then_pop_delivers_result() {
        let mut path = Path::new_mutable("root");
        path.push(Destination::new("home")).unwrap();
        let pending = path.push(Destination::new("detail")).unwrap();
        assert_eq!(path.active().unwrap().id().name(), "detail");

        let outcome = path.pop(Some(serde_json::json!("saved"))).await.unwrap();
        assert!(outcome.is_removed());
        assert_eq!(names(&path), vec!["home"]);
        assert_eq!(
            pending.wait().await,
            Completion::Result(Some(serde_json::json!("saved")))
        );
    }

    #[tokio::test]
    async fn test_vetoed_pop_is_a_no_op() {
        let mut path = Path::new_mutable("root");
        path.push(Destination::new("home")).unwrap();
        let editor = Destination::builder("editor")
            .guard(GuardFn::new(|_| GuardDecision::Deny))
            .build();
        let mut pending = path.push(editor.clone()).unwrap();

        let outcome = path.pop(None).await.unwrap();
        assert!(outcome.is_vetoed());
        assert_eq!(names(&path), vec!["home", "editor"]);
        assert!(path.active().unwrap().same_instance(&editor));
        assert!(pending.try_take().is_none());
    }

    #[tokio::test]
    async fn test_pop_on_empty_path() {
        let mut path = Path::new_mutable("root");
        assert!(matches!(path.pop(None).await.unwrap(), PopOutcome::NothingToPop));
    }

    #[test]
    fn test_push_or_move_to_top_keeps_instance() {
        let mut path = Path::new_mutable("root");
        let a = Destination::new("a");
        let mut pending_a = path.push(a.clone()).unwrap();
        path.push(Destination::new("b")).unwrap();

        let moved = path.push_or_move_to_top(Destination::new("a")).unwrap();
        assert!(moved.is_none());
        assert_eq!(names(&path), vec!["b", "a"]);
        assert!(path.active().unwrap().same_instance(&a));
        assert!(pending_a.try_take().is_none());
    }

    #[tokio::test]
    async fn test_push_replacement_single_element_skips_guard() {
        let mut path = Path::new_mutable("root");
        let pending = path
            .push(
                Destination::builder("locked")
                    .guard(GuardFn::new(|_| GuardDecision::Deny))
                    .build(),
            )
            .unwrap();

        let replaced = path
            .push_replacement(Destination::new("next"), Some(serde_json::json!(1)))
            .await
            .unwrap();
        assert!(replaced.is_some());
        assert_eq!(names(&path), vec!["next"]);
        assert_eq!(
            pending.wait().await,
            Completion::Result(Some(serde_json::json!(1)))
        );
    }

    #[tokio::test]
    async fn test_push_replacement_vetoed_returns_none() {
        let mut path = Path::new_mutable("root");
        path.push(Destination::new("home")).unwrap();
        path.push(
            Destination::builder("locked")
                .guard(GuardFn::new(|_| GuardDecision::Deny))
                .build(),
        )
        .unwrap();

        let next = Destination::new("next");
        let replaced = path.push_replacement(next.clone(), None).await.unwrap();
        assert!(replaced.is_none());
        assert_eq!(names(&path), vec!["home", "locked"]);
        assert!(!next.is_bound());
    }

    #[tokio::test]
    async fn test_reset_discards_everything_without_guards() {
        let mut path = Path::new_mutable("root");
        let first = path.push(Destination::new("home")).unwrap();
        let second = path
            .push(
                Destination::builder("locked")
                    .guard(GuardFn::new(|_| GuardDecision::Deny))
                    .build(),
            )
            .unwrap();

        let removed = path.reset();
        assert_eq!(removed.len(), 2);
        assert!(path.is_empty());
        assert_eq!(first.wait().await, Completion::Discarded);
        assert_eq!(second.wait().await, Completion::Discarded);
    }

    #[test]
    fn test_fixed_path_membership_is_constant() {
        let mut tabs = Path::new_fixed(
            "tabs",
            vec![
                Destination::new("feed"),
                Destination::new("search"),
                Destination::new("profile"),
            ],
        )
        .unwrap();
        assert_eq!(tabs.active().unwrap().id().name(), "feed");

        tabs.activate_route(Destination::new("profile")).unwrap();
        assert_eq!(tabs.active_index(), Some(2));

        tabs.activate_index(1).unwrap();
        assert_eq!(tabs.active().unwrap().id().name(), "search");

        tabs.reset();
        assert_eq!(tabs.active_index(), Some(0));
        assert_eq!(tabs.len(), 3);

        let err = tabs.push(Destination::new("settings")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::FixedPathMutation { path: "tabs".into() })
        );

        let err = tabs.activate_route(Destination::new("settings")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NavError>(),
            Some(NavError::RouteNotInStack { .. })
        ));

        let err = tabs.activate_index(3).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::IndexOutOfRange {
                index: 3,
                len: 3,
                path: "tabs".into()
            })
        );
    }

    #[test]
    fn test_fixed_path_rejects_duplicate_instances() {
        let feed = Destination::new("feed");
        let result = Path::new_fixed("tabs", vec![feed.clone(), feed.clone()]);
        assert!(result.is_err());
        assert!(!feed.is_bound());
    }

    #[test]
    fn test_activate_route_on_mutable_resets_then_pushes() {
        let mut path = Path::new_mutable("root");
        path.push(Destination::new("a")).unwrap();
        path.push(Destination::new("b")).unwrap();
        let pending = path.activate_route(Destination::new("c")).unwrap();
        assert!(pending.is_some());
        assert_eq!(names(&path), vec!["c"]);
    }

    #[tokio::test]
    async fn test_apply_edit_script_preserves_retained_instances() {
        let mut path = Path::new_mutable("root");
        let home = Destination::new("home");
        let tab_a = Destination::new("tab_a");
        path.push(home.clone()).unwrap();
        let pending_a = path.push(tab_a.clone()).unwrap();

        let declared = vec![Destination::new("home"), Destination::new("tab_b")];
        let script = diff(path.entries(), &declared);
        let applied = path.apply_edit_script(&script, &declared).unwrap();

        assert_eq!(names(&path), vec!["home", "tab_b"]);
        assert!(path.entries()[0].same_instance(&home));
        assert!(!declared[0].is_bound());
        assert_eq!(applied.removed, vec![tab_a]);
        assert_eq!(applied.pending.len(), 1);
        assert_eq!(pending_a.wait().await, Completion::Discarded);
    }

    #[test]
    fn test_apply_edit_script_moves_reordered_instances() {
        let mut path = Path::new_mutable("root");
        let a = Destination::new("a");
        let b = Destination::new("b");
        let mut pending_a = path.push(a.clone()).unwrap();
        path.push(b.clone()).unwrap();

        let declared = vec![b.clone(), a.clone()];
        let script = diff(path.entries(), &declared);
        let applied = path.apply_edit_script(&script, &declared).unwrap();

        assert_eq!(names(&path), vec!["b", "a"]);
        assert!(applied.removed.is_empty());
        assert!(applied.pending.is_empty());
        assert!(path.entries()[0].same_instance(&b));
        assert!(path.entries()[1].same_instance(&a));
        assert!(pending_a.try_take().is_none());
    }

    #[test]
    fn test_apply_edit_script_rejects_new_instance_inserted_twice() {
        let mut path = Path::new_mutable("root");
        let home = Destination::new("home");
        path.push(home.clone()).unwrap();

        let x = Destination::new("x");
        let declared = vec![home.clone(), x.clone(), x.clone()];
        let script = diff(path.entries(), &declared);
        let err = path.apply_edit_script(&script, &declared).unwrap_err();

        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::DestinationAlreadyBound {
                destination: "x".into()
            })
        );
        assert_eq!(names(&path), vec!["home"]);
        assert!(path.entries()[0].same_instance(&home));
        assert!(!x.is_bound());
    }

    #[test]
    fn test_apply_edit_script_rejects_moved_instance_inserted_twice() {
        let mut path = Path::new_mutable("root");
        let a = Destination::new("a");
        let b = Destination::new("b");
        let mut pending_a = path.push(a.clone()).unwrap();
        path.push(b.clone()).unwrap();

        let declared = vec![b.clone(), a.clone(), a.clone()];
        let script = diff(path.entries(), &declared);
        let err = path.apply_edit_script(&script, &declared).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<NavError>(),
            Some(NavError::DestinationAlreadyBound { .. })
        ));
        assert_eq!(names(&path), vec!["a", "b"]);
        assert!(path.entries()[0].same_instance(&a));
        assert!(pending_a.try_take().is_none());
    }

    #[test]
    fn test_dispose_settles_fixed_members() {
        let feed = Destination::new("feed");
        let mut tabs = Path::new_fixed("tabs", vec![feed.clone()]).unwrap();
        tabs.dispose();
        assert!(tabs.is_empty());
        assert!(feed.is_settled());
    }
}
