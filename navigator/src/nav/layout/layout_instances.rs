// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use rustc_hash::FxHashMap;

use crate::{DEBUG_NAV_LAYOUT, Destination, LayoutKey, PathArena, PathId};

/// A layout that currently exists: its destination sits in `parent_path`, and it owns
/// `child_path`.
#[derive(Debug, Clone)]
pub struct LayoutInstance {
    pub key: LayoutKey,
    pub destination: Destination,
    pub child_path: PathId,
    pub parent_path: PathId,
}

/// Layouts that exist in a coordinator, by key. At most one instance per key.
///
/// If an instance exists, so do the instances of every layout above it: chains are
/// built root to leaf, and [`LayoutInstances::prune_detached`] tears down whole subtrees.
#[derive(Debug, Clone, Default)]
pub struct LayoutInstances {
    map: FxHashMap<LayoutKey, LayoutInstance>,
}

impl LayoutInstances {
    #[must_use]
    pub fn get(&self, key: &LayoutKey) -> Option<&LayoutInstance> { self.map.get(key) }

    pub fn insert(&mut self, instance: LayoutInstance) {
        self.map.insert(instance.key.clone(), instance);
    }

    /// Instance whose layout destination is this very instance.
    #[must_use]
    pub fn owned_by(&self, destination: &Destination) -> Option<&LayoutInstance> {
        let key = destination.layout_key()?;
        self.map
            .get(key)
            .filter(|it| it.destination.same_instance(destination))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutInstance> { self.map.values() }

    #[must_use]
    pub fn len(&self) -> usize { self.map.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    pub fn clear(&mut self) { self.map.clear(); }

    /// Tear down every layout whose destination is no longer in its parent path (or
    /// whose paths are gone). Its child path subtree is deleted from `arena`, settling
    /// everything in it with [`crate::Completion::Discarded`]. Repeats until stable and
    /// returns the keys that were pruned.
    pub fn prune_detached(&mut self, arena: &mut PathArena) -> Vec<LayoutKey> {
        let mut pruned = vec![];

        loop {
            let detached = self.map.values().find(|it| {
                let still_held = arena
                    .path(it.parent_path)
                    .is_ok_and(|parent| parent.contains_instance(&it.destination));
                !still_held || !arena.node_exists(it.child_path)
            });

            let Some(instance) = detached.cloned() else {
                break;
            };

            arena.delete_subtree(instance.child_path);
            self.map.remove(&instance.key);

            DEBUG_NAV_LAYOUT.then(|| {
                tracing::debug!(
                    message = "layout torn down",
                    key = %instance.key,
                    child_path = %instance.child_path
                );
            });

            pruned.push(instance.key);
        }

        pruned
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CoordinatorId, Path};

    #[test]
    fn test_prune_tears_down_nested_subtree() {
        let mut arena = PathArena::new(CoordinatorId::new());
        let root = arena.add_new_path(Path::new_mutable("root"), None, None);

        let tabs_dest = Destination::builder("tabs").layout("tabs").build();
        arena.path_mut(root).unwrap().push(tabs_dest.clone()).unwrap();
        let tabs = arena.add_new_path(Path::new_mutable("tabs"), Some(root), Some("tabs".into()));

        let search_dest = Destination::builder("search")
            .parent("tabs")
            .layout("search")
            .build();
        arena.path_mut(tabs).unwrap().push(search_dest.clone()).unwrap();
        let search =
            arena.add_new_path(Path::new_mutable("search"), Some(tabs), Some("search".into()));

        let result = Destination::builder("result").parent("search").build();
        arena.path_mut(search).unwrap().push(result.clone()).unwrap();

        let mut instances = LayoutInstances::default();
        instances.insert(LayoutInstance {
            key: "tabs".into(),
            destination: tabs_dest.clone(),
            child_path: tabs,
            parent_path: root,
        });
        instances.insert(LayoutInstance {
            key: "search".into(),
            destination: search_dest,
            child_path: search,
            parent_path: tabs,
        });
        assert_eq!(instances.owned_by(&tabs_dest).map(|it| it.child_path), Some(tabs));

        // Nothing detached yet.
        assert!(instances.prune_detached(&mut arena).is_empty());

        arena.path_mut(root).unwrap().reset();
        let mut pruned = instances.prune_detached(&mut arena);
        pruned.sort();

        assert_eq!(pruned, vec![LayoutKey::new("search"), LayoutKey::new("tabs")]);
        assert!(instances.is_empty());
        assert!(result.is_settled());
        assert_eq!(arena.len(), 1);
    }
}
