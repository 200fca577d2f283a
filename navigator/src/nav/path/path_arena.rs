// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeMap;

use crate::{CoordinatorId, LayoutKey, NavError, NavigatorResult, Path, PathId};

/// A [`Path`] plus its position in the tree of paths.
#[derive(Debug)]
pub struct PathNode {
    pub id: PathId,
    /// Path that holds the layout destination owning this one. `None` for the root.
    pub parent: Option<PathId>,
    pub children: Vec<PathId>,
    /// Key of the layout that owns this path. `None` for the root.
    pub owner_layout: Option<LayoutKey>,
    pub path: Path,
}

/// Memory arena that owns every [`Path`] of a coordinator, arranged as a (non-binary)
/// tree rooted at the root path. Paths refer to each other by [`PathId`] only.
#[derive(Debug)]
pub struct PathArena {
    owner: CoordinatorId,
    map: BTreeMap<PathId, PathNode>,
    counter: usize,
}

impl PathArena {
    #[must_use]
    pub fn new(owner: CoordinatorId) -> Self {
        Self {
            owner,
            map: BTreeMap::new(),
            counter: 0,
        }
    }

    #[must_use]
    pub fn owner(&self) -> CoordinatorId { self.owner }

    /// Attach `path` to this arena's owner and add it under `parent`.
    pub fn add_new_path(
        &mut self,
        mut path: Path,
        parent: Option<PathId>,
        owner_layout: Option<LayoutKey>,
    ) -> PathId {
        let id = PathId(self.counter);
        self.counter += 1;
        path.attach(self.owner, id);

        if let Some(parent_node) = parent.and_then(|it| self.map.get_mut(&it)) {
            parent_node.children.push(id);
        }

        self.map.insert(
            id,
            PathNode {
                id,
                parent,
                children: vec![],
                owner_layout,
                path,
            },
        );
        id
    }

    #[must_use]
    pub fn node_exists(&self, id: PathId) -> bool { self.map.contains_key(&id) }

    #[must_use]
    pub fn get(&self, id: PathId) -> Option<&PathNode> { self.map.get(&id) }

    /// # Errors
    ///
    /// [`NavError::UnknownPath`].
    pub fn path(&self, id: PathId) -> NavigatorResult<&Path> {
        self.map
            .get(&id)
            .map(|node| &node.path)
            .ok_or_else(|| NavError::UnknownPath { path_id: id.0 }.into())
    }

    /// # Errors
    ///
    /// [`NavError::UnknownPath`].
    pub fn path_mut(&mut self, id: PathId) -> NavigatorResult<&mut Path> {
        self.map
            .get_mut(&id)
            .map(|node| &mut node.path)
            .ok_or_else(|| NavError::UnknownPath { path_id: id.0 }.into())
    }

    #[must_use]
    pub fn get_parent_of(&self, id: PathId) -> Option<PathId> {
        self.map.get(&id).and_then(|node| node.parent)
    }

    #[must_use]
    pub fn get_children_of(&self, id: PathId) -> Option<&[PathId]> {
        self.map.get(&id).map(|node| node.children.as_slice())
    }

    /// Pre-order DFS starting at (and including) `id`. Empty if `id` is unknown.
    #[must_use]
    pub fn tree_walk_dfs(&self, id: PathId) -> Vec<PathId> {
        let mut collected = vec![];
        if !self.node_exists(id) {
            return collected;
        }
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.map.get(&id) else {
                continue;
            };
            collected.push(id);
            // Reversed so that children come out in insertion order.
            stack.extend(node.children.iter().rev().copied());
        }
        collected
    }

    /// Remove `id` and everything below it. Every destination left in those paths is
    /// settled with [`crate::Completion::Discarded`], deepest paths first. Returns the
    /// deleted ids.
    pub fn delete_subtree(&mut self, id: PathId) -> Vec<PathId> {
        let deletion_list = self.tree_walk_dfs(id);

        if let Some(parent_node) = self
            .get_parent_of(id)
            .and_then(|parent| self.map.get_mut(&parent))
        {
            parent_node.children.retain(|child| *child != id);
        }

        for id in deletion_list.iter().rev() {
            if let Some(mut node) = self.map.remove(id) {
                node.path.dispose();
            }
        }

        deletion_list
    }

    /// Settle everything and empty the arena.
    pub fn dispose_all(&mut self) {
        let ids: Vec<PathId> = self.map.keys().rev().copied().collect();
        for id in ids {
            if let Some(mut node) = self.map.remove(&id) {
                node.path.dispose();
            }
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = PathId> + '_ { self.map.keys().copied() }

    pub fn nodes(&self) -> impl Iterator<Item = &PathNode> { self.map.values() }

    pub fn paths_mut(&mut self) -> impl Iterator<Item = &mut Path> {
        self.map.values_mut().map(|node| &mut node.path)
    }

    #[must_use]
    pub fn len(&self) -> usize { self.map.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.map.is_empty() }
}
