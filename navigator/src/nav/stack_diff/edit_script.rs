// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

/// One step of an [`EditScript`]. Indices are absolute: `old_index` into the old list,
/// `new_index` into the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditOp {
    Retain { old_index: usize, new_index: usize },
    Insert { new_index: usize },
    Remove { old_index: usize },
}

/// Element view of an [`EditOp`], borrowed from the two lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditItem<'a, T> {
    Retain(&'a T),
    Insert(&'a T),
    Remove(&'a T),
}

/// Minimal sequence of edits that turns an old list into a new one. Produced by
/// [`crate::diff`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript {
    pub ops: Vec<EditOp>,
}

impl EditScript {
    #[must_use]
    pub fn insert_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, EditOp::Insert { .. }))
            .count()
    }

    #[must_use]
    pub fn remove_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, EditOp::Remove { .. }))
            .count()
    }

    /// Inserts plus removes. This is the `D` that Myers minimizes.
    #[must_use]
    pub fn edit_distance(&self) -> usize { self.insert_count() + self.remove_count() }

    #[must_use]
    pub fn has_changes(&self) -> bool { self.edit_distance() > 0 }

    /// Build the new list, taking retained elements from `old` and inserted ones from
    /// `new`.
    #[must_use]
    pub fn apply<T: Clone>(&self, old: &[T], new: &[T]) -> Vec<T> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                EditOp::Retain { old_index, .. } => old.get(*old_index).cloned(),
                EditOp::Insert { new_index } => new.get(*new_index).cloned(),
                EditOp::Remove { .. } => None,
            })
            .collect()
    }

    #[must_use]
    pub fn items<'a, T>(&self, old: &'a [T], new: &'a [T]) -> Vec<EditItem<'a, T>> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                EditOp::Retain { old_index, .. } => old.get(*old_index).map(EditItem::Retain),
                EditOp::Insert { new_index } => new.get(*new_index).map(EditItem::Insert),
                EditOp::Remove { old_index } => old.get(*old_index).map(EditItem::Remove),
            })
            .collect()
    }
}
