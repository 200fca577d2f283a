// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay};

use crate::Destination;

/// Handle of a [`crate::Path`] inside a [`crate::PathArena`]. Ids are never reused by the
/// same arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(pub usize);

impl Display for PathId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "path#{}", self.0) }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    StrumDisplay,
    AsRefStr,
)]
pub enum PathKind {
    /// Push / pop stack. The active element is always the last one.
    #[default]
    Mutable,
    /// Constant membership with a switchable active index (eg: tabs).
    Fixed,
}

/// Non owning back reference from a [`crate::Path`] to the [`crate::Coordinator`] that
/// owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CoordinatorId(uuid::Uuid);

impl CoordinatorId {
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self { Self(uuid::Uuid::new_v4()) }
}

impl Display for CoordinatorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "{}", self.0) }
}

/// Result of a guarded pop.
#[derive(Debug, Clone)]
pub enum PopOutcome {
    /// The top was removed and settled with the pop's result.
    Removed(Destination),
    /// The top's guard denied the removal. Nothing changed.
    Vetoed(Destination),
    /// There was nothing that could be popped.
    NothingToPop,
}

impl PopOutcome {
    #[must_use]
    pub fn is_removed(&self) -> bool { matches!(self, PopOutcome::Removed(_)) }

    #[must_use]
    pub fn is_vetoed(&self) -> bool { matches!(self, PopOutcome::Vetoed(_)) }
}

/// Read only copy of a [`crate::Path`]. Entries are clones of the live handles, so
/// [`Destination::same_instance`] works across snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSnapshot {
    pub id: PathId,
    pub label: String,
    pub kind: PathKind,
    pub entries: Vec<Destination>,
    pub active_index: Option<usize>,
}

impl PathSnapshot {
    #[must_use]
    pub fn active(&self) -> Option<&Destination> {
        self.active_index.and_then(|index| self.entries.get(index))
    }

    /// Entry names, eg: `["home", "detail(id=7)"]`. Handy in assertions and logs.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|it| it.id().to_string()).collect()
    }
}
