// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use async_trait::async_trait;
use serde::Serialize;
use strum_macros::Display;

use crate::{CoordinatorId, Destination, DestinationId, LayoutKey, PathId, PathSnapshot};

/// Read only copy of a coordinator's navigation state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavSnapshot {
    pub coordinator: Option<CoordinatorId>,
    /// Paths from the root down to the deepest active one. Each path after the first is
    /// the child path of the layout that is active in the previous one.
    pub active_chain: Vec<PathSnapshot>,
    /// Every path, in creation order.
    pub paths: Vec<PathSnapshot>,
}

impl NavSnapshot {
    #[must_use]
    pub fn root(&self) -> Option<&PathSnapshot> { self.active_chain.first() }

    /// Active destination of the deepest active path.
    #[must_use]
    pub fn active_destination(&self) -> Option<&Destination> {
        self.active_chain.last().and_then(PathSnapshot::active)
    }

    #[must_use]
    pub fn path(&self, id: PathId) -> Option<&PathSnapshot> {
        self.paths.iter().find(|it| it.id == id)
    }

    /// Some path holds a destination equal to `destination`.
    #[must_use]
    pub fn contains(&self, destination: &Destination) -> bool {
        self.paths.iter().any(|it| it.entries.contains(destination))
    }

    /// Names of the active destinations root to leaf, eg: `["tabs", "search", "result"]`.
    #[must_use]
    pub fn active_names(&self) -> Vec<String> {
        self.active_chain
            .iter()
            .filter_map(|it| it.active().map(|it| it.id().to_string()))
            .collect()
    }
}

/// Which operation produced a notification.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum NavChange {
    Entered,
    Left,
    Replaced,
    Reconciled,
    Declared(PathId),
    /// A fixed path switched its active member.
    Activated(PathId),
    Disposed,
}

/// Observer notified after every operation that changed something.
///
/// Listeners run in registration order while the operation gate is still held, so they
/// never interleave with another operation. Like hooks, they must not call back into
/// the coordinator's operations.
#[async_trait]
pub trait NavListener: Send + Sync {
    async fn on_change(&self, change: &NavChange, snapshot: &NavSnapshot);
}

/// One destination's position, for hosts that persist navigation state. The core never
/// encodes these. It only lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestorationEntry {
    pub path_id: PathId,
    pub parent_path: Option<PathId>,
    /// Layout that owns `path_id`. `None` for the root.
    pub layout: Option<LayoutKey>,
    pub index: usize,
    pub destination: DestinationId,
    pub external_link: Option<String>,
    pub active: bool,
}
