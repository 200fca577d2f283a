// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Destination, EditScript, PendingResult};

/// Result of [`crate::Coordinator::enter`].
#[derive(Debug)]
pub enum EnterOutcome {
    /// Pushed onto a mutable path. Await the handle for the value it is popped with.
    Pushed(PendingResult),
    /// The target path is fixed, the destination was made active.
    Activated,
    /// A redirect aborted the operation. Nothing changed.
    Aborted,
}

impl EnterOutcome {
    #[must_use]
    pub fn is_aborted(&self) -> bool { matches!(self, EnterOutcome::Aborted) }

    #[must_use]
    pub fn into_pending(self) -> Option<PendingResult> {
        match self {
            EnterOutcome::Pushed(it) => Some(it),
            EnterOutcome::Activated | EnterOutcome::Aborted => None,
        }
    }
}

/// Result of [`crate::Coordinator::replace_all`].
#[derive(Debug)]
pub enum ReplaceOutcome {
    /// Carries a handle if the destination was pushed onto a mutable path.
    Replaced(Option<PendingResult>),
    Aborted,
}

/// Result of [`crate::Coordinator::reconcile`].
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// The destination was already in its path. These frames above it were popped.
    PoppedTo { removed: Vec<Destination> },
    /// The destination was already active (or is a fixed member that is now active).
    Activated,
    /// The destination was not in its path, so it was entered.
    Entered(PendingResult),
    /// A guard vetoed part way. The frames in `removed` stay removed.
    Vetoed {
        removed: Vec<Destination>,
        vetoed_by: Destination,
    },
    Aborted,
}

/// Result of [`crate::Coordinator::recover`].
#[derive(Debug)]
pub enum RecoverOutcome {
    Entered(EnterOutcome),
    Replaced(ReplaceOutcome),
    Navigated(ReconcileOutcome),
    /// A [`crate::DeepLinkStrategy::Custom`] handler took care of it.
    Handled,
    /// The parser did not recognize the link.
    Unparsed,
    /// A redirect aborted the operation.
    Aborted,
}

/// Result of [`crate::Coordinator::apply_declared_stack`].
#[derive(Debug)]
pub struct DeclaredOutcome {
    pub script: EditScript,
    /// Destinations removed from the path (settled as discarded).
    pub removed: Vec<Destination>,
    /// Handles of the inserted destinations, in path order.
    pub pending: Vec<PendingResult>,
}
