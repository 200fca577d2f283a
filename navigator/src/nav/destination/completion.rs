// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::DestinationId;

/// Value a destination hands back to whoever pushed it, when it is popped.
pub type ResultValue = serde_json::Value;

/// How a destination's completion handle was settled. Every bound destination settles
/// exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Normal pop. Carries whatever value was passed to the pop.
    Result(Option<ResultValue>),
    /// Forced removal: reset, replace-all, declarative removal or teardown.
    Discarded,
}

impl Completion {
    #[must_use]
    pub fn is_discarded(&self) -> bool { matches!(self, Completion::Discarded) }

    #[must_use]
    pub fn value(&self) -> Option<&ResultValue> {
        match self {
            Completion::Result(it) => it.as_ref(),
            Completion::Discarded => None,
        }
    }
}

/// Receiving half of a destination's completion handle. Returned when a destination is
/// pushed.
#[derive(Debug)]
pub struct PendingResult {
    destination: DestinationId,
    receiver: oneshot::Receiver<Completion>,
    taken: bool,
}

impl PendingResult {
    pub(crate) fn new(destination: DestinationId) -> (oneshot::Sender<Completion>, Self) {
        let (sender, receiver) = oneshot::channel();
        (
            sender,
            Self {
                destination,
                receiver,
                taken: false,
            },
        )
    }

    #[must_use]
    pub fn destination(&self) -> &DestinationId { &self.destination }

    /// Wait for the destination to be removed from its path. If the destination (and
    /// every path holding it) is dropped without being settled, this resolves to
    /// [`Completion::Discarded`].
    pub async fn wait(self) -> Completion {
        self.receiver.await.unwrap_or(Completion::Discarded)
    }

    /// Non blocking check. Returns `None` while the destination is still on its path,
    /// and `None` again once the completion has been taken.
    pub fn try_take(&mut self) -> Option<Completion> {
        if self.taken {
            return None;
        }
        let it = match self.receiver.try_recv() {
            Ok(completion) => completion,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Completion::Discarded,
        };
        self.taken = true;
        Some(it)
    }
}
