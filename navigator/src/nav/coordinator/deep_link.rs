// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          sync::Arc};

use async_trait::async_trait;

use crate::{Coordinator, Destination};

/// Host supplied. Turns an external link into a destination. The URI grammar is
/// entirely up to the host.
#[async_trait]
pub trait DeepLinkParser: Send + Sync {
    /// `Ok(None)` if the link is not recognized.
    async fn parse_destination_from_external_link(
        &self,
        uri: &str,
    ) -> miette::Result<Option<Destination>>;
}

/// Custom dispatch for a recovered destination. Runs **after** the operation gate is
/// released, so unlike other hooks it may call the coordinator's operations.
#[async_trait]
pub trait DeepLinkHandler: Send + Sync {
    async fn handle(&self, coordinator: &Coordinator, destination: Destination)
    -> miette::Result<()>;
}

/// How [`Coordinator::recover`] dispatches a recovered destination. A destination
/// without a strategy uses [`DeepLinkStrategy::ReplaceAll`].
#[derive(Clone, Default)]
pub enum DeepLinkStrategy {
    /// Push on top of the current history.
    Enter,
    /// Clear history, then show the destination.
    #[default]
    ReplaceAll,
    /// Pop back to it if it is in history, else enter it.
    Navigate,
    Custom(Arc<dyn DeepLinkHandler>),
}

impl Debug for DeepLinkStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeepLinkStrategy::Enter => f.write_str("Enter"),
            DeepLinkStrategy::ReplaceAll => f.write_str("ReplaceAll"),
            DeepLinkStrategy::Navigate => f.write_str("Navigate"),
            DeepLinkStrategy::Custom(_) => f.write_str("Custom"),
        }
    }
}
