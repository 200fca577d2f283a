// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::HashMap,
          fmt::{Debug, Formatter},
          sync::{Arc, Mutex, PoisonError,
                 atomic::{AtomicBool, AtomicUsize, Ordering}}};

use async_trait::async_trait;

use crate::{Destination, DeepLinkParser, Guard, GuardDecision, NavChange, NavListener,
            NavSnapshot};

/// Records every notification along with the active destinations at that moment.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    records: Arc<Mutex<Vec<(NavChange, Vec<String>)>>>,
}

impl RecordingListener {
    #[must_use]
    pub fn records(&self) -> Vec<(NavChange, Vec<String>)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn changes(&self) -> Vec<NavChange> {
        self.records().into_iter().map(|(change, _)| change).collect()
    }
}

#[async_trait]
impl NavListener for RecordingListener {
    async fn on_change(&self, change: &NavChange, snapshot: &NavSnapshot) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((change.clone(), snapshot.active_names()));
    }
}

/// Guard with a switchable decision that counts how often it was asked.
#[derive(Debug, Clone)]
pub struct CountingGuard {
    pub allow: Arc<AtomicBool>,
    pub calls: Arc<AtomicUsize>,
}

impl CountingGuard {
    #[must_use]
    pub fn new(allow: bool) -> Self {
        Self {
            allow: Arc::new(AtomicBool::new(allow)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl Guard for CountingGuard {
    async fn may_remove(&self, _destination: &Destination) -> miette::Result<GuardDecision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Suspend once, like a real confirmation dialog would.
        tokio::task::yield_now().await;
        Ok(self.allow.load(Ordering::SeqCst).into())
    }
}

type DestinationFactory = Arc<dyn Fn() -> Destination + Send + Sync>;

/// Deep link parser backed by a fixed table of URIs.
#[derive(Clone, Default)]
pub struct StaticLinkParser {
    routes: HashMap<String, DestinationFactory>,
}

impl Debug for StaticLinkParser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.routes.keys()).finish()
    }
}

impl StaticLinkParser {
    #[must_use]
    pub fn route(
        mut self,
        uri: impl Into<String>,
        factory: impl Fn() -> Destination + Send + Sync + 'static,
    ) -> Self {
        self.routes.insert(uri.into(), Arc::new(factory));
        self
    }
}

#[async_trait]
impl DeepLinkParser for StaticLinkParser {
    async fn parse_destination_from_external_link(
        &self,
        uri: &str,
    ) -> miette::Result<Option<Destination>> {
        Ok(self.routes.get(uri).map(|factory| factory()))
    }
}
