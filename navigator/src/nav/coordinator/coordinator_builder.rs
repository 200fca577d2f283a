// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          sync::Arc};

use tokio::sync::{Mutex, RwLock};

use super::coordinator_impl::{CoordinatorInner, NavState};
use crate::{Coordinator, CoordinatorId, DeepLinkParser, Destination, Layout, LayoutInstances,
            LayoutKey, LayoutRegistry, NavError, NavListener, NavigatorConfig, NavigatorResult,
            Path, PathArena, PathKind};

/// Builder for a [`Coordinator`].
///
/// ```
/// use r3bl_navigator::{Coordinator, Destination, Layout, NavigatorConfig, PathKind};
///
/// let coordinator = Coordinator::builder()
///     .config(NavigatorConfig {
///         root_kind: PathKind::Fixed,
///         ..Default::default()
///     })
///     .root_members(vec![Destination::new("feed"), Destination::new("inbox")])
///     .register_layout_constructor("settings", || {
///         Ok(Layout::with_mutable_child(
///             Destination::builder("settings").layout("settings").build(),
///         ))
///     })
///     .build();
/// assert!(coordinator.is_ok());
/// ```
#[derive(Default)]
pub struct CoordinatorBuilder {
    config: NavigatorConfig,
    root_members: Vec<Destination>,
    registry: LayoutRegistry,
    deep_link_parser: Option<Arc<dyn DeepLinkParser>>,
    listeners: Vec<Arc<dyn NavListener>>,
}

impl Debug for CoordinatorBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorBuilder")
            .field("config", &self.config)
            .field("root_members", &self.root_members)
            .field("registry", &self.registry)
            .field("deep_link_parser", &self.deep_link_parser.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CoordinatorBuilder {
    #[must_use]
    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial entries of the root path: the members of a fixed root, or the initial
    /// stack (bottom first) of a mutable one.
    #[must_use]
    pub fn root_members(mut self, members: Vec<Destination>) -> Self {
        self.root_members = members;
        self
    }

    #[must_use]
    pub fn register_layout_constructor(
        mut self,
        key: impl Into<LayoutKey>,
        factory: impl Fn() -> NavigatorResult<Layout> + Send + Sync + 'static,
    ) -> Self {
        self.registry.register(key, factory);
        self
    }

    #[must_use]
    pub fn deep_link_parser(mut self, parser: impl DeepLinkParser + 'static) -> Self {
        self.deep_link_parser = Some(Arc::new(parser));
        self
    }

    #[must_use]
    pub fn listener(mut self, listener: impl NavListener + 'static) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    /// # Errors
    ///
    /// A root member that can't be bound, or is listed twice.
    pub fn build(self) -> NavigatorResult<Coordinator> {
        let id = CoordinatorId::new();
        let label = self.config.root_label.clone();

        let root_path = match self.config.root_kind {
            PathKind::Fixed => Path::new_fixed(label, self.root_members)?,
            PathKind::Mutable => {
                for (index, member) in self.root_members.iter().enumerate() {
                    member.ensure_bindable()?;
                    if self.root_members[..index]
                        .iter()
                        .any(|it| it.same_instance(member))
                    {
                        return Err(NavError::DestinationAlreadyBound {
                            destination: member.id().to_string(),
                        }
                        .into());
                    }
                }
                let mut path = Path::new_mutable(label);
                for member in self.root_members {
                    let _unused = path.push(member)?;
                }
                path
            }
        };

        let mut arena = PathArena::new(id);
        let root = arena.add_new_path(root_path, None, None);

        tracing::debug!(
            message = "coordinator built",
            id = %id,
            root_kind = %self.config.root_kind,
            layouts = self.registry.len()
        );

        Ok(Coordinator::from_inner(CoordinatorInner {
            id,
            config: self.config,
            gate: Mutex::new(()),
            state: RwLock::new(NavState {
                arena,
                root,
                registry: self.registry,
                instances: LayoutInstances::default(),
            }),
            listeners: RwLock::new(self.listeners),
            deep_link_parser: self.deep_link_parser,
        }))
    }
}
