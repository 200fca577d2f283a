// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          sync::Arc};

use rustc_hash::FxHashMap;

use crate::{Destination, LayoutKey, NavError, NavigatorResult, PathKind};

/// Shape of the child path a [`Layout`] owns.
#[derive(Debug, Clone)]
pub enum ChildPathSpec {
    Mutable { label: String },
    Fixed { label: String, members: Vec<Destination> },
}

impl ChildPathSpec {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            ChildPathSpec::Mutable { label } | ChildPathSpec::Fixed { label, .. } => label,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PathKind {
        match self {
            ChildPathSpec::Mutable { .. } => PathKind::Mutable,
            ChildPathSpec::Fixed { .. } => PathKind::Fixed,
        }
    }
}

/// What a layout constructor builds: the container destination plus the shape of the
/// child path it owns. The destination must be a layout for the key it was registered
/// under (see [`crate::DestinationBuilder::layout`]).
#[derive(Debug, Clone)]
pub struct Layout {
    pub destination: Destination,
    pub child: ChildPathSpec,
}

impl Layout {
    /// Child path is a stack, labelled after the layout key.
    #[must_use]
    pub fn with_mutable_child(destination: Destination) -> Self {
        let label = Self::label_for(&destination);
        Self {
            destination,
            child: ChildPathSpec::Mutable { label },
        }
    }

    /// Child path is fixed (eg: tabs), labelled after the layout key.
    #[must_use]
    pub fn with_fixed_child(destination: Destination, members: Vec<Destination>) -> Self {
        let label = Self::label_for(&destination);
        Self {
            destination,
            child: ChildPathSpec::Fixed { label, members },
        }
    }

    fn label_for(destination: &Destination) -> String {
        destination
            .layout_key()
            .map_or_else(|| destination.id().to_string(), ToString::to_string)
    }
}

/// Builds a fresh [`Layout`] every time it is called.
pub type LayoutFactory = Arc<dyn Fn() -> NavigatorResult<Layout> + Send + Sync>;

/// Per coordinator map from [`LayoutKey`] to the constructor of that layout.
#[derive(Clone, Default)]
pub struct LayoutRegistry {
    factories: FxHashMap<LayoutKey, LayoutFactory>,
}

impl Debug for LayoutRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl LayoutRegistry {
    /// Registering a key again replaces the previous constructor.
    pub fn register(
        &mut self,
        key: impl Into<LayoutKey>,
        factory: impl Fn() -> NavigatorResult<Layout> + Send + Sync + 'static,
    ) {
        self.factories.insert(key.into(), Arc::new(factory));
    }

    /// # Errors
    ///
    /// [`NavError::MissingLayoutConstructor`].
    pub fn resolve(&self, key: &LayoutKey) -> NavigatorResult<LayoutFactory> {
        self.factories.get(key).cloned().ok_or_else(|| {
            NavError::MissingLayoutConstructor {
                key: key.to_string(),
            }
            .into()
        })
    }

    /// Run the constructor for `key` and check that it built a layout for `key`.
    ///
    /// # Errors
    ///
    /// [`NavError::MissingLayoutConstructor`], [`NavError::LayoutKeyMismatch`], or
    /// whatever the constructor returned.
    pub fn build(&self, key: &LayoutKey) -> NavigatorResult<Layout> {
        let layout = (self.resolve(key)?)()?;
        match layout.destination.layout_key() {
            Some(built) if built == key => Ok(layout),
            other => Err(NavError::LayoutKeyMismatch {
                registered: key.to_string(),
                built: other.map_or_else(
                    || format!("{} (not a layout)", layout.destination.id()),
                    ToString::to_string,
                ),
            }
            .into()),
        }
    }

    #[must_use]
    pub fn contains(&self, key: &LayoutKey) -> bool { self.factories.contains_key(key) }

    #[must_use]
    pub fn len(&self) -> usize { self.factories.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.factories.is_empty() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_constructor() {
        let registry = LayoutRegistry::default();
        let err = registry.build(&LayoutKey::new("tabs")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::MissingLayoutConstructor { key: "tabs".into() })
        );
    }

    #[test]
    fn test_key_mismatch() {
        let mut registry = LayoutRegistry::default();
        registry.register("tabs", || {
            Ok(Layout::with_mutable_child(
                Destination::builder("settings").layout("settings").build(),
            ))
        });
        let err = registry.build(&LayoutKey::new("tabs")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NavError>(),
            Some(&NavError::LayoutKeyMismatch {
                registered: "tabs".into(),
                built: "settings".into()
            })
        );
    }

    #[test]
    fn test_build_uses_key_as_label() {
        let mut registry = LayoutRegistry::default();
        registry.register("search", || {
            Ok(Layout::with_mutable_child(
                Destination::builder("search_shell").layout("search").build(),
            ))
        });
        let layout = registry.build(&LayoutKey::new("search")).unwrap();
        assert_eq!(layout.child.label(), "search");
        assert_eq!(layout.child.kind(), PathKind::Mutable);
        assert!(registry.contains(&LayoutKey::new("search")));
    }
}
