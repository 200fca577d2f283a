// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::{Context, IntoDiagnostic};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAX_REDIRECT_DEPTH, NavigatorResult, PathKind, ROOT_PATH_LABEL};

/// Per [`crate::Coordinator`] configuration.
///
/// Every field has a default, so a JSON document only needs to name the fields it wants
/// to change:
///
/// ```
/// use r3bl_navigator::{NavigatorConfig, PathKind};
///
/// let config = NavigatorConfig::from_json_str(r#"{ "max_redirect_depth": 4 }"#).unwrap();
/// assert_eq!(config.max_redirect_depth, 4);
/// assert_eq!(config.root_kind, PathKind::Mutable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Maximum number of substitutions the redirect resolver performs before raising
    /// [`crate::NavError::RedirectCycle`].
    pub max_redirect_depth: usize,
    /// Debug label of the root path.
    pub root_label: String,
    /// Kind of the root path. Fixed roots get their members from
    /// [`crate::CoordinatorBuilder::root_members()`].
    pub root_kind: PathKind,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            max_redirect_depth: DEFAULT_MAX_REDIRECT_DEPTH,
            root_label: ROOT_PATH_LABEL.to_string(),
            root_kind: PathKind::Mutable,
        }
    }
}

impl NavigatorConfig {
    /// Parse a (possibly partial) configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` isn't a valid configuration document.
    pub fn from_json_str(json: &str) -> NavigatorResult<Self> {
        serde_json::from_str(json)
            .into_diagnostic()
            .wrap_err("Could not parse navigator config")
    }

    #[must_use]
    pub fn with_max_redirect_depth(mut self, depth: usize) -> Self {
        self.max_redirect_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = NavigatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, NavigatorConfig::default());
    }

    #[test]
    fn test_fixed_root_from_json() {
        let config =
            NavigatorConfig::from_json_str(r#"{ "root_label": "tabs", "root_kind": "Fixed" }"#)
                .unwrap();
        assert_eq!(config.root_label, "tabs");
        assert_eq!(config.root_kind, PathKind::Fixed);
        assert_eq!(config.max_redirect_depth, DEFAULT_MAX_REDIRECT_DEPTH);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let result = NavigatorConfig::from_json_str(r#"{ "max_redirect_depth": "many" }"#);
        assert!(result.is_err());
    }
}
