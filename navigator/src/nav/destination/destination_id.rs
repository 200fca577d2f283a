// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeMap,
          fmt::{Display, Formatter, Result}};

use serde::{Deserialize, Serialize};

/// Stable identity of a [`crate::Destination`]. Two destinations are equal iff their ids
/// are equal, so the same logical place pushed twice, or round-tripped through a deep
/// link, compares equal.
///
/// The arguments are kept in a [`BTreeMap`] so that the order in which they're added
/// never affects equality, hashing or [`Display`].
///
/// ```
/// use r3bl_navigator::DestinationId;
///
/// let a = DestinationId::new("detail").with_arg("id", "1");
/// let b = DestinationId::new("detail").with_arg("id", "1");
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "detail(id=1)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DestinationId {
    name: String,
    args: BTreeMap<String, String>,
}

impl DestinationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&str> { self.args.get(key).map(String::as_str) }

    #[must_use]
    pub fn args(&self) -> &BTreeMap<String, String> { &self.args }
}

impl Display for DestinationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (index, (key, value)) in self.args.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, ")")
    }
}

impl From<&str> for DestinationId {
    fn from(name: &str) -> Self { Self::new(name) }
}

/// Key of a layout: the container destination that owns a child [`crate::Path`]. A
/// destination names the layout it lives in via its parent key, and a layout destination
/// names the key it is the container for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayoutKey(String);

impl LayoutKey {
    pub fn new(key: impl Into<String>) -> Self { Self(key.into()) }

    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Display for LayoutKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "{}", self.0) }
}

impl From<&str> for LayoutKey {
    fn from(key: &str) -> Self { Self::new(key) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_arg_order_does_not_matter() {
        let a = DestinationId::new("login")
            .with_arg("intended", "profile")
            .with_arg("reason", "auth");
        let b = DestinationId::new("login")
            .with_arg("reason", "auth")
            .with_arg("intended", "profile");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "login(intended=profile, reason=auth)");
    }

    #[test]
    fn test_bare_name_display() {
        assert_eq!(DestinationId::from("home").to_string(), "home");
        assert_eq!(DestinationId::from("home").arg("id"), None);
    }
}
