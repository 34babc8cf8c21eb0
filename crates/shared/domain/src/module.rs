//! Module descriptors: what to load, from which root, after which other modules.

use serde::Deserialize;
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::path::PathBuf;

/// Identifier of a loadable module, unique within a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Cow<'static, str>);

impl ModuleId {
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ModuleId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

/// Path constant a module path is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleRoot {
    /// The data directory (configuration, includes, vendored libraries).
    Data,
    /// Base classes.
    Class,
    /// Site-specific extensions of the base classes.
    ClassEx,
}

impl fmt::Display for ModuleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Data => "data",
            Self::Class => "class",
            Self::ClassEx => "class_ex",
        })
    }
}

/// One entry of a module manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleSpec {
    pub id: ModuleId,
    pub root: ModuleRoot,
    pub path: PathBuf,
    #[serde(default)]
    pub depends_on: Vec<ModuleId>,
}

impl ModuleSpec {
    #[must_use]
    pub fn new(id: impl Into<ModuleId>, root: ModuleRoot, path: impl Into<PathBuf>) -> Self {
        Self { id: id.into(), root, path: path.into(), depends_on: Vec::new() }
    }

    #[must_use]
    pub fn after<I>(mut self, deps: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ModuleId>,
    {
        self.depends_on.extend(deps.into_iter().map(Into::into));
        self
    }
}
