//! Derived directory table of an install.
//!
//! Everything is computed from the canonical entry directory, except the class paths
//! which are taken verbatim from the configuration when present.

use sfa_domain::config::BootConfig;
use sfa_domain::module::{ModuleRoot, ModuleSpec};
use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

#[sfa_derive::sfa_error]
pub enum PathError {
    /// The entry directory could not be canonicalized.
    #[error("Cannot resolve path{}: {source}", format_context(.context))]
    Resolve { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Not a directory{}: {message}", format_context(.context))]
    NotADirectory { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Directories every later stage reads from. Built once, then shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Canonical directory the admin panel runs from.
    pub entry_dir: PathBuf,
    pub html_root: PathBuf,
    pub data_dir: PathBuf,
    pub class_path: PathBuf,
    pub class_ex_path: PathBuf,
    pub update_dir: PathBuf,
}

impl ResolvedPaths {
    /// Resolves the entry directory and derives the remaining paths from it.
    ///
    /// # Errors
    /// [`PathError::Resolve`] when the entry directory does not exist or cannot be
    /// canonicalized, [`PathError::NotADirectory`] when it names a file.
    pub fn resolve(config: &BootConfig) -> Result<Self, PathError> {
        let entry_dir = resolve_base_dir(&config.paths.entry_dir)?;
        let html_root = normalize(&entry_dir.join(".."));
        let data_dir = normalize(&html_root.join(&config.paths.html_to_data));

        let class_path =
            config.paths.class_path.clone().unwrap_or_else(|| data_dir.join("class"));
        let class_ex_path =
            config.paths.class_ex_path.clone().unwrap_or_else(|| data_dir.join("class_extends"));
        let update_dir = config
            .update
            .dir
            .clone()
            .unwrap_or_else(|| data_dir.join("downloads").join("update"));

        let paths = Self { entry_dir, html_root, data_dir, class_path, class_ex_path, update_dir };
        debug!(
            entry = %paths.entry_dir.display(),
            data = %paths.data_dir.display(),
            class = %paths.class_path.display(),
            "Resolved install paths"
        );
        Ok(paths)
    }

    #[must_use]
    pub fn root(&self, root: ModuleRoot) -> &Path {
        match root {
            ModuleRoot::Data => &self.data_dir,
            ModuleRoot::Class => &self.class_path,
            ModuleRoot::ClassEx => &self.class_ex_path,
        }
    }

    /// Absolute location of a module's file.
    #[must_use]
    pub fn module_path(&self, spec: &ModuleSpec) -> PathBuf {
        self.root(spec.root).join(&spec.path)
    }
}

/// Canonicalizes `entry` (the equivalent of `realpath`).
///
/// # Errors
/// See [`ResolvedPaths::resolve`].
pub fn resolve_base_dir(entry: &Path) -> Result<PathBuf, PathError> {
    let canonical = fs::canonicalize(entry)
        .context(format!("entry directory {}", entry.display()))?;

    if !canonical.is_dir() {
        return Err(PathError::NotADirectory {
            message: canonical.display().to_string().into(),
            context: Some("entry directory".into()),
        });
    }
    Ok(canonical)
}

/// Lexically removes `.` and `..` components without touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
