use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration of the admin bootstrap.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootConfigInner {
    pub paths: PathsConfig,
    pub install: InstallConfig,
    pub update: UpdateConfig,
    pub manifest: ManifestConfig,
    pub log: LogConfig,
}

/// Arc-wrapped config, built once at process start and handed to every consumer.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct BootConfig {
    #[serde(flatten, default)]
    inner: Arc<BootConfigInner>,
}

impl Deref for BootConfig {
    type Target = BootConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for BootConfig {
    fn deref_mut(&mut self) -> &mut BootConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Directory layout of the install.
///
/// `class_path` and `class_ex_path` are optional: when unset they are derived from the
/// data directory, when set they are used as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory the admin panel runs from, e.g. `html/admin`.
    pub entry_dir: PathBuf,
    /// Data directory relative to the html root (the parent of `entry_dir`).
    pub html_to_data: PathBuf,
    pub class_path: Option<PathBuf>,
    pub class_ex_path: Option<PathBuf>,
    /// URL prefix the storefront is mounted under.
    pub url_dir: String,
}

/// Install-state check settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Forces the install to be treated as complete.
    pub installed: bool,
    /// Marker written by the installer, relative to the data directory.
    pub marker: PathBuf,
    /// Installer directory name under the html root.
    pub installer_dir: String,
}

/// Update-module loader settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub enabled: bool,
    /// Overrides `<data dir>/downloads/update`.
    pub dir: Option<PathBuf>,
}

/// Optional TOML manifest replacing the built-in module list.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            entry_dir: PathBuf::from("html/admin"),
            html_to_data: PathBuf::from("../data"),
            class_path: None,
            class_ex_path: None,
            url_dir: "/".to_owned(),
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            installed: false,
            marker: PathBuf::from("install.php"),
            installer_dir: "install".to_owned(),
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self { enabled: true, dir: None }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}
