//! Initialization hooks run after the module set is in place.
//!
//! The install-state check always runs first. The update-module loader runs second,
//! and only if the install check let the request through.

use crate::error::BootError;
use crate::loader::ModuleLoader;
use sfa_domain::config::BootConfig;
use sfa_domain::module::ModuleId;
use sfa_kernel::paths::ResolvedPaths;
use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// The request the bootstrap runs for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    /// Script path as seen by the web server, e.g. `/admin/index.php`.
    pub script: Option<String>,
}

impl RequestInfo {
    #[must_use]
    pub fn script(script: impl Into<String>) -> Self {
        Self { script: Some(script.into()) }
    }
}

/// How a bootstrap run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootOutcome {
    /// Every module is loaded and the request can be handled.
    Ready,
    /// The install is incomplete; the client must be sent to `location`.
    Redirect { location: String },
    /// An update script took over the request.
    ServedByUpdate { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Continue,
    Halt(BootOutcome),
}

/// Read-only view handed to each hook.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub config: &'a BootConfig,
    pub paths: &'a ResolvedPaths,
    pub request: &'a RequestInfo,
}

pub trait InstallCheck: Debug {
    /// Decides whether the install is complete enough to serve `ctx.request`.
    ///
    /// # Errors
    /// Implementations return [`BootError::Hook`] for failures they cannot decide on.
    fn check_install(&self, ctx: &HookContext<'_>) -> Result<HookOutcome, BootError>;
}

pub trait UpdateModuleLoader: Debug {
    /// Loads code delivered by an earlier update, registering it through `loader`.
    ///
    /// # Errors
    /// Load failures of the update script propagate as-is.
    fn load_update_module(
        &self,
        ctx: &HookContext<'_>,
        loader: &mut ModuleLoader,
    ) -> Result<HookOutcome, BootError>;
}

/// Install check backed by the installer's marker file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsInstallCheck;

impl InstallCheck for FsInstallCheck {
    fn check_install(&self, ctx: &HookContext<'_>) -> Result<HookOutcome, BootError> {
        let install = &ctx.config.install;
        let installed = install.installed || ctx.paths.data_dir.join(&install.marker).is_file();

        if !installed {
            let inside_installer = ctx.request.script.as_deref().is_some_and(|script| {
                is_installer_request(script, &ctx.config.paths.url_dir, &install.installer_dir)
            });
            if inside_installer {
                return Ok(HookOutcome::Continue);
            }

            let location = format!("./{}/", install.installer_dir);
            info!(%location, "Install not completed, redirecting to the installer");
            return Ok(HookOutcome::Halt(BootOutcome::Redirect { location }));
        }

        let installer_entry = ctx.paths.html_root.join(&install.installer_dir).join("index.php");
        if installer_entry.is_file() {
            warn!(
                path = %installer_entry.display(),
                "Installer is still reachable, delete it once installation is finished"
            );
        }

        Ok(HookOutcome::Continue)
    }
}

/// Serves requests from scripts dropped into the update directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsUpdateModuleLoader;

impl UpdateModuleLoader for FsUpdateModuleLoader {
    fn load_update_module(
        &self,
        ctx: &HookContext<'_>,
        loader: &mut ModuleLoader,
    ) -> Result<HookOutcome, BootError> {
        if !ctx.config.update.enabled {
            return Ok(HookOutcome::Continue);
        }
        let Some(script) = ctx.request.script.as_deref() else {
            return Ok(HookOutcome::Continue);
        };

        let relative = strip_url_dir(script, &ctx.config.paths.url_dir);
        if !is_contained(Path::new(relative)) {
            return Ok(HookOutcome::Continue);
        }

        let candidate = ctx.paths.update_dir.join(relative);
        if !candidate.is_file() {
            return Ok(HookOutcome::Continue);
        }

        loader.load_path(ModuleId::new(format!("update:{relative}")), &candidate)?;
        info!(path = %candidate.display(), "Request served by update module");

        Ok(HookOutcome::Halt(BootOutcome::ServedByUpdate { path: candidate }))
    }
}

/// Removes the storefront URL prefix from a script path.
fn strip_url_dir<'a>(script: &'a str, url_dir: &str) -> &'a str {
    script
        .strip_prefix(url_dir)
        .unwrap_or(script)
        .trim_start_matches('/')
}

/// Only the installer at the storefront root counts; `/admin/install/` does not.
fn is_installer_request(script: &str, url_dir: &str, installer_dir: &str) -> bool {
    strip_url_dir(script, url_dir)
        .strip_prefix(installer_dir)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Update scripts must stay inside the update directory.
fn is_contained(relative: &Path) -> bool {
    let mut components = relative.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}
