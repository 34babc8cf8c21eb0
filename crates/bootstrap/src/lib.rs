//! # Admin Bootstrap
//!
//! Brings the admin panel to a state where it can serve a request:
//! resolves the install paths, loads the module manifest in dependency order and
//! runs the install-state check followed by the update-module loader.
//!
//! ## Example
//! ```rust,no_run
//! use sfa_bootstrap::{BootOutcome, Bootstrap, RequestInfo};
//! use sfa_bootstrap::domain::config::BootConfig;
//!
//! # fn main() -> Result<(), sfa_bootstrap::BootError> {
//! let mut boot = Bootstrap::builder().config(BootConfig::default()).build()?;
//! let report = boot.run(&RequestInfo::script("/admin/index.php"))?;
//! assert_eq!(report.outcome, BootOutcome::Ready);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod hooks;
pub mod loader;
pub mod manifest;
pub mod resolver;

pub use crate::error::{BootError, BootErrorExt};
pub use crate::hooks::{
    BootOutcome, FsInstallCheck, FsUpdateModuleLoader, HookContext, HookOutcome, InstallCheck,
    RequestInfo, UpdateModuleLoader,
};
pub use crate::loader::{LoadStatus, ModuleLoader, ModuleRegistry};
pub use crate::manifest::ModuleManifest;
pub use sfa_domain as domain;
pub use sfa_kernel::paths::ResolvedPaths;

use sfa_domain::config::BootConfig;
use sfa_domain::module::ModuleId;
use tracing::{debug, info};

/// What a single [`Bootstrap::run`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootReport {
    pub paths: ResolvedPaths,
    /// Modules loaded by this run.
    pub loaded: Vec<ModuleId>,
    /// Manifest modules that were already present.
    pub skipped: Vec<ModuleId>,
    pub outcome: BootOutcome,
}

impl BootReport {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.outcome == BootOutcome::Ready
    }
}

/// Fluent builder for [`Bootstrap`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct BootstrapBuilder {
    config: BootConfig,
    manifest: Option<ModuleManifest>,
    install: Option<Box<dyn InstallCheck>>,
    update: Option<Box<dyn UpdateModuleLoader>>,
}

impl BootstrapBuilder {
    pub fn config(mut self, config: BootConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the manifest named in the config (or the built-in one).
    pub fn manifest(mut self, manifest: ModuleManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn install_check(mut self, check: impl InstallCheck + 'static) -> Self {
        self.install = Some(Box::new(check));
        self
    }

    pub fn update_loader(mut self, loader: impl UpdateModuleLoader + 'static) -> Self {
        self.update = Some(Box::new(loader));
        self
    }

    /// Picks the manifest and the hooks.
    ///
    /// Manifest precedence: [`Self::manifest`], then `manifest.path` from the config,
    /// then [`ModuleManifest::builtin`]. Hooks default to [`FsInstallCheck`] and
    /// [`FsUpdateModuleLoader`].
    ///
    /// # Errors
    /// Manifest file errors, see [`ModuleManifest::from_file`].
    pub fn build(self) -> Result<Bootstrap, BootError> {
        let manifest = match (self.manifest, &self.config.manifest.path) {
            (Some(manifest), _) => manifest,
            (None, Some(path)) => ModuleManifest::from_file(path)?,
            (None, None) => ModuleManifest::builtin(),
        };
        debug!(modules = manifest.len(), "Bootstrap manifest selected");

        Ok(Bootstrap {
            config: self.config,
            manifest,
            install: self.install.unwrap_or_else(|| Box::new(FsInstallCheck)),
            update: self.update.unwrap_or_else(|| Box::new(FsUpdateModuleLoader)),
            loader: ModuleLoader::new(),
            paths: None,
        })
    }
}

/// The admin startup sequence. Keep one per process and call [`Bootstrap::run`] per request;
/// paths and loaded modules carry over between runs.
#[derive(Debug)]
pub struct Bootstrap {
    config: BootConfig,
    manifest: ModuleManifest,
    install: Box<dyn InstallCheck>,
    update: Box<dyn UpdateModuleLoader>,
    loader: ModuleLoader,
    paths: Option<ResolvedPaths>,
}

impl Bootstrap {
    pub fn builder() -> BootstrapBuilder {
        BootstrapBuilder::default()
    }

    /// Runs the startup sequence.
    ///
    /// # Process
    /// 1. Resolves the install paths (first run only)
    /// 2. Resolves the manifest into a load order
    /// 3. Loads every module that is not loaded yet
    /// 4. Runs the install-state check
    /// 5. Runs the update-module loader unless step 4 halted
    ///
    /// Steps 4 and 5 never run if anything before them failed.
    ///
    /// # Errors
    /// Any [`BootError`]; the first failure aborts the run.
    pub fn run(&mut self, request: &RequestInfo) -> Result<BootReport, BootError> {
        let paths = match self.paths.take() {
            Some(paths) => paths,
            None => ResolvedPaths::resolve(&self.config)?,
        };
        let paths = &*self.paths.insert(paths);

        let order = self.manifest.resolve()?;
        let summary = self.loader.load_sequence(order, paths)?;

        let ctx = HookContext { config: &self.config, paths, request };
        let outcome = match self.install.check_install(&ctx)? {
            HookOutcome::Halt(outcome) => outcome,
            HookOutcome::Continue => match self.update.load_update_module(&ctx, &mut self.loader)? {
                HookOutcome::Halt(outcome) => outcome,
                HookOutcome::Continue => BootOutcome::Ready,
            },
        };

        info!(
            loaded = summary.loaded.len(),
            skipped = summary.skipped.len(),
            outcome = ?outcome,
            "Bootstrap finished"
        );

        Ok(BootReport { paths: paths.clone(), loaded: summary.loaded, skipped: summary.skipped, outcome })
    }

    #[must_use]
    pub const fn config(&self) -> &BootConfig {
        &self.config
    }

    #[must_use]
    pub const fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    #[must_use]
    pub const fn registry(&self) -> &ModuleRegistry {
        self.loader.registry()
    }

    /// Paths of the first run, if any run got that far.
    #[must_use]
    pub const fn paths(&self) -> Option<&ResolvedPaths> {
        self.paths.as_ref()
    }
}
