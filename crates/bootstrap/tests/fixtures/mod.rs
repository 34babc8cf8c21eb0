#![allow(dead_code, unreachable_pub)]

use sfa_bootstrap::ModuleManifest;
use sfa_bootstrap::domain::config::BootConfig;
use sfa_bootstrap::domain::module::{ModuleRoot, ModuleSpec};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// A throwaway install laid out like the legacy storefront: `html/admin` + `data/...`.
pub struct Install {
    dir: TempDir,
}

impl Install {
    /// Every built-in module present and the installer marker written.
    pub fn complete() -> Self {
        let install = Self::without_marker();
        install.write_data("install.php", "<?php define('INSTALLED', true);");
        install
    }

    pub fn without_marker() -> Self {
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("html").join("admin")).expect("entry dir");
        let install = Self { dir };
        for spec in ModuleManifest::builtin().modules() {
            install.write_module(spec);
        }
        install
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> BootConfig {
        let mut cfg = BootConfig::default();
        cfg.paths.entry_dir = self.root().join("html").join("admin");
        cfg
    }

    pub fn module_file(&self, spec: &ModuleSpec) -> PathBuf {
        let data = self.root().join("data");
        let base = match spec.root {
            ModuleRoot::Data => data,
            ModuleRoot::Class => data.join("class"),
            ModuleRoot::ClassEx => data.join("class_extends"),
        };
        base.join(&spec.path)
    }

    pub fn write_module(&self, spec: &ModuleSpec) {
        let file = self.module_file(spec);
        fs::create_dir_all(file.parent().expect("parent")).expect("module dir");
        fs::write(file, format!("<?php class {} {{}}", spec.id)).expect("module file");
    }

    pub fn remove_module(&self, id: &str) {
        let manifest = ModuleManifest::builtin();
        let spec = manifest.get(id).expect("builtin module");
        fs::remove_file(self.module_file(spec)).expect("remove module");
    }

    pub fn write_data(&self, relative: &str, body: &str) -> PathBuf {
        let file = self.root().join("data").join(relative);
        fs::create_dir_all(file.parent().expect("parent")).expect("data dir");
        fs::write(&file, body).expect("data file");
        file
    }

    pub fn write_update_script(&self, relative: &str) -> PathBuf {
        self.write_data(&format!("downloads/update/{relative}"), "<?php echo 'patched';")
    }

    pub fn write_installer_entry(&self) {
        let dir = self.root().join("html").join("install");
        fs::create_dir_all(&dir).expect("installer dir");
        fs::write(dir.join("index.php"), "<?php").expect("installer entry");
    }
}
