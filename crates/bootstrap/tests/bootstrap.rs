mod fixtures;

use fixtures::Install;
use sfa_bootstrap::domain::module::ModuleId;
use sfa_bootstrap::manifest::builtin_ids;
use sfa_bootstrap::{
    BootError, BootOutcome, Bootstrap, HookContext, HookOutcome, InstallCheck, ModuleLoader,
    RequestInfo, UpdateModuleLoader,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

type Journal = Rc<RefCell<Vec<&'static str>>>;

#[derive(Debug)]
struct RecordingInstall {
    journal: Journal,
    halt: bool,
}

impl InstallCheck for RecordingInstall {
    fn check_install(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome, BootError> {
        self.journal.borrow_mut().push("install");
        if self.halt {
            Ok(HookOutcome::Halt(BootOutcome::Redirect { location: "./install/".to_owned() }))
        } else {
            Ok(HookOutcome::Continue)
        }
    }
}

#[derive(Debug)]
struct RecordingUpdate {
    journal: Journal,
}

impl UpdateModuleLoader for RecordingUpdate {
    fn load_update_module(
        &self,
        ctx: &HookContext<'_>,
        loader: &mut ModuleLoader,
    ) -> Result<HookOutcome, BootError> {
        assert_eq!(loader.registry().len(), 26, "update hook must see the full module set");
        assert!(ctx.paths.class_path.ends_with("class"));
        self.journal.borrow_mut().push("update");
        Ok(HookOutcome::Continue)
    }
}

#[derive(Debug)]
struct FailingInstall {
    journal: Journal,
}

impl InstallCheck for FailingInstall {
    fn check_install(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome, BootError> {
        self.journal.borrow_mut().push("install");
        Err(BootError::Hook { message: "install state unreadable".into(), context: None })
    }
}

#[derive(Debug)]
struct FailingUpdate {
    journal: Journal,
}

impl UpdateModuleLoader for FailingUpdate {
    fn load_update_module(
        &self,
        _ctx: &HookContext<'_>,
        _loader: &mut ModuleLoader,
    ) -> Result<HookOutcome, BootError> {
        self.journal.borrow_mut().push("update");
        Err(BootError::Hook { message: "update script rejected".into(), context: None })
    }
}

fn recording_bootstrap(install: &Install, halt: bool) -> (Bootstrap, Journal) {
    let journal = Journal::default();
    let boot = Bootstrap::builder()
        .config(install.config())
        .install_check(RecordingInstall { journal: journal.clone(), halt })
        .update_loader(RecordingUpdate { journal: journal.clone() })
        .build()
        .expect("bootstrap builds");
    (boot, journal)
}

#[test]
fn complete_install_boots_ready_with_hooks_in_order() {
    let install = Install::complete();
    let (mut boot, journal) = recording_bootstrap(&install, false);

    let report = boot.run(&RequestInfo::script("/admin/index.php")).expect("bootstrap runs");

    assert!(report.is_ready());
    assert_eq!(report.loaded, builtin_ids());
    assert!(report.skipped.is_empty());
    assert_eq!(*journal.borrow(), ["install", "update"]);
}

#[test]
fn every_module_is_registered_exactly_once() {
    let install = Install::complete();
    let mut boot = Bootstrap::builder().config(install.config()).build().expect("builds");
    boot.run(&RequestInfo::default()).expect("bootstrap runs");

    let registry = boot.registry();
    assert_eq!(registry.len(), builtin_ids().len());
    for id in builtin_ids() {
        let module = registry.get(id.as_str()).expect("module registered");
        assert_eq!(module.checksum.len(), 64);
        assert!(module.size > 0);
    }
}

#[test]
fn second_run_reuses_paths_and_loads_nothing() {
    let install = Install::complete();
    let (mut boot, journal) = recording_bootstrap(&install, false);

    let first = boot.run(&RequestInfo::default()).expect("first run");
    let second = boot.run(&RequestInfo::default()).expect("second run");

    assert_eq!(first.paths, second.paths);
    assert!(second.loaded.is_empty());
    assert_eq!(second.skipped, builtin_ids());
    assert_eq!(boot.registry().len(), 26);
    assert_eq!(*journal.borrow(), ["install", "update", "install", "update"]);
}

#[test]
fn configured_class_path_is_never_redefined() {
    let install = Install::complete();
    let mut cfg = install.config();
    let class_path = install.root().join("data").join("class");
    cfg.paths.class_path = Some(class_path.clone());

    let mut boot = Bootstrap::builder().config(cfg).build().expect("builds");
    let first = boot.run(&RequestInfo::default()).expect("first run");
    let second = boot.run(&RequestInfo::default()).expect("second run");

    assert_eq!(first.paths.class_path, class_path);
    assert_eq!(second.paths.class_path, class_path);
}

#[test]
fn any_missing_module_aborts_before_hooks() {
    for id in builtin_ids() {
        let install = Install::complete();
        install.remove_module(id.as_str());
        let (mut boot, journal) = recording_bootstrap(&install, false);

        let err = boot.run(&RequestInfo::default()).expect_err("missing module must abort");

        assert!(matches!(err, BootError::ModuleMissing { .. }), "{id}: unexpected {err}");
        assert!(err.is_load_failure());
        assert!(err.to_string().contains(id.as_str()));
        assert!(journal.borrow().is_empty(), "{id}: hooks ran despite failure");
    }
}

#[test]
fn halting_install_check_skips_update_loader() {
    let install = Install::complete();
    let (mut boot, journal) = recording_bootstrap(&install, true);

    let report = boot.run(&RequestInfo::default()).expect("bootstrap runs");

    assert_eq!(report.outcome, BootOutcome::Redirect { location: "./install/".to_owned() });
    assert_eq!(*journal.borrow(), ["install"]);
}

#[test]
fn missing_entry_dir_is_a_base_path_error() {
    let install = Install::complete();
    let mut cfg = install.config();
    cfg.paths.entry_dir = PathBuf::from(install.root()).join("html").join("missing");

    let mut boot = Bootstrap::builder().config(cfg).build().expect("builds");
    let err = boot.run(&RequestInfo::default()).expect_err("unresolvable entry must fail");

    assert!(matches!(err, BootError::BasePath { .. }));
    assert!(boot.paths().is_none());
    assert!(boot.registry().is_empty());
}

#[test]
fn manifest_file_from_config_is_used() {
    let install = Install::complete();
    let manifest = install.write_data(
        "modules.toml",
        r#"
        [[module]]
        id = "SC_Query"
        root = "class"
        path = "SC_Query.php"
        depends_on = ["conf"]

        [[module]]
        id = "conf"
        root = "data"
        path = "conf/conf.php"
        "#,
    );
    let mut cfg = install.config();
    cfg.manifest.path = Some(manifest);

    let mut boot = Bootstrap::builder().config(cfg).build().expect("builds");
    let report = boot.run(&RequestInfo::default()).expect("bootstrap runs");

    assert_eq!(report.loaded, vec![ModuleId::from("conf"), ModuleId::from("SC_Query")]);
}

#[test]
fn unreadable_manifest_file_fails_build() {
    let install = Install::complete();
    let mut cfg = install.config();
    cfg.manifest.path = Some(install.root().join("absent.toml"));

    let err = Bootstrap::builder().config(cfg).build().expect_err("missing manifest must fail");
    assert!(matches!(err, BootError::Io { .. }));
}

#[test]
fn failing_install_check_aborts_before_update_loader() {
    let install = Install::complete();
    let journal = Journal::default();
    let mut boot = Bootstrap::builder()
        .config(install.config())
        .install_check(FailingInstall { journal: journal.clone() })
        .update_loader(RecordingUpdate { journal: journal.clone() })
        .build()
        .expect("bootstrap builds");

    let err = boot.run(&RequestInfo::default()).expect_err("hook failure must abort");

    assert!(matches!(err, BootError::Hook { .. }), "unexpected {err}");
    assert!(!err.is_load_failure());
    assert!(err.to_string().contains("install state unreadable"));
    assert_eq!(*journal.borrow(), ["install"]);
}

#[test]
fn failing_update_loader_aborts_the_run() {
    let install = Install::complete();
    let journal = Journal::default();
    let mut boot = Bootstrap::builder()
        .config(install.config())
        .install_check(RecordingInstall { journal: journal.clone(), halt: false })
        .update_loader(FailingUpdate { journal: journal.clone() })
        .build()
        .expect("bootstrap builds");

    let err = boot.run(&RequestInfo::script("/admin/index.php")).expect_err("hook failure must abort");

    assert!(matches!(err, BootError::Hook { .. }), "unexpected {err}");
    assert!(!err.is_load_failure());
    assert_eq!(*journal.borrow(), ["install", "update"]);
    assert_eq!(boot.registry().len(), 26, "modules stay loaded after a hook failure");
}
