use sfa_logger::{LevelFilter, Logger};

#[test]
fn admin_logger_without_directory_stays_on_console() {
    let logger = Logger::builder()
        .name("sfa-admin-console")
        .level(LevelFilter::DEBUG)
        .init()
        .expect("console logger initializes");

    tracing::info!(module = "SC_Query", size = 128_u64, "Module loaded");
    tracing::debug!(outcome = "ready", "Bootstrap finished");

    assert!(!logger.writes_files());
}
