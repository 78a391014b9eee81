use std::path::PathBuf;

use ancine_dashboard::config::DashboardConfig;
use ancine_dashboard::error::DashboardError;

#[test]
fn defaults_apply_without_a_settings_file() {
    let missing = std::env::temp_dir().join("ancine_dashboard_no_such_settings");
    let config = DashboardConfig::load(missing.to_str().unwrap()).expect("defaults");
    assert_eq!(config.database, PathBuf::from("ancine.db"));
    assert_eq!(config.listen, "127.0.0.1:8080");
    assert_eq!(config.log_level, "info");
    assert_eq!(config.title, "Dados Ancine");
    assert!(!config.concurrent);
}

#[test]
fn settings_file_overrides_defaults() {
    let base = std::env::temp_dir().join("ancine_dashboard_settings_override");
    let file = base.with_extension("toml");
    std::fs::write(&file, "database = \"/srv/ancine/ancine.db\"\nconcurrent = true\nlog_level = \"debug\"\n").unwrap();
    let config = DashboardConfig::load(base.to_str().unwrap()).expect("loaded");
    assert_eq!(config.database, PathBuf::from("/srv/ancine/ancine.db"));
    assert!(config.concurrent);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.listen, "127.0.0.1:8080");
    let _ = std::fs::remove_file(&file);
}

#[test]
fn blank_title_is_a_config_error() {
    let base = std::env::temp_dir().join("ancine_dashboard_settings_blank_title");
    let file = base.with_extension("toml");
    std::fs::write(&file, "title = \"  \"\n").unwrap();
    let err = DashboardConfig::load(base.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, DashboardError::Config(_)));
    let _ = std::fs::remove_file(&file);
}
