//! Integration test for loading engine configuration files.

use graft_engine::{EngineConfig, GraftError};
use graft_shared::{Language, Vec2};

fn temp_config_path() -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_graft_config_{id}.toml"))
}

#[test]
fn test_load_reads_file() {
    let path = temp_config_path();
    std::fs::write(
        &path,
        r#"
            fallback_language = "German"

            [paths]
            content = "Frame/Body"

            [layout]
            cell_size = { x = 320.0, y = 72.0 }

            [attach]
            max_attempts = 12
        "#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.paths.content, "Frame/Body");
    assert_eq!(config.paths.tabs, "Tabs");
    assert_eq!(config.layout.cell_size, Vec2::new(320.0, 72.0));
    assert_eq!(config.attach.max_attempts, 12);
    assert_eq!(
        config.attach.language_poll_interval,
        EngineConfig::default().attach.language_poll_interval
    );
    assert_eq!(config.fallback_language, Language::German);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_empty_file_is_default() {
    let path = temp_config_path();
    std::fs::write(&path, "").unwrap();

    assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_reports_parse_error() {
    let path = temp_config_path();
    std::fs::write(&path, "[attach]\nmax_attempts = -\n").unwrap();

    assert!(matches!(EngineConfig::load(&path), Err(GraftError::Config(_))));

    std::fs::remove_file(&path).ok();
}
