use super::*;
use serial_test::serial;

#[test]
#[serial]
fn load_uses_defaults_with_no_env_or_file() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SDLC_STATE_DIR", dir.path());
    std::env::remove_var("SDLC_SHARD_COUNT");
    std::env::remove_var("SDLC_POOL_SHUTDOWN_TIMEOUT");

    let config = DaemonConfig::load().unwrap();
    assert_eq!(config.engine.shard_count, 3);
    assert_eq!(config.pool_shutdown_timeout_secs, DEFAULT_POOL_SHUTDOWN_TIMEOUT_SECS);
    assert_eq!(config.db_path, dir.path().join("state.db"));

    std::env::remove_var("SDLC_STATE_DIR");
}

#[test]
#[serial]
fn env_override_beats_file_and_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "pool_shutdown_timeout_secs = 45\n").unwrap();
    std::env::set_var("SDLC_STATE_DIR", dir.path());
    std::env::set_var("SDLC_SHARD_COUNT", "7");

    let config = DaemonConfig::load().unwrap();
    assert_eq!(config.engine.shard_count, 7);
    assert_eq!(config.pool_shutdown_timeout_secs, 45);

    std::env::remove_var("SDLC_STATE_DIR");
    std::env::remove_var("SDLC_SHARD_COUNT");
}

#[test]
#[serial]
fn coverage_threshold_below_floor_is_clamped_not_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SDLC_STATE_DIR", dir.path());
    std::env::set_var("SDLC_COVERAGE_THRESHOLD", "10");

    let config = DaemonConfig::load().unwrap();
    assert_eq!(config.engine.coverage_threshold, sdlc_engine::MIN_COVERAGE_FLOOR);

    std::env::remove_var("SDLC_STATE_DIR");
    std::env::remove_var("SDLC_COVERAGE_THRESHOLD");
}
