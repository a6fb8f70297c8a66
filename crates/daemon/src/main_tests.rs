use super::*;

#[test]
fn flag_finds_value_following_name() {
    let args = vec!["--lane".to_string(), "impl".to_string(), "--shard".to_string(), "s0".to_string()];
    assert_eq!(flag(&args, "--lane"), Some("impl"));
    assert_eq!(flag(&args, "--shard"), Some("s0"));
    assert_eq!(flag(&args, "--missing"), None);
}

#[test]
fn flag_with_trailing_name_and_no_value_returns_none() {
    let args = vec!["--lane".to_string()];
    assert_eq!(flag(&args, "--lane"), None);
}

#[test]
fn rotate_log_if_needed_ignores_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    rotate_log_if_needed(&dir.path().join("no-such.log"));
}

#[test]
fn rotate_log_if_needed_rotates_when_oversized() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("daemon.log");
    let big = vec![0u8; (MAX_LOG_SIZE + 1) as usize];
    std::fs::write(&log_path, &big).unwrap();

    rotate_log_if_needed(&log_path);

    assert!(!log_path.exists());
    assert!(dir.path().join("daemon.log.1").exists());
}

#[test]
fn acquire_lock_rejects_second_holder() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join("daemon.pid");
    let _first = acquire_lock(&lock_path).unwrap();
    assert!(acquire_lock(&lock_path).is_err());
}
