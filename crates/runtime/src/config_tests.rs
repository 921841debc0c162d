// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn wal_and_checkpoint_paths_are_nested_under_data_root() {
    let config = RuntimeConfig {
        data_root: PathBuf::from("/tmp/orgloop-test"),
        port: DEFAULT_PORT,
        metrics_port: None,
        heartbeat_enabled: false,
    };
    assert_eq!(config.wal_path(), PathBuf::from("/tmp/orgloop-test/data/wal/events.jsonl"));
    assert_eq!(config.checkpoints_dir(), PathBuf::from("/tmp/orgloop-test/data/checkpoints"));
    assert_eq!(config.heartbeat_path(), PathBuf::from("/tmp/orgloop-test/heartbeat"));
    assert_eq!(config.pid_path(), PathBuf::from("/tmp/orgloop-test/orgloop.pid"));
}

#[test]
fn port_defaults_when_env_var_unset() {
    std::env::remove_var("ORGLOOP_PORT");
    assert_eq!(port(), DEFAULT_PORT);
}

#[test]
fn metrics_port_is_none_when_unset() {
    std::env::remove_var("ORGLOOP_METRICS_PORT");
    assert_eq!(metrics_port(), None);
}
