// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_plugin::{FakeLogger, LogLevel, LogRecord};

fn record(kind: &str) -> LogRecord {
    LogRecord::new("github", LogLevel::Info, kind, "test")
}

#[tokio::test]
async fn dispatches_to_every_registered_logger() {
    let manager = LoggerManager::new();
    let a = FakeLogger::new();
    let b = FakeLogger::new();
    manager.register(Arc::new(a.clone()), None);
    manager.register(Arc::new(b.clone()), None);

    manager.log(record("deliver.attempt")).await;

    assert_eq!(a.kinds(), vec!["deliver.attempt"]);
    assert_eq!(b.kinds(), vec!["deliver.attempt"]);
}

#[tokio::test]
async fn one_failing_logger_does_not_stop_the_others() {
    let manager = LoggerManager::new();
    let failing = FakeLogger::new();
    failing.set_always_fails(true);
    let healthy = FakeLogger::new();
    manager.register(Arc::new(failing), None);
    manager.register(Arc::new(healthy.clone()), None);

    manager.log(record("deliver.success")).await;

    assert_eq!(healthy.kinds(), vec!["deliver.success"]);
}

#[tokio::test]
async fn remove_by_tag_drops_only_matching_entries() {
    let manager = LoggerManager::new();
    let tagged = FakeLogger::new();
    let untagged = FakeLogger::new();
    manager.register(Arc::new(tagged.clone()), Some("github-module".to_string()));
    manager.register(Arc::new(untagged.clone()), None);

    manager.remove_by_tag("github-module");
    assert_eq!(manager.len(), 1);

    manager.log(record("module.unloading")).await;
    assert!(tagged.records().is_empty());
    assert_eq!(untagged.kinds(), vec!["module.unloading"]);
}

#[tokio::test]
async fn shutdown_clears_every_entry() {
    let manager = LoggerManager::new();
    manager.register(Arc::new(FakeLogger::new()), None);
    assert_eq!(manager.len(), 1);

    manager.shutdown().await;
    assert!(manager.is_empty());
}

#[tokio::test]
async fn log_with_no_loggers_registered_is_a_no_op() {
    let manager = LoggerManager::new();
    manager.log(record("system.start")).await;
}
