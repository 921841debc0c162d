// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_core::FakeClock;

#[test]
fn clean_exit_never_restarts() {
    let mut policy = RestartPolicy::new(RestartPolicyConfig::default());
    let clock = FakeClock::new();
    let decision = policy.on_child_exit(Some(0), Duration::from_secs(5), &clock);
    assert_eq!(decision, RestartDecision::CleanExit);
}

#[test]
fn abnormal_exit_schedules_restart_with_doubling_backoff() {
    let mut policy = RestartPolicy::new(RestartPolicyConfig::default());
    let clock = FakeClock::new();

    let first = policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);
    assert_eq!(first, RestartDecision::Restart { after: Duration::from_secs(1) });

    let second = policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);
    assert_eq!(second, RestartDecision::Restart { after: Duration::from_secs(2) });

    let third = policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);
    assert_eq!(third, RestartDecision::Restart { after: Duration::from_secs(4) });
}

#[test]
fn backoff_caps_at_max() {
    let mut policy = RestartPolicy::new(RestartPolicyConfig {
        initial_backoff: Duration::from_secs(20),
        max_backoff: Duration::from_secs(30),
        max_restarts_per_window: 100,
        ..RestartPolicyConfig::default()
    });
    let clock = FakeClock::new();

    let first = policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);
    assert_eq!(first, RestartDecision::Restart { after: Duration::from_secs(20) });
    assert_eq!(policy.current_backoff(), Duration::from_secs(30));

    let second = policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);
    assert_eq!(second, RestartDecision::Restart { after: Duration::from_secs(30) });
}

#[test]
fn surviving_past_stable_threshold_resets_backoff_and_window() {
    let mut policy = RestartPolicy::new(RestartPolicyConfig::default());
    let clock = FakeClock::new();

    policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);
    policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);
    assert_eq!(policy.current_backoff(), Duration::from_secs(4));
    assert_eq!(policy.window_restart_count(), 2);

    let decision = policy.on_child_exit(Some(1), Duration::from_secs(90), &clock);
    assert_eq!(decision, RestartDecision::Restart { after: Duration::from_secs(1) });
    assert_eq!(policy.window_restart_count(), 1);
}

#[test]
fn window_expiry_resets_the_restart_count_without_touching_backoff() {
    let mut policy = RestartPolicy::new(RestartPolicyConfig::default());
    let clock = FakeClock::new();

    policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);
    clock.advance(Duration::from_secs(6 * 60));
    let decision = policy.on_child_exit(Some(1), Duration::from_millis(10), &clock);

    assert_eq!(policy.window_restart_count(), 1);
    assert_eq!(decision, RestartDecision::Restart { after: Duration::from_secs(2) });
}

#[test]
fn exceeding_max_restarts_in_window_declares_crash_loop() {
    let mut policy = RestartPolicy::new(RestartPolicyConfig {
        max_restarts_per_window: 3,
        ..RestartPolicyConfig::default()
    });
    let clock = FakeClock::new();

    assert!(matches!(
        policy.on_child_exit(Some(1), Duration::from_millis(10), &clock),
        RestartDecision::Restart { .. }
    ));
    assert!(matches!(
        policy.on_child_exit(Some(1), Duration::from_millis(10), &clock),
        RestartDecision::Restart { .. }
    ));
    assert_eq!(
        policy.on_child_exit(Some(1), Duration::from_millis(10), &clock),
        RestartDecision::CrashLoop
    );
}

#[test]
fn killed_by_signal_is_treated_as_abnormal() {
    let mut policy = RestartPolicy::new(RestartPolicyConfig::default());
    let clock = FakeClock::new();
    let decision = policy.on_child_exit(None, Duration::from_millis(10), &clock);
    assert!(matches!(decision, RestartDecision::Restart { .. }));
}
