// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[test]
fn newly_registered_source_is_due_immediately() {
    let mut scheduler = Scheduler::new();
    let now = Instant::now();
    scheduler.register("github", PollSchedule::Interval(Duration::from_secs(60)), now);

    let due = scheduler.due_sources(now, utc(2026, 7, 28, 0, 0));
    assert_eq!(due, vec!["github".to_string()]);
}

#[test]
fn interval_source_reschedules_after_firing() {
    let mut scheduler = Scheduler::new();
    let now = Instant::now();
    scheduler.register("github", PollSchedule::Interval(Duration::from_secs(60)), now);

    scheduler.due_sources(now, utc(2026, 7, 28, 0, 0));
    // Not due again immediately.
    assert!(scheduler.due_sources(now, utc(2026, 7, 28, 0, 0)).is_empty());
    // Due again after the interval elapses.
    let later = now + Duration::from_secs(61);
    let due = scheduler.due_sources(later, utc(2026, 7, 28, 0, 1));
    assert_eq!(due, vec!["github".to_string()]);
}

#[test]
fn cron_source_reschedules_to_its_next_cron_fire() {
    let mut scheduler = Scheduler::new();
    let now = Instant::now();
    let cron = CronSchedule::parse("0 9 * * *").unwrap();
    scheduler.register("digest", PollSchedule::Cron(cron), now);

    // First tick is immediate regardless of cron alignment.
    let due = scheduler.due_sources(now, utc(2026, 7, 28, 3, 0));
    assert_eq!(due, vec!["digest".to_string()]);

    // Not due again before 09:00.
    assert!(scheduler
        .due_sources(now + Duration::from_secs(1), utc(2026, 7, 28, 3, 0) + chrono::Duration::seconds(1))
        .is_empty());

    let deadline = scheduler.next_deadline().unwrap();
    assert!(deadline > now);
}

#[test]
fn cancel_removes_the_source_from_scheduling() {
    let mut scheduler = Scheduler::new();
    let now = Instant::now();
    scheduler.register("github", PollSchedule::Interval(Duration::from_secs(60)), now);
    scheduler.cancel("github");
    assert!(!scheduler.has_timers());
    assert!(scheduler.due_sources(now, utc(2026, 7, 28, 0, 0)).is_empty());
}

#[test]
fn next_deadline_is_the_earliest_across_all_sources() {
    let mut scheduler = Scheduler::new();
    let now = Instant::now();
    scheduler.register("fast", PollSchedule::Interval(Duration::from_secs(10)), now);
    scheduler.register("slow", PollSchedule::Interval(Duration::from_secs(600)), now);
    scheduler.due_sources(now, utc(2026, 7, 28, 0, 0));

    let deadline = scheduler.next_deadline().unwrap();
    assert_eq!(deadline, now + Duration::from_secs(10));
}
