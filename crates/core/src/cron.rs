// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Five-field cron expression parsing and matching.
//!
//! Supports `*`, lists (`a,b,c`), ranges (`a-b`), and steps (`*/n`,
//! `a-b/n`) in each of the five fields: minute, hour, day-of-month, month,
//! day-of-week. When both day-of-month and day-of-week are restricted
//! (neither is a bare `*`), a date matches if it satisfies *either* field —
//! the standard cron OR rule.
//!
//! `previous_fire_before` implements the cron source's backward-scan: given
//! a point in time, find the most recent minute at or before it that the
//! expression would have fired on, by walking backward minute by minute.
//! This is what lets a cron source catch up on the single most recent
//! missed tick after downtime without replaying every minute it was down.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, Timelike, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CronParseError {
    #[error("cron expression must have exactly 5 fields, got {0}")]
    WrongFieldCount(usize),
    #[error("invalid field {field:?}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("field value {value} out of range [{min}, {max}] in {field:?}")]
    OutOfRange {
        field: String,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Maximum number of minutes to scan before giving up (roughly 4 years).
const MAX_SCAN_MINUTES: i64 = 4 * 366 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field(BTreeSet<u32>);

impl Field {
    fn parse(raw: &str, min: u32, max: u32, field_name: &str) -> Result<Self, CronParseError> {
        let mut values = BTreeSet::new();
        for part in raw.split(',') {
            values.extend(Self::parse_part(part, min, max, field_name)?);
        }
        Ok(Field(values))
    }

    fn parse_part(part: &str, min: u32, max: u32, field_name: &str) -> Result<Vec<u32>, CronParseError> {
        let (range_part, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step.parse().map_err(|_| CronParseError::InvalidField {
                    field: field_name.to_string(),
                    reason: format!("invalid step {step:?}"),
                })?;
                if step == 0 {
                    return Err(CronParseError::InvalidField {
                        field: field_name.to_string(),
                        reason: "step cannot be zero".to_string(),
                    });
                }
                (range, step)
            }
            None => (part, 1),
        };

        let (start, end) = if range_part == "*" {
            (min, max)
        } else if let Some((lo, hi)) = range_part.split_once('-') {
            let lo: u32 = lo.parse().map_err(|_| CronParseError::InvalidField {
                field: field_name.to_string(),
                reason: format!("invalid range start {lo:?}"),
            })?;
            let hi: u32 = hi.parse().map_err(|_| CronParseError::InvalidField {
                field: field_name.to_string(),
                reason: format!("invalid range end {hi:?}"),
            })?;
            if lo > hi {
                return Err(CronParseError::InvalidField {
                    field: field_name.to_string(),
                    reason: format!("range start {lo} greater than end {hi}"),
                });
            }
            (lo, hi)
        } else {
            let value: u32 = range_part.parse().map_err(|_| CronParseError::InvalidField {
                field: field_name.to_string(),
                reason: format!("invalid value {range_part:?}"),
            })?;
            (value, value)
        };

        if start < min || end > max {
            return Err(CronParseError::OutOfRange {
                field: field_name.to_string(),
                value: if start < min { start } else { end },
                min,
                max,
            });
        }

        Ok((start..=end).step_by(step as usize).collect())
    }

    fn contains(&self, value: u32) -> bool {
        self.0.contains(&value)
    }

    fn is_wildcard(raw: &str) -> bool {
        raw == "*"
    }
}

/// A parsed five-field cron expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    minute: Field,
    hour: Field,
    day_of_month: Field,
    month: Field,
    day_of_week: Field,
    dom_restricted: bool,
    dow_restricted: bool,
}

impl CronSchedule {
    /// Parse a standard five-field cron expression: `min hour dom month dow`.
    pub fn parse(expr: &str) -> Result<Self, CronParseError> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(CronParseError::WrongFieldCount(fields.len()));
        }
        Ok(Self {
            minute: Field::parse(fields[0], 0, 59, "minute")?,
            hour: Field::parse(fields[1], 0, 23, "hour")?,
            day_of_month: Field::parse(fields[2], 1, 31, "day_of_month")?,
            month: Field::parse(fields[3], 1, 12, "month")?,
            day_of_week: Field::parse(fields[4], 0, 6, "day_of_week")?,
            dom_restricted: !Field::is_wildcard(fields[2]),
            dow_restricted: !Field::is_wildcard(fields[4]),
        })
    }

    /// Whether this expression would fire at the given minute-truncated
    /// instant. Day-of-week uses `0 = Sunday` per cron convention.
    pub fn matches(&self, at: DateTime<Utc>) -> bool {
        if !self.minute.contains(at.minute()) {
            return false;
        }
        if !self.hour.contains(at.hour()) {
            return false;
        }
        if !self.month.contains(at.month()) {
            return false;
        }

        let dom_match = self.day_of_month.contains(at.day());
        let dow = at.weekday().num_days_from_sunday();
        let dow_match = self.day_of_week.contains(dow);

        match (self.dom_restricted, self.dow_restricted) {
            (true, true) => dom_match || dow_match,
            _ => dom_match && dow_match,
        }
    }

    /// Scan forward minute by minute for the next firing time strictly
    /// after `after`. Returns `None` if nothing matches within ~4 years.
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut candidate = truncate_to_minute(after) + ChronoDuration::minutes(1);
        for _ in 0..MAX_SCAN_MINUTES {
            if self.matches(candidate) {
                return Some(candidate);
            }
            candidate += ChronoDuration::minutes(1);
        }
        None
    }

    /// Scan backward minute by minute for the most recent firing time at or
    /// before `before`. Returns `None` if nothing matches within ~4 years.
    pub fn previous_fire_before(&self, before: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut candidate = truncate_to_minute(before);
        for _ in 0..MAX_SCAN_MINUTES {
            if self.matches(candidate) {
                return Some(candidate);
            }
            candidate -= ChronoDuration::minutes(1);
        }
        None
    }
}

fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(at)
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
