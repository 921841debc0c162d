// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration string parsing.
//!
//! Accepts `<number><suffix>` where suffix is one of `ms`, `s`, `m`, `h`,
//! `d`, optionally prefixed with `every ` (the cron source's bare-interval
//! form). `render_duration` produces the canonical string for a duration so
//! that `parse_duration(render_duration(d)) == d` for renderings this
//! module itself produces.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("empty duration string")]
    Empty,
    #[error("invalid duration {0:?}: no numeric amount")]
    NoAmount(String),
    #[error("invalid duration {0:?}: unknown suffix {1:?}")]
    UnknownSuffix(String, String),
    #[error("invalid duration {0:?}: amount out of range")]
    OutOfRange(String),
}

const UNITS: &[(&str, u64)] = &[
    ("ms", 1),
    ("s", 1_000),
    ("m", 60_000),
    ("h", 3_600_000),
    ("d", 86_400_000),
];

/// Parse a duration string such as `"500ms"`, `"30s"`, `"5m"`, `"1h"`,
/// `"2d"`, or `"every 5m"`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }
    let trimmed = trimmed
        .strip_prefix("every ")
        .map(str::trim)
        .unwrap_or(trimmed);

    let split_at = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| DurationParseError::NoAmount(input.to_string()))?;
    if split_at == 0 {
        return Err(DurationParseError::NoAmount(input.to_string()));
    }
    let (amount_str, suffix) = trimmed.split_at(split_at);
    let amount: u64 = amount_str
        .parse()
        .map_err(|_| DurationParseError::OutOfRange(input.to_string()))?;

    let unit_ms = UNITS
        .iter()
        .find(|(s, _)| *s == suffix)
        .map(|(_, ms)| *ms)
        .ok_or_else(|| DurationParseError::UnknownSuffix(input.to_string(), suffix.to_string()))?;

    let total_ms = amount
        .checked_mul(unit_ms)
        .ok_or_else(|| DurationParseError::OutOfRange(input.to_string()))?;
    Ok(Duration::from_millis(total_ms))
}

/// Render a duration using the largest unit that divides it evenly,
/// falling back to milliseconds.
pub fn render_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis() as u64;
    if total_ms == 0 {
        return "0ms".to_string();
    }
    for (suffix, unit_ms) in UNITS.iter().rev() {
        if total_ms % unit_ms == 0 {
            return format!("{}{}", total_ms / unit_ms, suffix);
        }
    }
    format!("{total_ms}ms")
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
