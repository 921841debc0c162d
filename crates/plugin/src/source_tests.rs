// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn poll_result_default_is_empty() {
    let result = PollResult::default();
    assert!(result.events.is_empty());
    assert!(result.next_cursor.is_none());
}
