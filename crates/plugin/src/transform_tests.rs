// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn transform_error_display_includes_transform_id() {
    let error = TransformError::Failed {
        transform_id: "redact".to_string(),
        message: "boom".to_string(),
    };
    assert!(error.to_string().contains("redact"));
}
