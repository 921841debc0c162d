// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn splits_metadata_and_body() {
    let input = "---\nmodel: gpt-5\ntemperature: 0.2\n---\nYou are a helpful assistant.\n";
    let parsed = parse_front_matter(input);
    assert_eq!(parsed.metadata.get("model"), Some(&json!("gpt-5")));
    assert_eq!(parsed.metadata.get("temperature"), Some(&json!(0.2)));
    assert_eq!(parsed.body, "You are a helpful assistant.\n");
}

#[test]
fn no_front_matter_returns_empty_metadata_and_original_body() {
    let input = "Just a plain prompt, no header.";
    let parsed = parse_front_matter(input);
    assert!(parsed.metadata.is_empty());
    assert_eq!(parsed.body, input);
}

#[test]
fn unterminated_block_falls_back_to_no_metadata() {
    let input = "---\nmodel: gpt-5\nno closing delimiter here\n";
    let parsed = parse_front_matter(input);
    assert!(parsed.metadata.is_empty());
    assert_eq!(parsed.body, input);
}

#[test]
fn quoted_values_are_unquoted() {
    let input = "---\nname: \"release notes\"\n---\nbody\n";
    let parsed = parse_front_matter(input);
    assert_eq!(parsed.metadata.get("name"), Some(&json!("release notes")));
}

#[test]
fn boolean_and_integer_scalars_are_typed() {
    let input = "---\nstream: true\nmax_tokens: 512\n---\nbody\n";
    let parsed = parse_front_matter(input);
    assert_eq!(parsed.metadata.get("stream"), Some(&json!(true)));
    assert_eq!(parsed.metadata.get("max_tokens"), Some(&json!(512)));
}

#[test]
fn blank_lines_and_comments_are_skipped() {
    let input = "---\n# a comment\n\nmodel: gpt-5\n---\nbody\n";
    let parsed = parse_front_matter(input);
    assert_eq!(parsed.metadata.len(), 1);
    assert_eq!(parsed.metadata.get("model"), Some(&json!("gpt-5")));
}

#[test]
fn dash_not_at_start_of_input_is_not_front_matter() {
    let input = "Some text\n---\nmodel: gpt-5\n---\n";
    let parsed = parse_front_matter(input);
    assert!(parsed.metadata.is_empty());
    assert_eq!(parsed.body, input);
}
