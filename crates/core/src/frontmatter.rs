// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt front matter stripping.
//!
//! Actor prompt files may begin with a `---`-delimited YAML block carrying
//! metadata (e.g. `model`, `temperature`). Parsing never fails: a missing or
//! malformed block just yields an empty metadata map and the original text
//! untouched, since a bad header should degrade to "no metadata" rather than
//! block delivery.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// The result of splitting a prompt file into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub metadata: Map<String, Value>,
    pub body: String,
}

const DELIMITER: &str = "---";

/// Split `input` into leading YAML front matter and the remaining body.
/// If `input` doesn't open with a `---` line, or the YAML block doesn't
/// parse as a mapping, returns empty metadata and `input` unchanged.
pub fn parse_front_matter(input: &str) -> FrontMatter {
    let Some(rest) = input.strip_prefix(DELIMITER) else {
        return FrontMatter {
            metadata: Map::new(),
            body: input.to_string(),
        };
    };
    // Require the opening delimiter to be alone on its line.
    let rest = match rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) {
        Some(rest) => rest,
        None => {
            return FrontMatter {
                metadata: Map::new(),
                body: input.to_string(),
            }
        }
    };

    let Some(close_at) = find_closing_delimiter(rest) else {
        return FrontMatter {
            metadata: Map::new(),
            body: input.to_string(),
        };
    };

    let (yaml_block, after_close) = rest.split_at(close_at.start);
    let body = after_close[close_at.len..]
        .strip_prefix('\n')
        .or_else(|| after_close[close_at.len..].strip_prefix("\r\n"))
        .unwrap_or(&after_close[close_at.len..]);

    match serde_yaml_like_to_map(yaml_block) {
        Some(metadata) => FrontMatter {
            metadata,
            body: body.to_string(),
        },
        None => FrontMatter {
            metadata: Map::new(),
            body: input.to_string(),
        },
    }
}

struct ClosingMatch {
    start: usize,
    len: usize,
}

fn find_closing_delimiter(rest: &str) -> Option<ClosingMatch> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == DELIMITER {
            return Some(ClosingMatch {
                start: offset,
                len: trimmed.len(),
            });
        }
        offset += line.len();
    }
    None
}

/// Parses a restricted subset of YAML: flat `key: value` mappings, one per
/// line, with scalar string/number/bool values. Good enough for prompt
/// metadata; anything nested or list-valued causes a `None` (treated as
/// malformed) so callers fall back to no metadata rather than silently
/// dropping structure.
fn serde_yaml_like_to_map(block: &str) -> Option<Map<String, Value>> {
    let mut map = Map::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once(':')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let value = value.trim();
        map.insert(key.to_string(), scalar_value(value));
    }
    Some(map)
}

fn scalar_value(raw: &str) -> Value {
    if let Some(unquoted) = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
    {
        return Value::String(unquoted.to_string());
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "" => Value::Null,
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                Value::Number(i.into())
            } else if let Ok(f) = raw.parse::<f64>() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

/// Convenience conversion for callers that want a plain map rather than
/// `serde_json::Map`.
pub fn metadata_to_hash_map(metadata: &Map<String, Value>) -> HashMap<String, Value> {
    metadata.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

#[cfg(test)]
#[path = "frontmatter_tests.rs"]
mod tests;
