//! Header and cell normalization shared by both transports.
//!
//! Whatever shape the store returns, rows leave this module as a flat
//! `header -> trimmed string` map with canonical, lower-case headers.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::models::SheetRecord;

/// One normalized spreadsheet row.
pub type Row = HashMap<String, String>;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_HEADER_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_]").unwrap());

/// Canonical header: trimmed, lower-cased, whitespace runs as `_`, and
/// anything outside `[a-z0-9_]` dropped.
pub fn normalize_header(header: &str) -> String {
    let lowered = header.trim().to_lowercase();
    let underscored = WHITESPACE_RUN.replace_all(&lowered, "_");
    NON_HEADER_CHARS.replace_all(&underscored, "").into_owned()
}

/// Render a cell as the spreadsheet shows it. Null becomes `""`.
pub fn normalize_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        other => other.to_string().trim().to_string(),
    }
}

fn number_to_string(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        // Sheets hands back whole numbers as floats (`24.0`)
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Normalize an object-shaped row as returned by the proxy.
pub fn normalize_row(raw: &Map<String, Value>) -> Row {
    raw.iter()
        .map(|(key, value)| (normalize_header(key), normalize_cell(value)))
        .collect()
}

/// First alias holding a non-empty value, else `""`.
pub fn pick(row: &Row, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// Keep only records whose hospital id equals `hospital_id` exactly.
pub fn scoped<T: SheetRecord>(records: Vec<T>, hospital_id: &str) -> Vec<T> {
    records
        .into_iter()
        .filter(|r| r.hospital_id() == hospital_id)
        .collect()
}

#[cfg(test)]
pub(crate) fn row_from_pairs(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
