//! camelCase ⇄ snake_case translation of top-level record keys.
//!
//! Entities serialize to camelCase (the shape the view layer and export
//! speak) while storage columns are snake_case. Only the outermost keys are
//! renamed; nested values pass through untouched. A handful of keys keep an
//! acronym in capitals (`taxesDA`); those are looked up before the regex.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

static SNAKE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([a-z])").expect("valid regex"));
static UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("valid regex"));

pub fn snake_to_camel(key: &str) -> String {
    SNAKE_SEGMENT
        .replace_all(key, |caps: &Captures| caps[1].to_ascii_uppercase())
        .into_owned()
}

pub fn camel_to_snake(key: &str) -> String {
    UPPER
        .replace_all(key, |caps: &Captures| format!("_{}", caps[0].to_ascii_lowercase()))
        .into_owned()
}

/// (column, key) pairs the regex rules cannot produce.
const ACRONYM_KEYS: &[(&str, &str)] = &[
    ("order_ik_statement", "orderIKStatement"),
    ("ordered_ik_statement_man", "orderedIKStatementMan"),
    ("ordered_ik_statement_woman", "orderedIKStatementWoman"),
    ("taxes_da", "taxesDA"),
];

pub fn column_to_key(column: &str) -> String {
    ACRONYM_KEYS
        .iter()
        .find(|(col, _)| *col == column)
        .map_or_else(|| snake_to_camel(column), |(_, key)| (*key).to_string())
}

pub fn key_to_column(key: &str) -> String {
    ACRONYM_KEYS
        .iter()
        .find(|(_, k)| *k == key)
        .map_or_else(|| camel_to_snake(key), |(col, _)| (*col).to_string())
}

/// Storage row → camelCase object.
pub fn from_db(row: Map<String, Value>) -> Map<String, Value> {
    row.into_iter()
        .map(|(key, value)| (column_to_key(&key), value))
        .collect()
}

/// camelCase object → storage record. The `id` key is dropped since storage
/// owns it; absent keys stay absent so partial writes never clobber columns.
pub fn to_db(obj: Map<String, Value>) -> Map<String, Value> {
    obj.into_iter()
        .filter(|(key, _)| key != "id")
        .map(|(key, value)| (key_to_column(&key), value))
        .collect()
}
