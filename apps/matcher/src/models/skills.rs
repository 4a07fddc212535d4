//! Skill token lists as they arrive from the host's storage layer.
//!
//! The host stores skills as a JSON-encoded list of strings. Anything that
//! is not a list of strings (absent column, `null`, broken JSON, a bare
//! string) decodes to an empty list instead of failing the request.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trims and lower-cases a skill token. Every skill-set comparison in the
/// engine goes through this function.
pub fn normalize_skill(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Ordered list of free-text skill tokens, kept exactly as the host wrote them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Vec<String>")]
pub struct SkillList(Vec<String>);

impl SkillList {
    /// Decodes a text column holding a JSON array of strings.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => Self::from_items(items),
            _ => Self::default(),
        }
    }

    fn from_items(items: Vec<Value>) -> Self {
        Self(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw tokens joined by single spaces, in source order.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }

    /// Normalized, de-duplicated tokens in first-seen order. Blank tokens are dropped.
    pub fn normalized(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .map(|s| normalize_skill(s))
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect()
    }

    pub fn normalized_set(&self) -> HashSet<String> {
        self.normalized().into_iter().collect()
    }
}

impl From<Value> for SkillList {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::from_items(items),
            // Some hosts hand over the still-encoded column text.
            Value::String(encoded) => Self::decode(Some(&encoded)),
            _ => Self::default(),
        }
    }
}

impl From<SkillList> for Vec<String> {
    fn from(list: SkillList) -> Self {
        list.0
    }
}

impl From<Vec<&str>> for SkillList {
    fn from(skills: Vec<&str>) -> Self {
        Self(skills.into_iter().map(str::to_string).collect())
    }
}
