//! Canonical commercial key space.
//!
//! The main optimizer emits 0-based commercial indices, while manually
//! entered property/bonus data is 1-based or free text. Every identifier is
//! funneled through [`resolve`] into one `COM_<n>` key space before any
//! grouping happens — otherwise aggregation double-counts or drops
//! commercials.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// A canonicalized commercial identifier: `COM_<n>`, or the uppercased raw
/// string for the rare non-numeric commercial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommercialKey(String);

impl CommercialKey {
    pub fn from_index(n: u32) -> Self {
        CommercialKey(format!("COM_{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric suffix of a `COM_<n>` key, if this key has one.
    pub fn index(&self) -> Option<u32> {
        self.0.strip_prefix("COM_").and_then(|n| n.parse().ok())
    }
}

impl fmt::Display for CommercialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Numeric-suffix ordering so COM_2 sorts before COM_10; free-text keys sort
// after all numbered keys, lexicographically.
impl Ord for CommercialKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.index().unwrap_or(u32::MAX);
        let b = other.index().unwrap_or(u32::MAX);
        a.cmp(&b).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for CommercialKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Canonicalize a raw commercial identifier.
///
/// Rules, in order:
/// 1. empty/blank → `COM_1`
/// 2. `COM[-_ ]?<int>` (case-insensitive) → keep the integer verbatim
/// 3. bare non-negative integer → `n + 1` when `zero_based`, else `n`
/// 4. any embedded integer → use it verbatim
/// 5. otherwise → uppercased raw string as its own key
///
/// `zero_based` is a required parameter: the caller must state which
/// numbering convention its source uses (see `Source::zero_based_commercials`).
pub fn resolve(raw: &str, zero_based: bool) -> CommercialKey {
    let s = raw.trim();
    if s.is_empty() {
        return CommercialKey::from_index(1);
    }

    let com = Regex::new(r"(?i)^COM[-_ ]?(\d+)$").unwrap();
    if let Some(caps) = com.captures(s) {
        if let Ok(n) = caps[1].parse::<u32>() {
            return CommercialKey::from_index(n);
        }
    }

    if let Ok(n) = s.parse::<u32>() {
        return CommercialKey::from_index(if zero_based { n + 1 } else { n });
    }

    let embedded = Regex::new(r"(\d+)").unwrap();
    if let Some(caps) = embedded.captures(s) {
        if let Ok(n) = caps[1].parse::<u32>() {
            return CommercialKey::from_index(n);
        }
    }

    CommercialKey(s.to_uppercase())
}

/// [`resolve`] over a raw JSON value: numbers are treated as bare integers,
/// everything else goes through the string rules. Null/missing → `COM_1`.
pub fn resolve_value(raw: &Value, zero_based: bool) -> CommercialKey {
    match raw {
        Value::Number(n) => {
            let idx = n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)).unwrap_or(0) as u32;
            CommercialKey::from_index(if zero_based { idx + 1 } else { idx })
        }
        Value::String(s) => resolve(s, zero_based),
        _ => CommercialKey::from_index(1),
    }
}
