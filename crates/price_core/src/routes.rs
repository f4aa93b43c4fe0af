//! Route vocabulary
//!
//! Maps `"{origin}_{destination}"` keys to integer codes. Codes are assigned
//! once, during training, and the vocabulary is read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Code returned for routes that were never observed during training.
pub const UNKNOWN_ROUTE_CODE: u32 = 0;

/// Order in which distinct routes receive their codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOrdering {
    /// Codes follow the order routes first appear in the dataset.
    #[default]
    FirstSeen,
    /// Distinct keys are sorted before codes are assigned.
    Lexicographic,
}

/// Build the vocabulary key for an origin/destination pair.
pub fn route_key(origin: &str, destination: &str) -> String {
    format!("{}_{}", origin, destination)
}

/// Frozen route → code mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteVocabulary {
    codes: BTreeMap<String, u32>,
}

impl RouteVocabulary {
    /// Assign codes to the given route keys. Duplicates keep their first code.
    pub fn build<I, S>(routes: I, ordering: RouteOrdering) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = BTreeMap::new();

        match ordering {
            RouteOrdering::FirstSeen => {
                for route in routes {
                    let next = codes.len() as u32;
                    codes.entry(route.as_ref().to_string()).or_insert(next);
                }
            }
            RouteOrdering::Lexicographic => {
                let distinct: BTreeSet<String> =
                    routes.into_iter().map(|r| r.as_ref().to_string()).collect();
                for (idx, route) in distinct.into_iter().enumerate() {
                    codes.insert(route, idx as u32);
                }
            }
        }

        Self { codes }
    }

    /// Code for a route key, or [`UNKNOWN_ROUTE_CODE`] if it was never seen.
    pub fn lookup(&self, key: &str) -> u32 {
        self.codes.get(key).copied().unwrap_or(UNKNOWN_ROUTE_CODE)
    }

    /// Whether the key was observed during training.
    pub fn contains(&self, key: &str) -> bool {
        self.codes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate over `(route, code)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.codes.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_assignment() {
        let vocab = RouteVocabulary::build(
            ["Delhi_Mumbai", "Mumbai_Delhi", "Delhi_Mumbai", "Chennai_Kolkata"],
            RouteOrdering::FirstSeen,
        );

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.lookup("Delhi_Mumbai"), 0);
        assert_eq!(vocab.lookup("Mumbai_Delhi"), 1);
        assert_eq!(vocab.lookup("Chennai_Kolkata"), 2);
    }

    #[test]
    fn test_first_seen_depends_on_row_order() {
        let a = RouteVocabulary::build(["A_B", "C_D"], RouteOrdering::FirstSeen);
        let b = RouteVocabulary::build(["C_D", "A_B"], RouteOrdering::FirstSeen);
        assert_ne!(a, b);
    }

    #[test]
    fn test_lexicographic_ignores_row_order() {
        let a = RouteVocabulary::build(["Mumbai_Delhi", "Delhi_Mumbai"], RouteOrdering::Lexicographic);
        let b = RouteVocabulary::build(["Delhi_Mumbai", "Mumbai_Delhi"], RouteOrdering::Lexicographic);

        assert_eq!(a, b);
        assert_eq!(a.lookup("Delhi_Mumbai"), 0);
        assert_eq!(a.lookup("Mumbai_Delhi"), 1);
    }

    #[test]
    fn test_unknown_route_resolves_to_first_code() {
        let vocab = RouteVocabulary::build(["Delhi_Mumbai", "Mumbai_Delhi"], RouteOrdering::FirstSeen);

        assert!(!vocab.contains("Delhi_Chennai"));
        assert_eq!(vocab.lookup("Delhi_Chennai"), UNKNOWN_ROUTE_CODE);
        assert_eq!(vocab.lookup("Delhi_Chennai"), vocab.lookup("Delhi_Mumbai"));
    }

    #[test]
    fn test_route_key_format() {
        assert_eq!(route_key("Delhi", "Mumbai"), "Delhi_Mumbai");
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let vocab = RouteVocabulary::build(["B_C", "A_B"], RouteOrdering::FirstSeen);
        let json = serde_json::to_string(&vocab).unwrap();
        assert_eq!(json, r#"{"A_B":1,"B_C":0}"#);

        let back: RouteVocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vocab);
    }
}
