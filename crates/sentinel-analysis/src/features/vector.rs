//! Open-keyed feature counts.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Feature name → non-negative count. The key space is open; alignment to
/// a schema happens separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    counts: FxHashMap<String, u64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &str, amount: u64) {
        if let Some(count) = self.counts.get_mut(name) {
            *count += amount;
        } else {
            self.counts.insert(name.to_string(), amount);
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: u64) {
        self.counts.insert(name.into(), value);
    }

    /// Count for `name`, `0` when absent.
    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// Number of distinct feature names.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut v = FeatureVector::new();
        for (name, count) in iter {
            v.add(&name, count);
        }
        v
    }
}
