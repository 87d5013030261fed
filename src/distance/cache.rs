use std::collections::HashMap;
use std::fmt;

use tokio::sync::RwLock;

use crate::domain::types::Place;

#[derive(Eq, PartialEq, Hash, Clone, Debug)]
pub struct CityPairKey {
    pub first: String,
    pub second: String,
}

impl CityPairKey {
    /// Canonical key for two already-normalized names; the names are sorted so
    /// that A->B and B->A share an entry.
    pub fn new(city1: &str, city2: &str) -> Self {
        let mut cities = [city1, city2];
        cities.sort_unstable();
        Self {
            first: cities[0].to_string(),
            second: cities[1].to_string(),
        }
    }
}

impl fmt::Display for CityPairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.first, self.second)
    }
}

/// Append-only in-memory memo table. A key, once filled, keeps its first value.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + std::hash::Hash,
    V: Clone,
{
    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Stores `value` unless the key is already present. Returns true if stored.
    pub async fn insert_if_absent(&self, key: K, value: V) -> bool {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, value);
        true
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

pub type PlaceCache = MemoCache<String, Place>;
pub type DistanceCache = MemoCache<CityPairKey, f64>;
