//! Serde helpers for the persisted document layout
//!
//! The document stores every map as an array of `[key, value]` pairs so
//! that non-string keys (positions, string indices) survive a JSON round
//! trip. Use with `#[serde(with = "...")]`.

/// `BTreeMap<K, V>` ⇄ `[[k, v], ...]`
pub mod pairs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let entries: Vec<(K, V)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// `BTreeMap<K1, BTreeMap<K2, V>>` ⇄ `[[k1, [[k2, v], ...]], ...]`
pub mod nested_pairs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<K1, K2, V, S>(
        map: &BTreeMap<K1, BTreeMap<K2, V>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        K1: Serialize,
        K2: Serialize,
        V: Serialize,
        S: Serializer,
    {
        let outer: Vec<(&K1, Vec<(&K2, &V)>)> = map
            .iter()
            .map(|(k, inner)| (k, inner.iter().collect()))
            .collect();
        outer.serialize(serializer)
    }

    pub fn deserialize<'de, K1, K2, V, D>(
        deserializer: D,
    ) -> Result<BTreeMap<K1, BTreeMap<K2, V>>, D::Error>
    where
        K1: Deserialize<'de> + Ord,
        K2: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let entries: Vec<(K1, Vec<(K2, V)>)> = Vec::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|(k, inner)| (k, inner.into_iter().collect()))
            .collect())
    }
}
