//! Output types: named float measurements grouped per producer.
//! Keep this module minimal and stable — it defines the wire format.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One producer's measurements, in the order the producer emits them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSet {
    entries: Vec<(&'static str, f64)>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: f64) -> Self {
        self.entries.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Serialized as a JSON object; key order is preserved.
impl Serialize for MetricSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One collection cycle's output.
pub type Snapshot = Vec<MetricSet>;

/// Line emitted by the agent binary for each cycle.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    pub ts_unix_ms: i64,
    pub hostname: String,
    pub metrics: Snapshot,
}
