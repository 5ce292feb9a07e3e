use std::collections::BTreeMap;

use serde::Serialize;

use super::transport::TransportMode;

/// Key under which the transport mode travels in the request body.
pub const TRANSPORT_KEY: &str = "type";

/// Answers collected so far, keyed by question key.
///
/// Serializes as one flat JSON object: every numeric answer under its key,
/// plus `type` when the distance question has been answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnswerMap {
    #[serde(flatten)]
    values: BTreeMap<String, f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    transport: Option<TransportMode>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    pub fn set_transport(&mut self, mode: TransportMode) {
        self.transport = Some(mode);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn transport(&self) -> Option<TransportMode> {
        self.transport
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of numeric answers; the transport entry is not counted.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.transport.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.transport = None;
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
