//! Wire types produced by the backend. The client never mutates them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Aggregate statistics of the most recent upload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub avg_flowrate: Option<f64>,
    #[serde(default)]
    pub avg_pressure: Option<f64>,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
    #[serde(default)]
    pub type_distribution: TypeDistribution,
}

/// One row of the upload history: summary fields plus identity and timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    #[serde(default)]
    pub upload_date: String,
    #[serde(flatten)]
    pub summary: Summary,
}

/// Equipment type → count, kept in the order the backend sent the keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeDistribution(Vec<(String, u64)>);

impl TypeDistribution {
    pub fn new(entries: Vec<(String, u64)>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| *count).sum()
    }

    /// Render as two-space indented JSON, the same text the web dashboard shows.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for TypeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TypeDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = TypeDistribution;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of equipment type to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    entries.push((label, count));
                }
                Ok(TypeDistribution(entries))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(TypeDistribution::default())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(TypeDistribution::default())
            }
        }

        deserializer.deserialize_any(DistributionVisitor)
    }
}

/// Free-form upload acknowledgement, kept verbatim for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadResult(pub serde_json::Value);

impl UploadResult {
    /// The backend's `message` field, when it sent one.
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(|value| value.as_str())
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_accepts_nulls_and_keeps_distribution_order() {
        let summary: Summary = serde_json::from_str(
            r#"{
                "total_count": 42,
                "avg_flowrate": 3.14159,
                "avg_pressure": null,
                "avg_temperature": 98.76,
                "type_distribution": {"Valve": 7, "Pump": 12, "Compressor": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(summary.total_count, 42);
        assert_eq!(summary.avg_pressure, None);
        let labels: Vec<&str> = summary
            .type_distribution
            .entries()
            .iter()
            .map(|(label, _)| label.as_str())
            .collect();
        assert_eq!(labels, ["Valve", "Pump", "Compressor"]);
        assert_eq!(summary.type_distribution.total(), 22);
    }

    #[test]
    fn missing_summary_fields_default() {
        let summary: Summary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary, Summary::default());
        let summary: Summary =
            serde_json::from_str(r#"{"type_distribution": null}"#).unwrap();
        assert!(summary.type_distribution.is_empty());
    }

    #[test]
    fn history_entry_flattens_summary_fields() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{
                "id": 9,
                "upload_date": "2024-05-01T10:00:00+00:00",
                "total_count": 15,
                "avg_flowrate": 120.5,
                "avg_pressure": 6.25,
                "avg_temperature": 110.0,
                "type_distribution": {"Pump": 4, "HeatExchanger": 11}
            }"#,
        )
        .unwrap();
        assert_eq!(entry.id, 9);
        assert_eq!(entry.summary.total_count, 15);
        assert_eq!(entry.summary.avg_pressure, Some(6.25));
        assert_eq!(entry.summary.type_distribution.len(), 2);
    }

    #[test]
    fn pretty_distribution_uses_two_space_indent() {
        let distribution =
            TypeDistribution::new(vec![("Pump".into(), 4), ("Valve".into(), 2)]);
        assert_eq!(
            distribution.to_pretty_json(),
            "{\n  \"Pump\": 4,\n  \"Valve\": 2\n}"
        );
        assert_eq!(TypeDistribution::default().to_pretty_json(), "{}");
    }

    #[test]
    fn upload_result_exposes_message() {
        let result: UploadResult = serde_json::from_str(
            r#"{"message": "Upload successful", "summary": {"total_count": 3}}"#,
        )
        .unwrap();
        assert_eq!(result.message(), Some("Upload successful"));
        assert!(result.to_pretty_json().contains("\"total_count\": 3"));
    }
}
