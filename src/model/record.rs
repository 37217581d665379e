use std::fmt::Display;

use indexmap::IndexMap;
use serde_json::Value;

/// One benchmark measurement, the unit the grouping pass works on.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BenchmarkRecord {
    pub name: String,
    pub data_size: String,
    pub real_time: f64,
    /// Fields carried through from the source JSON without interpretation.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl BenchmarkRecord {
    pub fn new<N: Into<String>, D: Into<String>>(name: N, data_size: D, real_time: f64) -> Self {
        Self {
            name: name.into(),
            data_size: data_size.into(),
            real_time,
            extra: IndexMap::new(),
        }
    }
}

/// google-benchmark writes `data_size` as whatever the harness put there,
/// so both strings and numbers are accepted and kept as a label.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum DataSize {
    Label(String),
    Number(serde_json::Number),
}

impl Display for DataSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSize::Label(label) => f.write_str(label),
            DataSize::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<DataSize> for String {
    fn from(value: DataSize) -> Self {
        match value {
            DataSize::Label(label) => label,
            number => number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_size_from_number() {
        let size: DataSize = serde_json::from_str("128").unwrap();
        assert_eq!(String::from(size), "128");
    }

    #[test]
    fn test_data_size_from_string() {
        let size: DataSize = serde_json::from_str("\"1k\"").unwrap();
        assert_eq!(String::from(size), "1k");
    }

    #[test]
    fn test_record_extra_fields_kept() {
        let record: BenchmarkRecord = serde_json::from_str(
            r#"{"name": "A", "data_size": "1", "real_time": 10, "iterations": 1000}"#,
        )
        .unwrap();

        assert_eq!(record.real_time, 10.0);
        assert_eq!(record.extra.get("iterations"), Some(&Value::from(1000)));

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["iterations"], Value::from(1000));
    }
}
