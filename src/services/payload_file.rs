use std::io;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayloadFileError {
    #[error("failed to read input file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse input file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("input file must contain a mapping of field names to values")]
    NotAMapping,
}

/// Reads simulation fields from a YAML or JSON file, keeping the key order of the file.
pub fn load_payload_from_file(path: &str) -> Result<Map<String, Value>, PayloadFileError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_payload_from_str(&contents)
}

pub fn deserialize_payload_from_str(input: &str) -> Result<Map<String, Value>, PayloadFileError> {
    if input.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_yaml::from_str::<Value>(input)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(PayloadFileError::NotAMapping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_yaml_in_file_order() {
        let payload =
            deserialize_payload_from_str("hourly_wage: 20\nnum_ap_staff: 2\nerror_cost: 5\n")
                .unwrap();
        let keys: Vec<&str> = payload.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["hourly_wage", "num_ap_staff", "error_cost"]);
    }

    #[test]
    fn reads_json_documents() {
        let payload =
            deserialize_payload_from_str(r#"{"monthly_invoice_volume": 1000, "hourly_wage": 20.5}"#)
                .unwrap();
        assert_eq!(payload.get("hourly_wage").and_then(Value::as_f64), Some(20.5));
    }

    #[test]
    fn rejects_lists() {
        let err = deserialize_payload_from_str("- 1\n- 2\n").unwrap_err();
        assert!(matches!(err, PayloadFileError::NotAMapping));
    }
}
