use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::scenario::Scenario;
use crate::domain::simulation_input::{InvalidInputError, SimulationInput};

#[derive(Error, Debug)]
pub enum ScenarioYamlError {
    #[error("failed to read scenario yaml file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse scenario yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("scenario #{index} has no scenario_name")]
    MissingName { index: usize },
    #[error("scenario #{index} needs an id but none are left")]
    NoFreeId { index: usize },
    #[error("scenario {name:?} has invalid inputs: {source}")]
    InvalidInputs {
        name: String,
        source: InvalidInputError,
    },
}

#[derive(Debug, Deserialize)]
struct ScenarioRecord {
    id: Option<Value>,
    scenario_name: Option<String>,
    #[serde(default)]
    inputs: Map<String, Value>,
}

/// Loads a YAML list of `{id?, scenario_name, inputs}` entries.
///
/// Entries without an id get the next free number in file order.
pub fn load_scenarios_from_yaml_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Scenario>, ScenarioYamlError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioYamlError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    deserialize_scenarios_from_yaml_str(&contents)
}

pub fn deserialize_scenarios_from_yaml_str(input: &str) -> Result<Vec<Scenario>, ScenarioYamlError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<ScenarioRecord> = serde_yaml::from_str(input)?;

    let mut next_id = records
        .iter()
        .filter_map(|record| record.id.as_ref().and_then(id_text))
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .map_or(Some(1), |max| max.checked_add(1));

    let created_at = Utc::now();
    let mut scenarios = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let scenario_name = record
            .scenario_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or(ScenarioYamlError::MissingName { index })?;

        SimulationInput::from_payload(&record.inputs).map_err(|source| {
            ScenarioYamlError::InvalidInputs {
                name: scenario_name.clone(),
                source,
            }
        })?;

        let id = match record.id.as_ref().and_then(id_text) {
            Some(id) => id,
            None => {
                let id = next_id.ok_or(ScenarioYamlError::NoFreeId { index })?;
                next_id = id.checked_add(1);
                id.to_string()
            }
        };

        scenarios.push(Scenario {
            id,
            scenario_name,
            inputs: record.inputs,
            created_at,
        });
    }
    Ok(scenarios)
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
