use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::scenario::Scenario;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Records who asked for a report.
pub trait LeadStore: Send + Sync {
    /// Saves a lead and returns its identifier.
    fn save(&self, email: &str, scenario_id: Option<&str>) -> Result<String, StoreError>;
}

/// Describes an interface for retrieving and saving named input sets.
pub trait ScenarioStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Scenario>, StoreError>;
    fn save(&self, scenario_name: &str, inputs: Map<String, Value>) -> Result<String, StoreError>;
    fn list(&self) -> Result<Vec<Scenario>, StoreError>;
}
