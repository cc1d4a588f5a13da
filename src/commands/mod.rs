pub mod base_commands;
pub mod report_cmd;
pub mod report_format;
pub mod serve_cmd;
pub mod simulate_cmd;

use thiserror::Error;

use crate::domain::simulation_input::InvalidInputError;
use crate::services::data_source::StoreError;
use crate::services::payload_file::PayloadFileError;
use crate::services::report_service::ReportError;
use crate::services::report_store::ReportStoreError;
use crate::services::scenario_yaml::ScenarioYamlError;
use crate::services::server_config::ConfigError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    PayloadFile(#[from] PayloadFileError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    ReportStore(#[from] ReportStoreError),
    #[error(transparent)]
    ScenarioYaml(#[from] ScenarioYamlError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize simulation result: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },
}
