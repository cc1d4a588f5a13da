pub mod data_source;
pub mod http_api;
pub mod lead_store;
pub mod logging;
pub mod payload_file;
pub mod report_html;
pub mod report_service;
pub mod report_store;
pub mod roi_simulation;
pub mod scenario_store;
pub mod scenario_yaml;
pub mod server_config;
