use std::sync::Arc;

use tracing::info;

use crate::commands::CommandError;
use crate::services::http_api::routes;
use crate::services::lead_store::InMemoryLeadStore;
use crate::services::report_service::ReportService;
use crate::services::report_store::DirectoryReportStore;
use crate::services::scenario_store::InMemoryScenarioStore;
use crate::services::scenario_yaml::load_scenarios_from_yaml_file;
use crate::services::server_config::{ConfigOverrides, ServerConfig};

pub async fn serve_command(
    config_path: Option<&str>,
    overrides: ConfigOverrides,
) -> Result<(), CommandError> {
    let config = ServerConfig::load(config_path, overrides)?;
    let addr = config.socket_addr()?;
    let service = Arc::new(build_report_service(&config)?);

    let (bound, server) = warp::serve(routes(service))
        .try_bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .map_err(|err| CommandError::Bind {
            addr: addr.to_string(),
            message: err.to_string(),
        })?;

    info!(addr = %bound, reports_dir = %config.reports_dir, "server listening");
    println!("Server running at: http://{bound}");
    println!("Press Ctrl+C to stop");
    server.await;
    info!("server stopped");
    Ok(())
}

/// Wires the in-memory lead and scenario stores and the on-disk report directory.
pub fn build_report_service(config: &ServerConfig) -> Result<ReportService, CommandError> {
    let scenarios = match &config.scenarios_file {
        Some(path) => {
            let seeded = load_scenarios_from_yaml_file(path)?;
            info!(count = seeded.len(), file = %path, "scenarios loaded");
            InMemoryScenarioStore::with_scenarios(seeded)?
        }
        None => InMemoryScenarioStore::new(),
    };
    let reports = DirectoryReportStore::open(&config.reports_dir)?;

    Ok(ReportService::new(
        Arc::new(InMemoryLeadStore::new()),
        Arc::new(scenarios),
        Arc::new(reports),
    ))
}
