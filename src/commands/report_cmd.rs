use std::sync::Arc;

use serde_json::Value;

use crate::commands::CommandError;
use crate::services::lead_store::InMemoryLeadStore;
use crate::services::payload_file::load_payload_from_file;
use crate::services::report_service::{GenerateReportRequest, ReportService};
use crate::services::report_store::DirectoryReportStore;
use crate::services::scenario_store::InMemoryScenarioStore;

pub fn report_command(input: &str, email: &str, reports_dir: &str) -> Result<(), CommandError> {
    let payload = load_payload_from_file(input)?;
    let reports = Arc::new(DirectoryReportStore::open(reports_dir)?);
    let service = ReportService::new(
        Arc::new(InMemoryLeadStore::new()),
        Arc::new(InMemoryScenarioStore::new()),
        reports.clone(),
    );

    let report = service.generate_report(GenerateReportRequest {
        email: Some(email.to_string()),
        scenario_id: None,
        payload: Some(Value::Object(payload)),
    })?;

    let path = reports.root().join(&report.filename);
    println!("Report written to {}", path.display());
    Ok(())
}
