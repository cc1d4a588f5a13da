use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::services::lead_store::InMemoryLeadStore;
use crate::services::report_service::ReportService;
use crate::services::report_store::InMemoryReportStore;
use crate::services::scenario_store::InMemoryScenarioStore;

pub fn payload_from(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

/// Inputs of the documented example: 4229.5 per month, 407.54 % ROI over a year.
pub fn example_payload() -> Map<String, Value> {
    payload_from(json!({
        "monthly_invoice_volume": 1000,
        "num_ap_staff": 2,
        "avg_hours_per_invoice": 0.1,
        "hourly_wage": 20,
        "error_rate_manual": 0.01,
        "error_cost": 5,
        "time_horizon_months": 12,
        "one_time_implementation_cost": 10000
    }))
}

pub struct ServiceFixture {
    pub service: ReportService,
    pub leads: Arc<InMemoryLeadStore>,
    pub scenarios: Arc<InMemoryScenarioStore>,
    pub reports: Arc<InMemoryReportStore>,
}

pub fn in_memory_service() -> ServiceFixture {
    let leads = Arc::new(InMemoryLeadStore::new());
    let scenarios = Arc::new(InMemoryScenarioStore::new());
    let reports = Arc::new(InMemoryReportStore::new());
    let service = ReportService::new(leads.clone(), scenarios.clone(), reports.clone());
    ServiceFixture {
        service,
        leads,
        scenarios,
        reports,
    }
}
