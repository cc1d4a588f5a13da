use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::scenario::{Scenario, ScenarioSummary};
use crate::domain::simulation_input::InvalidInputError;
use crate::domain::simulation_result::SimulationResult;
use crate::services::data_source::{LeadStore, ScenarioStore, StoreError};
use crate::services::report_html::render_report_html;
use crate::services::report_store::{ReportStore, ReportStoreError, validate_report_name};
use crate::services::roi_simulation::compute;

pub const REPORTS_ROUTE: &str = "/reports";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("report store failure: {0}")]
    ReportStore(#[from] ReportStoreError),
}

impl ReportError {
    fn bad_request(message: &str) -> Self {
        Self::BadRequest(message.to_string())
    }

    fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }
}

/// Body of a report request.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct GenerateReportRequest {
    pub email: Option<String>,
    #[serde(deserialize_with = "deserialize_scenario_id")]
    pub scenario_id: Option<String>,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReport {
    pub report_id: Uuid,
    pub filename: String,
    pub report_url: String,
    pub lead_id: String,
    pub result: SimulationResult,
}

/// Accepts ids as JSON strings or numbers. Blank strings, `0` and `false` count as absent.
fn deserialize_scenario_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "scenario_id must be a string or number, got {other}"
        ))),
    }
}

pub struct ReportService {
    leads: Arc<dyn LeadStore>,
    scenarios: Arc<dyn ScenarioStore>,
    reports: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(
        leads: Arc<dyn LeadStore>,
        scenarios: Arc<dyn ScenarioStore>,
        reports: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            leads,
            scenarios,
            reports,
        }
    }

    /// Runs the engine over a request body. `null` counts as an empty object.
    pub fn simulate(&self, payload: &Value) -> Result<SimulationResult, ReportError> {
        let payload = payload_object(payload)?;
        Ok(compute(&payload)?)
    }

    pub fn generate_report(
        &self,
        request: GenerateReportRequest,
    ) -> Result<GeneratedReport, ReportError> {
        self.generate_report_at(request, Utc::now())
    }

    pub fn generate_report_at(
        &self,
        request: GenerateReportRequest,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedReport, ReportError> {
        let email = request
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .ok_or_else(|| ReportError::bad_request("email required"))?;

        let lead_id = self.leads.save(email, request.scenario_id.as_deref())?;
        debug!(lead_id = %lead_id, "lead recorded");

        let payload = match request.scenario_id.as_deref() {
            Some(scenario_id) => {
                let scenario = self
                    .scenarios
                    .get(scenario_id)?
                    .ok_or_else(|| ReportError::not_found("scenario not found"))?;
                Some(Value::Object(scenario.inputs))
            }
            None => request.payload,
        };

        let payload = match payload {
            Some(Value::Object(map)) if !map.is_empty() => map,
            Some(Value::Object(_)) | Some(Value::Null) | None => {
                return Err(ReportError::bad_request("payload required to generate report"));
            }
            Some(_) => return Err(ReportError::bad_request("payload must be a JSON object")),
        };

        let result = compute(&payload)?;

        let report_id = Uuid::new_v4();
        let filename = report_filename(report_id);
        let html = render_report_html(email, generated_at, &result);
        self.reports.write(&filename, html.as_bytes())?;
        info!(report = %filename, "report generated");

        Ok(GeneratedReport {
            report_id,
            report_url: format!("{REPORTS_ROUTE}/{filename}"),
            filename,
            lead_id,
            result,
        })
    }

    /// Returns the stored bytes of a report. Names that could leave the store read as missing.
    pub fn fetch_report(&self, filename: &str) -> Result<Vec<u8>, ReportError> {
        validate_report_name(filename).map_err(|_| ReportError::not_found("report not found"))?;
        match self.reports.read(filename) {
            Ok(bytes) => Ok(bytes),
            Err(ReportStoreError::NotFound(_)) | Err(ReportStoreError::InvalidName(_)) => {
                Err(ReportError::not_found("report not found"))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Saves a flat `{scenario_name, ...inputs}` body and returns the new id.
    pub fn save_scenario(&self, body: &Value) -> Result<String, ReportError> {
        let body = match body {
            Value::Object(map) => map,
            _ => return Err(ReportError::bad_request("payload must be a JSON object")),
        };
        let scenario_name = match body.get("scenario_name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err(ReportError::bad_request("scenario_name required")),
        };
        let inputs: Map<String, Value> = body
            .iter()
            .filter(|(key, _)| key.as_str() != "scenario_name")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        compute(&inputs)?;

        let id = self.scenarios.save(&scenario_name, inputs)?;
        info!(scenario_id = %id, scenario_name = %scenario_name, "scenario saved");
        Ok(id)
    }

    pub fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, ReportError> {
        Ok(self
            .scenarios
            .list()?
            .iter()
            .map(Scenario::summary)
            .collect())
    }

    pub fn get_scenario(&self, id: &str) -> Result<Scenario, ReportError> {
        self.scenarios
            .get(id)?
            .ok_or_else(|| ReportError::not_found("scenario not found"))
    }
}

pub fn report_filename(report_id: Uuid) -> String {
    format!("report_{report_id}.html")
}

fn payload_object(payload: &Value) -> Result<Map<String, Value>, ReportError> {
    match payload {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        _ => Err(ReportError::bad_request("payload must be a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{example_payload, in_memory_service};
    use chrono::TimeZone;
    use serde_json::json;

    fn request(value: Value) -> GenerateReportRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn simulate_treats_null_as_empty_payload() {
        let fixture = in_memory_service();
        let result = fixture.service.simulate(&Value::Null).unwrap();
        assert_eq!(result.payback_months, f64::INFINITY);
        assert!(result.inputs.is_empty());
    }

    #[test]
    fn simulate_rejects_non_object_payload() {
        let fixture = in_memory_service();
        let err = fixture.service.simulate(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ReportError::BadRequest(_)));
    }

    #[test]
    fn generate_report_requires_email() {
        let fixture = in_memory_service();
        for body in [json!({"payload": example_payload()}), json!({"email": "", "payload": example_payload()})] {
            let err = fixture.service.generate_report(request(body)).unwrap_err();
            assert_eq!(err.to_string(), "email required");
        }
        assert!(fixture.reports.names().is_empty());
        assert!(fixture.leads.leads().is_empty());
    }

    #[test]
    fn generate_report_keeps_email_as_submitted() {
        let fixture = in_memory_service();
        let report = fixture
            .service
            .generate_report(request(json!({"email": " a@example.com ", "payload": example_payload()})))
            .unwrap();

        let html = String::from_utf8(fixture.service.fetch_report(&report.filename).unwrap()).unwrap();
        assert!(html.contains("<h2>Submitted by:  a@example.com </h2>"));
        assert_eq!(fixture.leads.leads()[0].email, " a@example.com ");
    }

    #[test]
    fn falsy_scenario_ids_fall_back_to_inline_payload() {
        let fixture = in_memory_service();
        for scenario_id in [json!(0), json!(false), json!(""), json!(null)] {
            let report = fixture
                .service
                .generate_report(request(json!({
                    "email": "a@example.com",
                    "scenario_id": scenario_id,
                    "payload": example_payload()
                })))
                .unwrap();
            assert_eq!(report.result.roi_percentage, 407.54);
        }
        assert!(fixture.leads.leads().iter().all(|lead| lead.scenario_id.is_none()));
    }

    #[test]
    fn generate_report_requires_payload() {
        let fixture = in_memory_service();
        for body in [json!({"email": "a@example.com"}), json!({"email": "a@example.com", "payload": {}})] {
            let err = fixture.service.generate_report(request(body)).unwrap_err();
            assert_eq!(err.to_string(), "payload required to generate report");
        }
        assert!(fixture.reports.names().is_empty());
    }

    #[test]
    fn generate_report_unknown_scenario_is_not_found() {
        let fixture = in_memory_service();
        let err = fixture
            .service
            .generate_report(request(json!({"email": "a@example.com", "scenario_id": "99"})))
            .unwrap_err();

        assert!(matches!(err, ReportError::NotFound(_)));
        assert_eq!(err.to_string(), "scenario not found");
        assert!(fixture.reports.names().is_empty());
    }

    #[test]
    fn generate_report_writes_named_report() {
        let fixture = in_memory_service();
        let generated_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let report = fixture
            .service
            .generate_report_at(
                request(json!({"email": "a@example.com", "payload": example_payload()})),
                generated_at,
            )
            .unwrap();

        assert_eq!(report.filename, format!("report_{}.html", report.report_id));
        assert_eq!(report.report_url, format!("/reports/{}", report.filename));
        assert_eq!(fixture.reports.names(), vec![report.filename.clone()]);

        let html = String::from_utf8(fixture.service.fetch_report(&report.filename).unwrap()).unwrap();
        assert!(html.contains("Submitted by: a@example.com"));
        assert!(html.contains("Generated: 2026-01-02T03:04:05.000000 UTC"));
        assert!(html.contains("<li><strong>roi_percentage</strong>: 407.54</li>"));
        assert_eq!(fixture.leads.leads()[0].id, report.lead_id);
    }

    #[test]
    fn generate_report_prefers_scenario_inputs() {
        let fixture = in_memory_service();
        let id = fixture
            .service
            .save_scenario(&json!({"scenario_name": "Baseline", "hourly_wage": 30}))
            .unwrap();

        let report = fixture
            .service
            .generate_report(request(json!({
                "email": "a@example.com",
                "scenario_id": id.parse::<u64>().unwrap(),
                "payload": example_payload()
            })))
            .unwrap();

        assert_eq!(report.result.inputs, json!({"hourly_wage": 30}).as_object().cloned().unwrap());
        assert_eq!(fixture.leads.leads()[0].scenario_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn generate_report_rejects_unparseable_inputs() {
        let fixture = in_memory_service();
        let err = fixture
            .service
            .generate_report(request(json!({
                "email": "a@example.com",
                "payload": {"hourly_wage": "lots"}
            })))
            .unwrap_err();

        assert!(matches!(err, ReportError::InvalidInput(_)));
        assert!(fixture.reports.names().is_empty());
    }

    #[test]
    fn fetch_report_hides_traversal_attempts() {
        let fixture = in_memory_service();
        for name in ["../secret.html", "missing.html", ""] {
            let err = fixture.service.fetch_report(name).unwrap_err();
            assert!(matches!(err, ReportError::NotFound(_)));
        }
    }

    #[test]
    fn save_scenario_requires_name() {
        let fixture = in_memory_service();
        let err = fixture
            .service
            .save_scenario(&json!({"hourly_wage": 30}))
            .unwrap_err();
        assert_eq!(err.to_string(), "scenario_name required");
    }

    #[test]
    fn scenarios_list_and_fetch_by_id() {
        let fixture = in_memory_service();
        let id = fixture
            .service
            .save_scenario(&json!({"scenario_name": "Q3 plan", "num_ap_staff": 3}))
            .unwrap();

        let summaries = fixture.service.list_scenarios().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].scenario_name, "Q3 plan");

        let scenario = fixture.service.get_scenario(&id).unwrap();
        assert_eq!(scenario.inputs.get("num_ap_staff"), Some(&json!(3)));
        assert!(!scenario.inputs.contains_key("scenario_name"));
        assert!(matches!(fixture.service.get_scenario("404"), Err(ReportError::NotFound(_))));
    }
}
