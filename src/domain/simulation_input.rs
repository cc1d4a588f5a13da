use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const MONTHLY_INVOICE_VOLUME: &str = "monthly_invoice_volume";
pub const NUM_AP_STAFF: &str = "num_ap_staff";
pub const AVG_HOURS_PER_INVOICE: &str = "avg_hours_per_invoice";
pub const HOURLY_WAGE: &str = "hourly_wage";
pub const ERROR_RATE_MANUAL: &str = "error_rate_manual";
pub const ERROR_COST: &str = "error_cost";
pub const TIME_HORIZON_MONTHS: &str = "time_horizon_months";
pub const ONE_TIME_IMPLEMENTATION_COST: &str = "one_time_implementation_cost";

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid value for {field}: {value}")]
pub struct InvalidInputError {
    pub field: String,
    pub value: String,
}

/// Numeric view of a submitted payload. Absent fields are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationInput {
    pub monthly_invoice_volume: f64,
    pub num_ap_staff: f64,
    pub avg_hours_per_invoice: f64,
    pub hourly_wage: f64,
    pub error_rate_manual: f64,
    pub error_cost: f64,
    pub time_horizon_months: f64,
    pub one_time_implementation_cost: f64,
}

impl SimulationInput {
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, InvalidInputError> {
        Ok(Self {
            monthly_invoice_volume: read_field(payload, MONTHLY_INVOICE_VOLUME)?,
            num_ap_staff: read_field(payload, NUM_AP_STAFF)?,
            avg_hours_per_invoice: read_field(payload, AVG_HOURS_PER_INVOICE)?,
            hourly_wage: read_field(payload, HOURLY_WAGE)?,
            error_rate_manual: read_field(payload, ERROR_RATE_MANUAL)?,
            error_cost: read_field(payload, ERROR_COST)?,
            time_horizon_months: read_field(payload, TIME_HORIZON_MONTHS)?,
            one_time_implementation_cost: read_field(payload, ONE_TIME_IMPLEMENTATION_COST)?,
        })
    }
}

fn read_field(payload: &Map<String, Value>, field: &str) -> Result<f64, InvalidInputError> {
    match payload.get(field) {
        None => Ok(0.0),
        Some(value) => value_as_f64(value).ok_or_else(|| InvalidInputError {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Numbers, numeric strings and booleans convert; everything else is rejected.
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
