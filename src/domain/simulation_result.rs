use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

pub const UNBOUNDED_PAYBACK: &str = "Infinity";
const NEGATIVE_INFINITY: &str = "-Infinity";
const NOT_A_NUMBER: &str = "NaN";

/// JSON has no non-finite numbers, so those are written as marker strings.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub inputs: Map<String, Value>,
    #[serde(serialize_with = "serialize_metric")]
    pub monthly_savings: f64,
    /// `f64::INFINITY` when the automation never pays for itself.
    #[serde(serialize_with = "serialize_metric")]
    pub payback_months: f64,
    #[serde(serialize_with = "serialize_metric")]
    pub roi_percentage: f64,
}

impl SimulationResult {
    /// Result fields in report order, without the echoed inputs.
    pub fn result_fields(&self) -> [(&'static str, f64); 3] {
        [
            ("monthly_savings", self.monthly_savings),
            ("payback_months", self.payback_months),
            ("roi_percentage", self.roi_percentage),
        ]
    }

    pub fn pays_back(&self) -> bool {
        self.payback_months.is_finite()
    }
}

fn serialize_metric<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_nan() {
        serializer.serialize_str(NOT_A_NUMBER)
    } else if value.is_infinite() && value.is_sign_positive() {
        serializer.serialize_str(UNBOUNDED_PAYBACK)
    } else if value.is_infinite() {
        serializer.serialize_str(NEGATIVE_INFINITY)
    } else {
        serializer.serialize_f64(*value)
    }
}
