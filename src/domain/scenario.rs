use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A named set of inputs saved for later report runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub id: String,
    pub scenario_name: String,
    pub inputs: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub id: String,
    pub scenario_name: String,
}

impl Scenario {
    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            id: self.id.clone(),
            scenario_name: self.scenario_name.clone(),
        }
    }

    /// Flattened form the browser client uses to refill its inputs.
    pub fn to_flat_json(&self) -> Value {
        let mut flat = Map::new();
        flat.insert("id".to_string(), Value::String(self.id.clone()));
        flat.insert(
            "scenario_name".to_string(),
            Value::String(self.scenario_name.clone()),
        );
        for (key, value) in &self.inputs {
            flat.insert(key.clone(), value.clone());
        }
        Value::Object(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_flat_json_puts_inputs_next_to_name() {
        let scenario = Scenario {
            id: "3".to_string(),
            scenario_name: "Baseline".to_string(),
            inputs: json!({"hourly_wage": 20, "num_ap_staff": 2})
                .as_object()
                .cloned()
                .unwrap(),
            created_at: Utc::now(),
        };

        assert_eq!(
            scenario.to_flat_json(),
            json!({"id": "3", "scenario_name": "Baseline", "hourly_wage": 20, "num_ap_staff": 2})
        );
        assert_eq!(scenario.summary().scenario_name, "Baseline");
    }
}
