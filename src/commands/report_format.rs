use serde_json::Value;

use crate::domain::simulation_result::SimulationResult;
use crate::services::roi_simulation::SavingsBreakdown;

pub fn format_simulation_report(result: &SimulationResult, breakdown: &SavingsBreakdown) -> String {
    let mut lines = Vec::new();
    lines.push("ROI Simulation".to_string());
    lines.push(String::new());
    lines.push("Inputs:".to_string());
    if result.inputs.is_empty() {
        lines.push("  (none, all fields default to 0)".to_string());
    }
    for (key, value) in &result.inputs {
        lines.push(format!("  {key}: {}", format_input(value)));
    }
    lines.push(String::new());
    lines.push("Breakdown:".to_string());
    lines.push(format!("  Manual labor cost: {:.2}", breakdown.labor_cost_manual));
    lines.push(format!("  Automation cost: {:.2}", breakdown.auto_cost));
    lines.push(format!("  Error savings: {:.2}", breakdown.error_savings));
    lines.push(format!("  Cumulative savings: {:.2}", breakdown.cumulative_savings));
    lines.push(format!("  Net savings: {:.2}", breakdown.net_savings));
    lines.push(String::new());
    lines.push("Results:".to_string());
    lines.push(format!("  Monthly savings: {:.2}", result.monthly_savings));
    lines.push(format!("  Payback months: {}", format_payback(result)));
    lines.push(format!("  ROI: {:.2} %", result.roi_percentage));

    lines.join("\n")
}

fn format_input(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_payback(result: &SimulationResult) -> String {
    if result.pays_back() {
        format!("{:.2}", result.payback_months)
    } else {
        "never".to_string()
    }
}
