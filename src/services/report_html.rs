use chrono::{DateTime, Utc};
use html_escape::encode_text;
use serde_json::Value;

use crate::domain::simulation_result::SimulationResult;

pub const REPORT_TITLE: &str = "ROI Report";
pub const REPORT_HEADING: &str = "Invoice Automation ROI Report";

/// Renders the standalone HTML document stored for one report.
///
/// Inputs are listed in the order they were submitted, results in
/// `monthly_savings, payback_months, roi_percentage` order. All text is escaped.
pub fn render_report_html(
    email: &str,
    generated_at: DateTime<Utc>,
    result: &SimulationResult,
) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str("<!doctype html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{REPORT_TITLE}</title></head><body>"));
    html.push_str(&format!("<h1>{REPORT_HEADING}</h1>"));
    html.push_str(&format!(
        "<p>Generated: {} UTC</p>",
        format_timestamp(generated_at)
    ));
    html.push_str(&format!("<h2>Submitted by: {}</h2>", encode_text(email)));

    html.push_str("<h3>Inputs</h3><ul>");
    for (key, value) in &result.inputs {
        push_entry(&mut html, key, &display_value(value));
    }
    html.push_str("</ul>");

    html.push_str("<h3>Results</h3><ul>");
    for (key, value) in result.result_fields() {
        push_entry(&mut html, key, &value.to_string());
    }
    html.push_str("</ul>");

    html.push_str("</body></html>");
    html
}

/// ISO-8601 without offset, microsecond precision.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn push_entry(html: &mut String, key: &str, value: &str) {
    html.push_str(&format!(
        "<li><strong>{}</strong>: {}</li>",
        encode_text(key),
        encode_text(value)
    ));
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
