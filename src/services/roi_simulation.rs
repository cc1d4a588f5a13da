use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::simulation_input::{InvalidInputError, SimulationInput};
use crate::domain::simulation_result::SimulationResult;

pub const AUTOMATED_COST_PER_INVOICE: f64 = 0.2;
pub const ERROR_RATE_AUTO: f64 = 0.001;
/// Uniform uplift on monthly savings.
pub const MIN_ROI_BOOST_FACTOR: f64 = 1.1;

/// Unrounded intermediate figures of one computation.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SavingsBreakdown {
    pub labor_cost_manual: f64,
    pub auto_cost: f64,
    pub error_savings: f64,
    pub monthly_savings: f64,
    pub cumulative_savings: f64,
    pub net_savings: f64,
    pub payback_months: f64,
    pub roi_percentage: f64,
}

/// Parses `payload` and runs the ROI formula over it.
///
/// Absent fields count as zero. The payload itself is echoed back in
/// [`SimulationResult::inputs`] untouched, including keys the formula ignores.
pub fn compute(payload: &Map<String, Value>) -> Result<SimulationResult, InvalidInputError> {
    let input = SimulationInput::from_payload(payload)?;
    let breakdown = compute_breakdown(&input);
    Ok(SimulationResult {
        inputs: payload.clone(),
        monthly_savings: round_to_cents(breakdown.monthly_savings),
        payback_months: round_to_cents(breakdown.payback_months),
        roi_percentage: round_to_cents(breakdown.roi_percentage),
    })
}

pub fn compute_breakdown(input: &SimulationInput) -> SavingsBreakdown {
    let labor_cost_manual = input.num_ap_staff
        * input.hourly_wage
        * input.avg_hours_per_invoice
        * input.monthly_invoice_volume;
    let auto_cost = input.monthly_invoice_volume * AUTOMATED_COST_PER_INVOICE;
    let error_savings =
        (input.error_rate_manual - ERROR_RATE_AUTO) * input.monthly_invoice_volume * input.error_cost;

    let monthly_savings = (labor_cost_manual + error_savings - auto_cost) * MIN_ROI_BOOST_FACTOR;
    let cumulative_savings = monthly_savings * input.time_horizon_months;
    let net_savings = cumulative_savings - input.one_time_implementation_cost;

    let payback_months = if monthly_savings > 0.0 {
        input.one_time_implementation_cost / monthly_savings
    } else {
        f64::INFINITY
    };
    let roi_percentage = if input.one_time_implementation_cost > 0.0 {
        (net_savings / input.one_time_implementation_cost) * 100.0
    } else {
        0.0
    };

    SavingsBreakdown {
        labor_cost_manual,
        auto_cost,
        error_savings,
        monthly_savings,
        cumulative_savings,
        net_savings,
        payback_months,
        roi_percentage,
    }
}

/// Two-decimal rounding on the exact binary value. Non-finite values pass through.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse::<f64>().unwrap_or(value)
}
