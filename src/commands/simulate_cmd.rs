use crate::commands::CommandError;
use crate::commands::report_format::format_simulation_report;
use crate::domain::simulation_input::SimulationInput;
use crate::services::payload_file::load_payload_from_file;
use crate::services::roi_simulation::{compute, compute_breakdown};

pub async fn simulate_command(input: &str, output: Option<&str>) -> Result<(), CommandError> {
    let payload = load_payload_from_file(input)?;
    let result = compute(&payload)?;
    let breakdown = compute_breakdown(&SimulationInput::from_payload(&payload)?);

    println!("{}", format_simulation_report(&result, &breakdown));

    if let Some(output) = output {
        let yaml = serde_yaml::to_string(&result)?;
        tokio::fs::write(output, yaml)
            .await
            .map_err(|source| CommandError::Write {
                path: output.to_string(),
                source,
            })?;
        println!("Simulation result written to {output}");
    }
    Ok(())
}
