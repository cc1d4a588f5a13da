pub mod lead;
pub mod scenario;
pub mod simulation_input;
pub mod simulation_result;
