use clap::{CommandFactory, Parser};
use tracing::error;

use invoice_roi::commands::CommandError;
use invoice_roi::commands::base_commands::{CliArgs, Commands};
use invoice_roi::commands::report_cmd::report_command;
use invoice_roi::commands::serve_cmd::serve_command;
use invoice_roi::commands::simulate_cmd::simulate_command;
use invoice_roi::services::logging::{DEFAULT_LOG_FILTER, init_logging};
use invoice_roi::services::server_config::ConfigOverrides;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(DEFAULT_LOG_FILTER);

    let outcome: Result<(), CommandError> = match args.command {
        Commands::Serve {
            config,
            host,
            port,
            reports_dir,
            scenarios,
        } => {
            let overrides = ConfigOverrides {
                host,
                port,
                reports_dir,
                scenarios_file: scenarios,
            };
            serve_command(config.as_deref(), overrides).await
        }
        Commands::Simulate { input, output } => simulate_command(&input, output.as_deref()).await,
        Commands::Report {
            input,
            email,
            reports_dir,
        } => report_command(&input, &email, &reports_dir),
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = outcome {
        error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
