use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the ROI calculator and report endpoints over HTTP
    Serve {
        /// Path to a server config YAML
        #[arg(short, long)]
        config: Option<String>,
        /// Address to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory generated reports are written to
        #[arg(short, long)]
        reports_dir: Option<String>,
        /// Scenario YAML file to preload
        #[arg(short, long)]
        scenarios: Option<String>,
    },
    /// Compute the ROI of an input file (YAML or JSON) and print a summary
    Simulate {
        /// Input file with the simulation fields
        #[arg(short, long)]
        input: String,
        /// Optional output YAML file for the result
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Write an HTML ROI report for an input file
    Report {
        /// Input file with the simulation fields
        #[arg(short, long)]
        input: String,
        /// Email of the person the report is for
        #[arg(short, long)]
        email: String,
        /// Directory the report is written to
        #[arg(short, long, default_value = "reports")]
        reports_dir: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
