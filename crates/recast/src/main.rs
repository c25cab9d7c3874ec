use clap::{Parser, Subcommand};
use recast::commands::{run_check, run_generate, run_rules, ProjectContext};
use recast::logging::init_logging;
use starbase::{App, AppResult, AppSession};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Recast - generate record mapping functions from type models
#[derive(Parser)]
#[command(name = "recast")]
#[command(about = "Generate record-to-record mapping functions", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Path to recast.toml (discovered upwards from the working directory by default)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Generate one mapping function file per declaration
    Generate {
        /// Model file or directory of model files
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve every declaration and report diagnostics without writing files
    Check {
        /// Model file or directory of model files
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List conversion rules in resolution order
    Rules {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Application session for the recast CLI
#[derive(Clone)]
struct RecastSession {
    command: Commands,
    project: ProjectContext,
}

#[async_trait::async_trait]
impl AppSession for RecastSession {
    async fn execute(&mut self) -> AppResult {
        match &self.command {
            Commands::Generate {
                input,
                output,
                json,
            } => run_generate(&self.project, input.clone(), output.clone(), *json),
            Commands::Check { input, json } => run_check(&self.project, input.clone(), *json),
            Commands::Rules { json } => run_rules(&self.project, *json),
        }
    }
}

#[tokio::main]
async fn main() -> starbase::MainResult {
    let cli = Cli::parse();

    let start = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;
    let project = ProjectContext::load(cli.config.as_deref(), &start)?;

    let _guard = init_logging(&project.config.logging, cli.verbose)
        .map_err(|e| miette::miette!("{:#}", e))?;

    let session = RecastSession {
        command: cli.command,
        project,
    };

    let exit_code = App::default()
        .run(session, |mut session| async move { session.execute().await })
        .await?;

    Ok(std::process::ExitCode::from(exit_code))
}
