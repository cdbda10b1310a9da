//! gpad — the GPA prediction daemon.
//!
//! Loads the fitted scaler and model once, then serves predictions over
//! HTTP. The offline subcommands reuse the same pipeline.
//!
//! # Usage
//!
//! ```text
//! gpad --config gpa.toml serve --port 8000
//! gpad --artifacts-dir ./artifacts predict --input request.json
//! gpad check --strict
//! ```

mod commands;
mod logging;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gpa_core::GpaConfig;

#[derive(Parser)]
#[command(
    name = "gpad",
    about = "Student GPA prediction service",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to gpa.toml. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the model artifacts (overrides the config file).
    #[arg(long, global = true)]
    artifacts_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the prediction API.
    Serve {
        /// Address to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Predict from a JSON request file (`-` for stdin).
    Predict {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Load the artifacts and print the model report.
    Check {
        /// Fail if metrics are missing or below the configured thresholds.
        #[arg(long)]
        strict: bool,
    },
    /// Print the input feature schema.
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = GpaConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.artifacts_dir {
        config.artifacts.dir = dir;
    }
    if let Command::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    let _log_guard = logging::init(&config.logging)?;

    match cli.command {
        Command::Serve { .. } => serve::run(config).await,
        Command::Predict { input } => commands::predict(&config, &input),
        Command::Check { strict } => commands::check(&config, strict),
        Command::Schema => {
            commands::schema();
            Ok(())
        }
    }
}
