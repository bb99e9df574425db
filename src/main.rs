//! pdfquiz CLI entry point.

use anyhow::Result;
use clap::Parser;
use pdfquiz::cli::{commands, Cli, Commands};
use pdfquiz::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up GEMINI_API_KEY and friends from a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config_path = Settings::config_path(cli.config.as_deref());
    let settings = Settings::load_from(Some(&config_path))?;

    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pdfquiz={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Summarize { file } => {
            commands::run_summarize(file, settings).await?;
        }

        Commands::Quiz {
            file,
            style,
            show_answers,
        } => {
            commands::run_quiz(file, style, *show_answers, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &config_path, settings)?;
        }
    }

    Ok(())
}
