//! Summarize command implementation.

use crate::assistant::Assistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the summarize command.
pub async fn run_summarize(file: &str, settings: Settings) -> Result<()> {
    let path = Path::new(file);

    let model_config = match preflight::check(Operation::Document, &settings, Some(path)) {
        Ok(config) => config,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'pdfquiz doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let assistant = Assistant::new(&settings)?;

    Output::header("Document Summary");
    Output::kv("File", &path.display().to_string());
    Output::kv("Model", &model_config.model);
    println!();

    let spinner = Output::spinner("Generating summary...");

    match assistant.summarize(path).await {
        Ok(summary) => {
            spinner.finish_and_clear();
            println!("{}\n", summary);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Error generating summary: {}", e));
            Output::info(&format!(
                "Check {} and tool configuration.",
                settings.model.api_key_env
            ));
            return Err(e.into());
        }
    }

    Ok(())
}
