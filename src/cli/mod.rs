//! CLI module for pdfquiz.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// pdfquiz - PDF summaries and quizzes from a tool-calling agent
///
/// Upload a PDF in the browser (`serve`) or point the CLI at one
/// (`summarize`, `quiz`).
#[derive(Parser, Debug)]
#[command(name = "pdfquiz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web UI (upload, summary, quiz)
    Serve {
        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Summarize a PDF
    Summarize {
        /// Path to the PDF file
        file: String,
    },

    /// Generate a quiz from a PDF
    Quiz {
        /// Path to the PDF file
        file: String,

        /// Quiz style: MCQ for multiple choice, anything else for open-ended
        #[arg(short, long, default_value = "MCQ")]
        style: String,

        /// Print answers right away instead of waiting for Enter
        #[arg(long)]
        show_answers: bool,
    },

    /// Check configuration and connectivity prerequisites
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
