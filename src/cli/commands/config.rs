//! Config command implementation.
//!
//! Every action works on the config file actually in use, which is the
//! `--config` path when one was given.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the config command against the file at `config_path`.
pub fn run_config(action: &ConfigAction, config_path: &Path, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str =
                toml::to_string_pretty(&settings).context("Failed to serialize config")?;
            println!("# {}", config_path.display());
            println!("{}", toml_str);
        }
        ConfigAction::Edit => edit_config(config_path, &settings)?,
        ConfigAction::Path => println!("{}", config_path.display()),
    }

    Ok(())
}

fn edit_config(config_path: &Path, settings: &Settings) -> Result<()> {
    if ensure_config_file(config_path, settings)? {
        Output::info(&format!("Wrote current settings to {}", config_path.display()));
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    Output::info(&format!("Opening {} in {}...", config_path.display(), editor));

    match std::process::Command::new(&editor).arg(config_path).status() {
        Ok(status) if status.success() => Output::success("Config saved."),
        Ok(status) => Output::warning(&format!("{} exited with {}", editor, status)),
        Err(e) => {
            Output::error(&format!("Failed to launch {}: {}", editor, e));
            Output::info(&format!("Edit the file by hand: {}", config_path.display()));
        }
    }

    Ok(())
}

/// Write `settings` to `config_path` unless the file already exists.
///
/// Returns whether a file was written.
fn ensure_config_file(config_path: &Path, settings: &Settings) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }
    settings
        .save_to(&config_path.to_path_buf())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_creates_file_at_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom").join("pdfquiz.toml");

        let mut settings = Settings::default();
        settings.server.port = 9100;

        assert!(ensure_config_file(&path, &settings).unwrap());
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 9100);
    }

    #[test]
    fn test_ensure_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdfquiz.toml");
        std::fs::write(&path, "[server]\nport = 7000\n").unwrap();

        assert!(!ensure_config_file(&path, &Settings::default()).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[server]\nport = 7000\n"
        );
    }

    #[test]
    fn test_path_action_succeeds_for_custom_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        run_config(&ConfigAction::Path, &path, Settings::default()).unwrap();
        assert!(!path.exists());
    }
}
