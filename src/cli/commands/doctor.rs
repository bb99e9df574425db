//! Doctor command - verify configuration and prerequisites.

use crate::cli::Output;
use crate::config::{ModelConfig, Prompts, Settings};
use console::style;
use std::path::Path;
use url::Url;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks; `config_path` is the config file in use.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("pdfquiz Doctor");
    println!();
    println!("Checking configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Model API").bold());
    let model_checks = vec![
        check_api_key(&settings.model.api_key_env, std::env::var(&settings.model.api_key_env).ok()),
        check_base_url(&settings.model.base_url),
        check_model_config(settings),
    ];
    for check in &model_checks {
        check.print();
    }
    checks.extend(model_checks);

    println!();

    println!("{}", style("Directories").bold());
    let dir_check = check_upload_dir(settings);
    dir_check.print();
    checks.push(dir_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);
    let prompt_check = check_prompts(settings);
    prompt_check.print();
    checks.push(prompt_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using pdfquiz.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! pdfquiz is ready to use.");
    }

    Ok(())
}

/// Check the API key variable, given its current value.
fn check_api_key(var: &str, value: Option<String>) -> CheckResult {
    let set_hint = format!("Set with: export {}='...' (or add it to .env)", var);
    match value {
        Some(key) if key.trim().is_empty() => CheckResult::error(var, "empty", &set_hint),
        Some(key) if key.chars().count() > 12 => {
            let chars: Vec<char> = key.chars().collect();
            let masked = format!(
                "{}...{}",
                chars[..4].iter().collect::<String>(),
                chars[chars.len() - 4..].iter().collect::<String>()
            );
            CheckResult::ok(var, &format!("configured ({})", masked))
        }
        Some(_) => CheckResult::warning(var, "set but unusually short", "Double-check the key value"),
        None => CheckResult::error(var, "not set", &set_hint),
    }
}

fn check_base_url(base_url: &str) -> CheckResult {
    match Url::parse(base_url) {
        Ok(url) if url.scheme() == "https" => CheckResult::ok("Base URL", base_url),
        Ok(_) => CheckResult::warning(
            "Base URL",
            base_url,
            "Plain HTTP sends the API key unencrypted",
        ),
        Err(e) => CheckResult::error(
            "Base URL",
            &format!("invalid: {}", e),
            "Set model.base_url to an OpenAI-compatible endpoint",
        ),
    }
}

fn check_model_config(settings: &Settings) -> CheckResult {
    match ModelConfig::from_settings(&settings.model) {
        Ok(config) => CheckResult::ok(
            "Model",
            &format!(
                "{} (timeout {}s, max {} iterations)",
                config.model,
                config.timeout.as_secs(),
                config.max_iterations
            ),
        ),
        Err(e) => CheckResult::error("Model", &e.to_string(), "Fix the [model] section of the config"),
    }
}

fn check_upload_dir(settings: &Settings) -> CheckResult {
    let dir = settings.upload_dir();
    if dir.is_dir() {
        let count = std::fs::read_dir(&dir).map(|d| d.count()).unwrap_or(0);
        CheckResult::ok(
            "Upload directory",
            &format!("{} ({} files)", dir.display(), count),
        )
    } else if dir.exists() {
        CheckResult::error(
            "Upload directory",
            &format!("{} exists but is not a directory", dir.display()),
            "Point general.upload_dir somewhere else",
        )
    } else {
        CheckResult::warning(
            "Upload directory",
            &format!("{} (will be created)", dir.display()),
            "Directory will be created when the server starts",
        )
    }
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.is_file() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            &format!("{} not found, using defaults", config_path.display()),
            "Create with: pdfquiz config edit",
        )
    }
}

fn check_prompts(settings: &Settings) -> CheckResult {
    match Prompts::load(
        settings.prompts.custom_file.as_deref(),
        Some(&settings.prompts.variables),
    ) {
        Ok(_) if settings.prompts.custom_file.is_some() => {
            CheckResult::ok("Prompts", "custom prompts loaded")
        }
        Ok(_) => CheckResult::ok("Prompts", "built-in defaults"),
        Err(e) => CheckResult::error(
            "Prompts",
            &e.to_string(),
            "Fix or remove prompts.custom_file",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_api_key_checks() {
        assert_eq!(check_api_key("K", None).status, CheckStatus::Error);
        assert_eq!(check_api_key("K", Some(" ".to_string())).status, CheckStatus::Error);
        assert_eq!(check_api_key("K", Some("short".to_string())).status, CheckStatus::Warning);

        let ok = check_api_key("K", Some("AIzaSyExampleKey1234".to_string()));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert_eq!(ok.message, "configured (AIza...1234)");
    }

    #[test]
    fn test_config_file_check_uses_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alt.toml");

        let missing = check_config_file(&path);
        assert_eq!(missing.status, CheckStatus::Warning);
        assert!(missing.message.contains("alt.toml"));

        std::fs::write(&path, "").unwrap();
        let found = check_config_file(&path);
        assert_eq!(found.status, CheckStatus::Ok);
        assert_eq!(found.message, path.display().to_string());
    }

    #[test]
    fn test_base_url_checks() {
        assert_eq!(check_base_url("https://api.openai.com/v1").status, CheckStatus::Ok);
        assert_eq!(check_base_url("http://localhost:11434/v1").status, CheckStatus::Warning);
        assert_eq!(check_base_url("::nope").status, CheckStatus::Error);
    }
}
