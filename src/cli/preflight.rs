//! Pre-flight checks before model calls.
//!
//! Validates that configuration and input files are in place before
//! starting operations that would otherwise fail midway.

use crate::config::{ModelConfig, Settings};
use crate::error::{PdfQuizError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Summary or quiz of a local file: API key and a readable file.
    Document,
    /// Web server: API key and a writable upload directory.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns the resolved model endpoint if all checks pass.
pub fn check(operation: Operation, settings: &Settings, file: Option<&Path>) -> Result<ModelConfig> {
    let model_config = settings.model_config()?;

    match operation {
        Operation::Document => {
            if let Some(path) = file {
                check_file(path)?;
            }
        }
        Operation::Serve => {
            std::fs::create_dir_all(settings.upload_dir()).map_err(|e| {
                PdfQuizError::Config(format!(
                    "Cannot create upload directory {}: {}",
                    settings.upload_dir().display(),
                    e
                ))
            })?;
        }
    }

    Ok(model_config)
}

/// Check that the input is an existing regular file.
fn check_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PdfQuizError::InvalidInput(format!(
            "File not found: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(PdfQuizError::InvalidInput(format!(
            "Not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_rejected() {
        assert!(check_file(Path::new("/no/such/file.pdf")).is_err());
        let dir = tempfile::tempdir().unwrap();
        assert!(check_file(dir.path()).is_err());

        let file = dir.path().join("a.pdf");
        std::fs::write(&file, b"%PDF").unwrap();
        assert!(check_file(&file).is_ok());
    }

    #[test]
    fn test_missing_key_fails_first() {
        let mut settings = Settings::default();
        settings.model.api_key_env = "PDFQUIZ_PREFLIGHT_KEY_NEVER_SET".to_string();
        let err = check(Operation::Document, &settings, None).unwrap_err();
        assert!(matches!(err, PdfQuizError::Config(_)));
    }
}
