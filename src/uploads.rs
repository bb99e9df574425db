//! Storage of uploaded PDFs.
//!
//! Files land in a single directory under the name they were uploaded
//! with. A later upload with the same name replaces the earlier file.

use crate::error::{PdfQuizError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Validate a client-supplied file name and return the name to store under.
///
/// Only the last path component is kept; it must be a `.pdf` file.
pub fn upload_file_name(raw: &str) -> Result<String> {
    let name = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(PdfQuizError::Upload(format!("invalid file name '{}'", raw)));
    }

    let is_pdf = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(PdfQuizError::Upload(format!(
            "'{}' is not a PDF file (only .pdf uploads are accepted)",
            name
        )));
    }

    Ok(name.to_string())
}

/// Write `bytes` to `dir` under `file_name`, replacing any existing file.
///
/// The data goes to a temporary file first, so readers never see a
/// half-written PDF.
pub fn save_upload(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let name = upload_file_name(file_name)?;
    std::fs::create_dir_all(dir)?;

    let target = dir.join(&name);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| PdfQuizError::Io(e.error))?;

    info!("Saved upload {} ({} bytes)", target.display(), bytes.len());
    Ok(target)
}

/// Path of a previously uploaded file, if it exists.
pub fn find_upload(dir: &Path, file_name: &str) -> Result<Option<PathBuf>> {
    let name = upload_file_name(file_name)?;
    let path = dir.join(name);
    Ok(path.is_file().then_some(path))
}
