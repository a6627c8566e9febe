use crate::core::errors::ExporterError;
use std::fs;
use std::path::{Path, PathBuf};

/// Overwrite the textfile-collection output: write a sibling temp file,
/// then rename it over the target so a concurrently scraping node-exporter
/// never sees a partial write.
pub fn write_textfile(path: &Path, contents: &str) -> Result<(), ExporterError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
