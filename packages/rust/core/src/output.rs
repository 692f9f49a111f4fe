//! Persistence of finished analyses as JSON documents.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use leadscope_shared::{AnalysisOutput, LeadScopeError, Result};

/// Writes one JSON file per processed registration into `dir`.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File name for `output`: `analysis_<YYYYmmdd_HHMMSS>_<request_id>.json`.
    pub fn file_name(output: &AnalysisOutput) -> String {
        format!(
            "analysis_{}_{}.json",
            output.timestamp.format("%Y%m%d_%H%M%S"),
            output.request_id
        )
    }

    /// Write `output`, creating the directory if needed. Returns the file path.
    pub fn save(&self, output: &AnalysisOutput) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| LeadScopeError::io(&self.dir, e))?;

        let path = self.dir.join(Self::file_name(output));
        write_json(&path, output)?;

        info!(path = %path.display(), request_id = %output.request_id, "analysis saved");
        Ok(path)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).map_err(|e| LeadScopeError::io(path, e))?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}
