use anyhow::{Context, Result};
use facegrab_model::RunReport;
use std::fs;
use std::path::Path;

/// Write a run report as pretty JSON, creating parent directories as needed.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        downloads = report.total(),
        failed = report.failed.len(),
        "Wrote run report"
    );
    Ok(())
}
