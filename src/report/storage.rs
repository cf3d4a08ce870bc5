use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::assembler::AuditReport;
use crate::audit::AuditDocument;

/// Outcome of persisting a report. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

/// On-disk form of a saved report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportArtifact<'a> {
    generated_at: DateTime<Utc>,
    report: &'a AuditReport,
}

/// Write a report to `path` as JSON, atomically.
///
/// Creates the parent directory if needed. Any I/O or serialization failure is
/// logged and returned as an unsuccessful `GenerationResult`.
pub fn save_report(path: &Path, report: &AuditReport, pretty: bool) -> GenerationResult {
    match write_report(path, report, pretty) {
        Ok(()) => {
            tracing::info!(path = %path.display(), audit = %report.audit_id, "saved report");
            GenerationResult::ok()
        }
        Err(e) => {
            let message = format!("{:#}", e);
            tracing::error!(path = %path.display(), error = %message, "failed to save report");
            GenerationResult::failed(message)
        }
    }
}

fn write_report(path: &Path, report: &AuditReport, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory at {}", parent.display()))?;
    }

    let artifact = ReportArtifact {
        generated_at: Utc::now(),
        report,
    };

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    if pretty {
        serde_json::to_writer_pretty(&mut file, &artifact).context("Failed to serialize report")?;
    } else {
        serde_json::to_writer(&mut file, &artifact).context("Failed to serialize report")?;
    }
    file.write_all(b"\n").context("Failed to write report")?;

    file.commit().context("Failed to save report")?;

    Ok(())
}

/// File name for a saved report: `audit-<id>.json`.
///
/// Characters outside `[A-Za-z0-9_-]` in the id become `_`; an empty id gives
/// `audit-report.json`.
pub fn default_report_file_name(doc: &AuditDocument) -> String {
    let id: String = doc
        .id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if id.is_empty() {
        "audit-report.json".to_string()
    } else {
        format!("audit-{}.json", id)
    }
}
