use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::AuditDocument;

/// Load an audit document from disk.
///
/// `.yaml` / `.yml` files are parsed as YAML, everything else as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_audit(path: &Path) -> Result<AuditDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read audit file at {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let doc: AuditDocument = if is_yaml {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse audit: invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse audit: invalid JSON in {}", path.display()))?
    };

    tracing::debug!(
        path = %path.display(),
        departments = doc.departments.len(),
        sections = doc.sections.len(),
        "loaded audit document"
    );

    Ok(doc)
}

/// Expand command-line inputs into audit file paths.
///
/// Inputs containing glob metacharacters (`*`, `?`, `[`) are expanded and
/// sorted; plain paths are passed through untouched, even if missing, so the
/// loader can report them. Duplicates are dropped, first occurrence wins.
///
/// # Errors
///
/// Returns an error if a pattern is malformed or matches nothing.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for input in inputs {
        if !input.contains(['*', '?', '[']) {
            let path = PathBuf::from(input);
            if !paths.contains(&path) {
                paths.push(path);
            }
            continue;
        }

        let mut matched: Vec<PathBuf> = glob::glob(input)
            .with_context(|| format!("Invalid glob pattern '{}'", input))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable path");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();

        if matched.is_empty() {
            anyhow::bail!("No audit files match '{}'", input);
        }

        matched.sort();
        for path in matched {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    Ok(paths)
}
