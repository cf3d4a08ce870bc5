use serde::{Deserialize, Serialize};

use crate::audit::{AuditDocument, Choice, Priority};
use crate::scoring::Exclusions;

/// An answered item that needs corrective action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub section: String,
    pub department: Option<String>,
    #[serde(rename = "ref")]
    pub reference: String,
    pub title: String,
    pub selected_choice: Choice,
    pub finding: String,
    pub corrective_action: Option<String>,
    pub priority: Priority,
}

/// Finding counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = FindingsSummary::default();
        for f in findings {
            summary.total += 1;
            match f.priority {
                Priority::High => summary.high += 1,
                Priority::Medium => summary.medium += 1,
                Priority::Low => summary.low += 1,
            }
        }
        summary
    }
}

/// Walk sections and items in document order and keep every `No` or
/// `Partially` answer that carries finding text.
///
/// Sections of excluded (NA) departments are skipped entirely.
pub fn collect_findings(doc: &AuditDocument, exclusions: &Exclusions) -> Vec<Finding> {
    let mut findings = Vec::new();

    for section in &doc.sections {
        if exclusions.excludes(section.department_name.as_deref()) {
            continue;
        }

        for item in &section.items {
            // The answer gates inclusion; Yes and NA never produce findings
            let choice = match item.selected_choice {
                Some(c @ (Choice::No | Choice::Partially)) => c,
                _ => continue,
            };
            let Some(text) = item.finding_text() else {
                continue;
            };

            findings.push(Finding {
                section: section.name.clone(),
                department: section.department_name.clone(),
                reference: item.reference.clone(),
                title: item.title.clone(),
                selected_choice: choice,
                finding: text.to_string(),
                corrective_action: item.cr.clone().filter(|cr| !cr.is_empty()),
                priority: item.priority.unwrap_or_default(),
            });
        }
    }

    tracing::debug!(count = findings.len(), "collected findings");
    findings
}
