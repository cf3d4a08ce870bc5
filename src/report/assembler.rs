use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::index::DepartmentIndex;
use crate::audit::{AuditDocument, Section};
use crate::findings::{collect_findings, Finding, FindingsSummary};
use crate::scoring::{
    overall_score, resolve_exclusions, score_sections, section_score, ScoreResult, Verdict,
};

/// Graded audit, ready for rendering or persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub audit_id: String,
    pub store_name: String,
    pub inspector: String,
    pub inspected_at: Option<String>,
    pub audit_status: Option<String>,
    pub overall_score_percent: f64,
    pub overall_status: Verdict,
    pub overall: ScoreResult,
    pub sections: ReportSections,
    pub findings: Vec<Finding>,
    pub findings_summary: FindingsSummary,
}

/// Section breakdown. Serialized as a plain array: department blocks when the
/// audit declares departments, otherwise section blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportSections {
    /// Legacy single-tier audits
    Flat(Vec<SectionBlock>),
    /// One block per declared department, then a trailing legacy block for
    /// sections without a (declared) department
    Grouped(Vec<ReportBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportBlock {
    Department(DepartmentBlock),
    Legacy { sections: Vec<SectionBlock> },
}

impl ReportBlock {
    pub fn sections(&self) -> &[SectionBlock] {
        match self {
            ReportBlock::Department(dept) => dept.sections.as_slice(),
            ReportBlock::Legacy { sections } => sections.as_slice(),
        }
    }
}

impl ReportSections {
    /// Every section block in output order.
    pub fn all_sections(&self) -> Vec<&SectionBlock> {
        match self {
            ReportSections::Grouped(blocks) => blocks.iter().flat_map(|b| b.sections()).collect(),
            ReportSections::Flat(sections) => sections.iter().collect(),
        }
    }

    /// Department blocks in declared order; empty for flat reports.
    pub fn departments(&self) -> Vec<&DepartmentBlock> {
        match self {
            ReportSections::Grouped(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ReportBlock::Department(dept) => Some(dept),
                    ReportBlock::Legacy { .. } => None,
                })
                .collect(),
            ReportSections::Flat(_) => Vec::new(),
        }
    }

    /// Sections in the trailing legacy block of a grouped report.
    pub fn orphans(&self) -> &[SectionBlock] {
        match self {
            ReportSections::Grouped(blocks) => match blocks.last() {
                Some(ReportBlock::Legacy { sections }) => sections.as_slice(),
                _ => &[],
            },
            ReportSections::Flat(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBlock {
    pub name: String,
    pub icon: Option<String>,
    #[serde(rename = "isNA")]
    pub is_na: bool,
    pub passing_grade: f64,
    /// Absent for NA departments
    pub score: Option<ScoreResult>,
    pub sections: Vec<SectionBlock>,
}

impl DepartmentBlock {
    /// Whether the department reached its own passing grade. None when NA.
    pub fn meets_passing_grade(&self) -> Option<bool> {
        self.score.map(|s| s.percent >= self.passing_grade)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBlock {
    pub name: String,
    pub icon: Option<String>,
    pub department: Option<String>,
    pub score: ScoreResult,
    pub item_count: usize,
}

impl SectionBlock {
    fn from_section(section: &Section) -> Self {
        SectionBlock {
            name: section.name.clone(),
            icon: section.icon.clone(),
            department: section.department_name.clone(),
            score: section_score(section),
            item_count: section.items.len(),
        }
    }
}

/// Grade an audit: overall score and verdict, per-department and per-section
/// breakdown, and the findings list.
///
/// Pure: reads nothing but `doc`, so repeated calls give identical reports.
pub fn assemble_report(doc: &AuditDocument) -> AuditReport {
    let exclusions = resolve_exclusions(&doc.departments);
    let overall = overall_score(doc, &exclusions);
    let findings = collect_findings(doc, &exclusions);

    let sections = if doc.departments.is_empty() {
        ReportSections::Flat(doc.sections.iter().map(SectionBlock::from_section).collect())
    } else {
        group_by_department(doc)
    };

    tracing::debug!(
        audit = %doc.id,
        score = overall.percent,
        excluded_departments = exclusions.len(),
        findings = findings.len(),
        "assembled report"
    );

    AuditReport {
        audit_id: doc.id.clone(),
        store_name: doc.store_name.clone(),
        inspector: doc.inspector.clone(),
        inspected_at: doc.inspected_at.clone(),
        audit_status: doc.status.clone(),
        overall_score_percent: overall.percent,
        overall_status: Verdict::from_percent(overall.percent),
        overall,
        findings_summary: FindingsSummary::from_findings(&findings),
        sections,
        findings,
    }
}

fn group_by_department(doc: &AuditDocument) -> ReportSections {
    let index = DepartmentIndex::build(doc);
    let mut seen = HashSet::new();
    let mut blocks = Vec::with_capacity(doc.departments.len() + 1);

    for dept in &doc.departments {
        if !seen.insert(dept.name.as_str()) {
            tracing::warn!(department = %dept.name, "duplicate department name, keeping the first");
            continue;
        }

        let matched = index.sections_for(&dept.name);
        let score = if dept.is_na {
            None
        } else {
            Some(score_sections(matched.iter().copied()))
        };

        blocks.push(ReportBlock::Department(DepartmentBlock {
            name: dept.name.clone(),
            icon: dept.icon.clone(),
            is_na: dept.is_na,
            passing_grade: dept.passing_grade,
            score,
            sections: matched.iter().map(|s| SectionBlock::from_section(s)).collect(),
        }));
    }

    if !index.orphans().is_empty() {
        blocks.push(ReportBlock::Legacy {
            sections: index
                .orphans()
                .iter()
                .map(|s| SectionBlock::from_section(s))
                .collect(),
        });
    }

    ReportSections::Grouped(blocks)
}
