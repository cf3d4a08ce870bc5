use std::io::IsTerminal;

use chrono::{DateTime, NaiveDateTime};
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::audit::Priority;
use crate::findings::Finding;
use crate::report::{AuditReport, DepartmentBlock, ReportBlock, ReportSections, SectionBlock};
use crate::scoring::{ScoreResult, ScoreStatus, Verdict};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a percentage with one decimal, trimming a trailing ".0" ("87.5%", "100%")
pub fn format_score(percent: f64) -> String {
    let formatted = format!("{:.1}", percent);
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{}%", trimmed)
}

/// Render an inspection timestamp as "YYYY-MM-DD HH:MM".
///
/// Accepts RFC 3339 or "YYYY-MM-DD HH:MM:SS"; anything else is shown as given.
pub fn format_inspected_at(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return "unknown date".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

fn color_status(label: &str, status: ScoreStatus, use_colors: bool) -> String {
    if !use_colors {
        return label.to_string();
    }
    match status {
        ScoreStatus::Pass => label.green().to_string(),
        ScoreStatus::Warning => label.yellow().to_string(),
        ScoreStatus::Fail => label.red().to_string(),
    }
}

fn format_result(result: &ScoreResult, use_colors: bool) -> String {
    let label = format!("{:>6}  {}", format_score(result.percent), result.status);
    color_status(&label, result.status, use_colors)
}

fn format_verdict(verdict: Verdict, use_colors: bool) -> String {
    let label = verdict.as_str().to_uppercase();
    match (use_colors, verdict) {
        (false, _) => label,
        (true, Verdict::Pass) => label.green().bold().to_string(),
        (true, Verdict::Fail) => label.red().bold().to_string(),
    }
}

fn format_priority(priority: Priority, use_colors: bool) -> String {
    let label = format!("{:<6}", priority.as_str());
    match (use_colors, priority) {
        (false, _) => label,
        (true, Priority::High) => label.red().to_string(),
        (true, Priority::Medium) => label.yellow().to_string(),
        (true, Priority::Low) => label.dimmed().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn format_section_line(section: &SectionBlock, indent: &str, use_colors: bool) -> String {
    format!(
        "{}{:<32} {}",
        indent,
        section.name,
        format_result(&section.score, use_colors)
    )
}

fn format_department(dept: &DepartmentBlock, use_colors: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(dept.sections.len() + 1);
    let name = if use_colors {
        dept.name.bold().to_string()
    } else {
        dept.name.clone()
    };

    match dept.score {
        Some(ref score) => {
            let target = match dept.meets_passing_grade() {
                Some(true) => format!("(target {})", format_score(dept.passing_grade)),
                _ => format!("(below target {})", format_score(dept.passing_grade)),
            };
            lines.push(format!(
                "  {:<34} {}  {}",
                name,
                format_result(score, use_colors),
                target
            ));
        }
        None => lines.push(format!("  {:<34} {:>6}", name, "N/A")),
    }

    for section in &dept.sections {
        lines.push(format_section_line(section, "    ", use_colors));
    }
    lines
}

/// Format a full report for the terminal: header, overall verdict, score
/// breakdown and findings.
pub fn format_report(report: &AuditReport, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let title = if report.store_name.is_empty() {
        format!("Audit {}", report.audit_id)
    } else {
        format!("{} (audit {})", report.store_name, report.audit_id)
    };
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });
    lines.push(format!(
        "  Inspector: {}  Date: {}",
        if report.inspector.is_empty() {
            "unknown"
        } else {
            report.inspector.as_str()
        },
        format_inspected_at(report.inspected_at.as_deref())
    ));
    lines.push(format!(
        "  Overall: {}  {}",
        format_score(report.overall_score_percent),
        format_verdict(report.overall_status, use_colors)
    ));
    lines.push(String::new());

    match &report.sections {
        ReportSections::Grouped(blocks) => {
            for block in blocks {
                match block {
                    ReportBlock::Department(dept) => {
                        lines.extend(format_department(dept, use_colors));
                    }
                    ReportBlock::Legacy { sections } => {
                        lines.push("  Other sections".to_string());
                        for section in sections {
                            lines.push(format_section_line(section, "    ", use_colors));
                        }
                    }
                }
            }
        }
        ReportSections::Flat(sections) => {
            for section in sections {
                lines.push(format_section_line(section, "  ", use_colors));
            }
        }
    }

    lines.push(String::new());
    let summary = &report.findings_summary;
    lines.push(format!(
        "Findings: {} ({} high, {} medium, {} low)",
        summary.total, summary.high, summary.medium, summary.low
    ));
    if !report.findings.is_empty() {
        lines.push(format_findings_table(&report.findings, use_colors));
    }

    lines.join("\n")
}

/// Format findings as a table: index, priority, reference, answer, finding.
/// Corrective action, when present, follows on its own line.
pub fn format_findings_table(findings: &[Finding], use_colors: bool) -> String {
    if findings.is_empty() {
        return "No findings.".to_string();
    }

    let term_width = get_terminal_width();
    // index(4) + priority(6) + ref(8) + answer(9) + separators
    let fixed_width = 4 + 1 + 6 + 2 + 8 + 2 + 9 + 2;

    findings
        .iter()
        .enumerate()
        .map(|(idx, f)| {
            let index_str = format!("{:>3}.", idx + 1);
            let text = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_text(&f.finding, width - fixed_width),
                Some(_) => truncate_text(&f.finding, 20),
                None => f.finding.clone(),
            };
            let mut line = format!(
                "{} {}  {:<8}  {:<9}  {}",
                if use_colors {
                    index_str.dimmed().to_string()
                } else {
                    index_str
                },
                format_priority(f.priority, use_colors),
                f.reference,
                f.selected_choice.as_str(),
                text
            );
            if let Some(ref cr) = f.corrective_action {
                line.push_str(&format!("\n{:>w$}-> {}", "", cr, w = fixed_width));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format findings as tab-separated values for scripting
/// Columns: priority, department, section, ref, answer, finding, corrective action
pub fn format_findings_tsv(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(|f| {
            let finding = tsv_field(&f.finding);
            let corrective_action = tsv_field(f.corrective_action.as_deref().unwrap_or(""));
            [
                f.priority.as_str(),
                f.department.as_deref().unwrap_or(""),
                f.section.as_str(),
                f.reference.as_str(),
                f.selected_choice.as_str(),
                finding.as_str(),
                corrective_action.as_str(),
            ]
            .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format section scores as tab-separated values
/// Columns: department, section, score, status (no headers, no colors)
pub fn format_report_tsv(report: &AuditReport) -> String {
    report
        .sections
        .all_sections()
        .iter()
        .map(|s| {
            format!(
                "{}\t{}\t{:.1}\t{}",
                s.department.as_deref().unwrap_or(""),
                s.name,
                s.score.percent,
                s.score.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tsv_field(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditDocument, Choice, Department, Item, Section};
    use crate::report::assemble_report;

    fn sample_report() -> AuditReport {
        let doc = AuditDocument {
            id: "A-9".to_string(),
            store_name: "Harbor".to_string(),
            inspector: "R. Lee".to_string(),
            inspected_at: Some("2024-03-05 09:30:00".to_string()),
            departments: vec![
                Department {
                    name: "Kitchen".to_string(),
                    icon: None,
                    is_na: false,
                    passing_grade: 80.0,
                },
                Department {
                    name: "Maintenance".to_string(),
                    icon: None,
                    is_na: true,
                    passing_grade: 80.0,
                },
            ],
            sections: vec![Section {
                name: "Hygiene".to_string(),
                icon: None,
                department_name: Some("Kitchen".to_string()),
                items: vec![
                    Item {
                        reference: "K1".to_string(),
                        selected_choice: Some(Choice::Yes),
                        ..Default::default()
                    },
                    Item {
                        reference: "K2".to_string(),
                        selected_choice: Some(Choice::No),
                        finding: Some("Sink\tblocked".to_string()),
                        cr: Some("Call plumber".to_string()),
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        };
        assemble_report(&doc)
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(100.0), "100%");
        assert_eq!(format_score(87.5), "87.5%");
        assert_eq!(format_score(0.0), "0%");
        assert_eq!(format_score(200.0 / 3.0), "66.7%");
    }

    #[test]
    fn test_format_inspected_at() {
        assert_eq!(format_inspected_at(Some("2024-03-05 09:30:00")), "2024-03-05 09:30");
        assert_eq!(format_inspected_at(Some("2024-03-05T09:30:00+02:00")), "2024-03-05 09:30");
        assert_eq!(format_inspected_at(Some("last Tuesday")), "last Tuesday");
        assert_eq!(format_inspected_at(None), "unknown date");
        assert_eq!(format_inspected_at(Some("")), "unknown date");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a very long finding", 10), "a very ...");
        assert_eq!(truncate_text("abcdef", 3), "abc");
    }

    #[test]
    fn test_format_report_plain() {
        let output = format_report(&sample_report(), false);
        assert!(output.contains("Harbor (audit A-9)"));
        assert!(output.contains("Inspector: R. Lee"));
        assert!(output.contains("Overall: 50%  FAIL"));
        assert!(output.contains("Maintenance"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Findings: 1 (0 high, 1 medium, 0 low)"));
        assert!(output.contains("-> Call plumber"));
    }

    #[test]
    fn test_format_findings_empty() {
        assert_eq!(format_findings_table(&[], false), "No findings.");
        assert_eq!(format_findings_tsv(&[]), "");
    }

    #[test]
    fn test_format_findings_tsv() {
        let report = sample_report();
        let tsv = format_findings_tsv(&report.findings);
        assert_eq!(tsv, "Medium\tKitchen\tHygiene\tK2\tNo\tSink blocked\tCall plumber");
    }

    #[test]
    fn test_format_report_tsv() {
        let tsv = format_report_tsv(&sample_report());
        assert_eq!(tsv, "Kitchen\tHygiene\t50.0\tfail");
    }
}
