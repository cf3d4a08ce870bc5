use std::path::Path;

use audit_grade::audit::{load_audit, AuditDocument, Choice, Department, Item, Section};
use audit_grade::findings::collect_findings;
use audit_grade::report::{assemble_report, ReportBlock, ReportSections};
use audit_grade::scoring::{
    department_score, overall_score, resolve_exclusions, section_score, ScoreStatus, Verdict,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn fixture() -> AuditDocument {
    load_audit(Path::new("tests/fixtures/store_audit.json")).unwrap()
}

#[test]
fn test_fixture_overall_score() {
    let doc = fixture();
    let exclusions = resolve_exclusions(&doc.departments);
    let overall = overall_score(&doc, &exclusions);

    // Food Safety: 3 + 1 + 0 of 3 + 2 + 1 (NA item and bad coeff weigh 0 / 1)
    // Checkout: 1 + 0 + 1 of 3; General Impressions: 1 of 2
    assert_eq!(overall.earned, 7.0);
    assert_eq!(overall.max, 11.0);
    assert!((overall.percent - 7.0 / 11.0 * 100.0).abs() < 1e-9);
    assert_eq!(overall.status, ScoreStatus::Warning);
}

#[test]
fn test_fixture_report() {
    let report = assemble_report(&fixture());
    assert_eq!(report.audit_id, "2024-0117");
    assert_eq!(report.overall_status, Verdict::Fail);

    let ReportSections::Grouped(blocks) = &report.sections else {
        panic!("expected grouped layout");
    };
    assert!(matches!(blocks.last(), Some(ReportBlock::Legacy { .. })));
    let departments = report.sections.departments();
    let orphans = report.sections.orphans();

    let names: Vec<&str> = departments.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Kitchen", "Maintenance", "Front of House"]);

    let kitchen = &departments[0];
    assert_eq!(kitchen.passing_grade, 85.0);
    assert!((kitchen.score.unwrap().percent - 4.0 / 6.0 * 100.0).abs() < 1e-9);

    assert!(departments[1].is_na);
    assert_eq!(departments[1].score, None);
    assert_eq!(departments[1].sections[0].name, "Boiler Room");

    assert_eq!(departments[2].passing_grade, 80.0);
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].name, "General Impressions");
    assert_eq!(orphans[0].score.percent, 50.0);
}

#[test]
fn test_fixture_findings() {
    let report = assemble_report(&fixture());
    let refs: Vec<&str> = report.findings.iter().map(|f| f.reference.as_str()).collect();
    // K4 is NA, M1 is in an NA department, F2 has no text, F3 is a Yes
    assert_eq!(refs, vec!["K2", "K3", "G1"]);
    assert_eq!(report.findings_summary.high, 1);
    assert_eq!(report.findings_summary.medium, 1);
    assert_eq!(report.findings_summary.low, 1);
    assert_eq!(
        report.findings[0].corrective_action.as_deref(),
        Some("Move raw meat to bottom shelf")
    );
}

#[test]
fn test_malformed_fields_fall_back() {
    let json = r#"{
        "id": "2024-0200",
        "departments": [{ "name": "Kitchen", "isNA": null, "passingGrade": null }],
        "sections": [
            { "name": "Hygiene", "departmentName": "Kitchen", "items": [
                { "ref": "H1", "selectedChoice": "Yes", "coeff": true },
                { "ref": "H2", "selectedChoice": "No", "coeff": "0", "finding": "Bin lid missing" }
            ] },
            { "name": "Empty", "items": null }
        ]
    }"#;
    let doc: AuditDocument = serde_json::from_str(json).unwrap();
    let report = assemble_report(&doc);

    let departments = report.sections.departments();
    assert!(!departments[0].is_na);
    assert_eq!(departments[0].passing_grade, 80.0);
    // H1 weighs the default 1, H2 weighs 0
    assert_eq!(report.overall.max, 1.0);
    assert_eq!(report.overall_score_percent, 100.0);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.sections.orphans()[0].item_count, 0);
}

#[test]
fn test_na_department_still_scorable_directly() {
    let doc = fixture();
    assert_eq!(department_score(&doc, "Maintenance").percent, 0.0);
    assert_eq!(department_score(&doc, "Maintenance").max, 4.0);
    assert_eq!(section_score(&doc.sections[1]).answered, 1);
}

#[test]
fn test_fixture_report_is_idempotent() {
    let doc = fixture();
    assert_eq!(assemble_report(&doc), assemble_report(&doc));
}

fn choice_strategy() -> impl Strategy<Value = Option<Choice>> {
    prop_oneof![
        Just(None),
        Just(Some(Choice::Yes)),
        Just(Some(Choice::Partially)),
        Just(Some(Choice::No)),
        Just(Some(Choice::NotApplicable)),
    ]
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (choice_strategy(), prop::option::of("[a-z ]{0,6}")).prop_map(|(choice, finding)| Item {
        selected_choice: choice,
        finding,
        ..Default::default()
    })
}

const DEPARTMENT_NAMES: [&str; 3] = ["Kitchen", "Bakery", "Maintenance"];

fn document_strategy() -> impl Strategy<Value = AuditDocument> {
    let departments = prop::collection::vec(any::<bool>(), 0..=3).prop_map(|flags| {
        flags
            .into_iter()
            .enumerate()
            .map(|(i, is_na)| Department {
                name: DEPARTMENT_NAMES[i].to_string(),
                icon: None,
                is_na,
                passing_grade: 80.0,
            })
            .collect::<Vec<_>>()
    });
    let sections = prop::collection::vec(
        (
            prop::option::of(prop::sample::select(vec!["Kitchen", "Bakery", "Maintenance", "Ghost"])),
            prop::collection::vec(item_strategy(), 0..6),
        ),
        0..8,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (dept, items))| Section {
                name: format!("Section {}", i),
                icon: None,
                department_name: dept.map(str::to_string),
                items,
            })
            .collect::<Vec<_>>()
    });

    (departments, sections).prop_map(|(departments, sections)| AuditDocument {
        departments,
        sections,
        ..Default::default()
    })
}

proptest! {
    #[test]
    fn prop_every_section_listed_once(doc in document_strategy()) {
        let report = assemble_report(&doc);
        let mut listed: Vec<String> = report
            .sections
            .all_sections()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        let mut expected: Vec<String> = doc.sections.iter().map(|s| s.name.clone()).collect();
        listed.sort();
        expected.sort();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn prop_findings_respect_answer_and_exclusions(doc in document_strategy()) {
        let exclusions = resolve_exclusions(&doc.departments);
        for finding in collect_findings(&doc, &exclusions) {
            prop_assert!(matches!(finding.selected_choice, Choice::No | Choice::Partially));
            prop_assert!(!finding.finding.is_empty());
            prop_assert!(!exclusions.excludes(finding.department.as_deref()));
        }
    }

    #[test]
    fn prop_scores_never_nan(doc in document_strategy()) {
        let report = assemble_report(&doc);
        prop_assert!(!report.overall_score_percent.is_nan());
        for section in report.sections.all_sections() {
            prop_assert!(!section.score.percent.is_nan());
        }
    }

    #[test]
    fn prop_assembly_is_deterministic(doc in document_strategy()) {
        let first = serde_json::to_string(&assemble_report(&doc)).unwrap();
        let second = serde_json::to_string(&assemble_report(&doc)).unwrap();
        prop_assert_eq!(first, second);
    }
}
