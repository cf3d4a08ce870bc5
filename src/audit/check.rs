use std::collections::HashSet;

use super::types::{AuditDocument, Coefficient};

/// Collect data-quality diagnostics for an audit document.
/// Returns all of them at once (not just the first).
///
/// None of these change how the document is graded; they point at input the
/// engine silently falls back on.
pub fn check_document(doc: &AuditDocument) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (i, dept) in doc.departments.iter().enumerate() {
        if !seen.insert(dept.name.as_str()) {
            errors.push(format!(
                "departments[{}]: duplicate department name '{}'",
                i, dept.name
            ));
        }
        if !(0.0..=100.0).contains(&dept.passing_grade) {
            errors.push(format!(
                "departments[{}].passingGrade: {} is outside 0-100",
                i, dept.passing_grade
            ));
        }
    }

    for (i, section) in doc.sections.iter().enumerate() {
        if let Some(ref dept) = section.department_name {
            if !seen.contains(dept.as_str()) {
                errors.push(format!(
                    "sections[{}].departmentName: '{}' is not a declared department",
                    i, dept
                ));
            }
        }

        for (j, item) in section.items.iter().enumerate() {
            if let Some(reason) = item.coeff.as_ref().and_then(coefficient_problem) {
                errors.push(format!(
                    "sections[{}].items[{}].coeff: {} (weight 1 used)",
                    i, j, reason
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn coefficient_problem(coeff: &Coefficient) -> Option<String> {
    let value = match coeff {
        Coefficient::Number(n) => *n,
        Coefficient::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) => return Some(format!("'{}' is not a number", s)),
        },
        Coefficient::Other(raw) => return Some(format!("{} is not a number", raw)),
    };
    if !value.is_finite() || value < 0.0 {
        Some(format!("{} is not a usable weight", value))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{Department, Item, Section};

    fn department(name: &str) -> Department {
        Department {
            name: name.to_string(),
            icon: None,
            is_na: false,
            passing_grade: 80.0,
        }
    }

    fn section(name: &str, dept: Option<&str>, items: Vec<Item>) -> Section {
        Section {
            name: name.to_string(),
            icon: None,
            department_name: dept.map(str::to_string),
            items,
        }
    }

    #[test]
    fn test_clean_document() {
        let doc = AuditDocument {
            departments: vec![department("Kitchen")],
            sections: vec![section(
                "Hygiene",
                Some("Kitchen"),
                vec![Item {
                    coeff: Some(Coefficient::Text("2".to_string())),
                    ..Default::default()
                }],
            )],
            ..Default::default()
        };
        assert!(check_document(&doc).is_ok());
    }

    #[test]
    fn test_orphan_sections_are_fine() {
        let doc = AuditDocument {
            sections: vec![section("Legacy", None, vec![])],
            ..Default::default()
        };
        assert!(check_document(&doc).is_ok());
    }

    #[test]
    fn test_undeclared_department() {
        let doc = AuditDocument {
            departments: vec![department("Kitchen")],
            sections: vec![section("Dock", Some("Receiving"), vec![])],
            ..Default::default()
        };
        let errors = check_document(&doc).unwrap_err();
        assert!(errors[0].contains("sections[0].departmentName"));
    }

    #[test]
    fn test_bad_coefficients() {
        let doc = AuditDocument {
            sections: vec![section(
                "Front",
                None,
                vec![
                    Item {
                        coeff: Some(Coefficient::Text("heavy".to_string())),
                        ..Default::default()
                    },
                    Item {
                        coeff: Some(Coefficient::Number(-1.0)),
                        ..Default::default()
                    },
                    Item {
                        coeff: Some(Coefficient::Other(serde_json::Value::Bool(true))),
                        ..Default::default()
                    },
                ],
            )],
            ..Default::default()
        };
        let errors = check_document(&doc).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("items[0].coeff"));
        assert!(errors[1].contains("items[1].coeff"));
        assert!(errors[2].contains("true is not a number"));
    }

    #[test]
    fn test_zero_coefficient_is_fine() {
        let doc = AuditDocument {
            sections: vec![section(
                "Front",
                None,
                vec![Item {
                    coeff: Some(Coefficient::Text("0".to_string())),
                    ..Default::default()
                }],
            )],
            ..Default::default()
        };
        assert!(check_document(&doc).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad_grade = department("Kitchen");
        bad_grade.passing_grade = 120.0;
        let doc = AuditDocument {
            departments: vec![bad_grade, department("Kitchen")],
            sections: vec![section("Dock", Some("Receiving"), vec![])],
            ..Default::default()
        };
        let errors = check_document(&doc).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
