use std::collections::{HashMap, HashSet};

use crate::audit::{AuditDocument, Section};

/// Sections grouped by the department they are tagged with, built once per report.
///
/// A section lands under a department only when its `departmentName` matches a
/// declared department exactly. Untagged sections and sections pointing at an
/// undeclared department go to `orphans`, in document order, so every section
/// is reachable exactly once.
#[derive(Debug, Default)]
pub struct DepartmentIndex<'a> {
    by_name: HashMap<&'a str, Vec<&'a Section>>,
    orphans: Vec<&'a Section>,
}

impl<'a> DepartmentIndex<'a> {
    pub fn build(doc: &'a AuditDocument) -> Self {
        let declared: HashSet<&str> = doc.departments.iter().map(|d| d.name.as_str()).collect();
        let mut index = DepartmentIndex::default();

        for section in &doc.sections {
            match section.department_name.as_deref() {
                Some(name) if declared.contains(name) => {
                    index.by_name.entry(name).or_default().push(section);
                }
                Some(name) => {
                    tracing::warn!(
                        section = %section.name,
                        department = name,
                        "section references an undeclared department, listing it with ungrouped sections"
                    );
                    index.orphans.push(section);
                }
                None => index.orphans.push(section),
            }
        }

        index
    }

    /// Sections of `department`, in document order. Empty if none.
    pub fn sections_for(&self, department: &str) -> &[&'a Section] {
        self.by_name
            .get(department)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn orphans(&self) -> &[&'a Section] {
        &self.orphans
    }
}
