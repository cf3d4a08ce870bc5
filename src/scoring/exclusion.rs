use std::collections::HashSet;

use crate::audit::Department;

/// Names of departments marked not applicable for one audit.
///
/// Derived once per report and shared by scoring and findings extraction so
/// both apply exactly the same exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions<'a> {
    names: HashSet<&'a str>,
}

impl<'a> Exclusions<'a> {
    /// Whether a section tagged with `department` is excluded.
    /// Untagged sections are never excluded.
    pub fn excludes(&self, department: Option<&str>) -> bool {
        department.is_some_and(|name| self.names.contains(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Collect the names of every department flagged `isNA`.
///
/// When a name is declared more than once, only its first declaration counts.
pub fn resolve_exclusions(departments: &[Department]) -> Exclusions<'_> {
    let mut seen = HashSet::new();
    let names = departments
        .iter()
        .filter(|d| seen.insert(d.name.as_str()))
        .filter(|d| d.is_na)
        .map(|d| d.name.as_str())
        .collect();
    Exclusions { names }
}
