use serde::{Deserialize, Serialize};

use super::exclusion::Exclusions;
use super::weight::parse_weight;
use crate::audit::{AuditDocument, Choice, Item, Section};

/// Score at or above which a result passes.
pub const PASS_THRESHOLD: f64 = 80.0;
/// Score at or above which a non-passing result is a warning rather than a fail.
pub const WARNING_THRESHOLD: f64 = 60.0;

const PARTIAL_CREDIT: f64 = 0.5;

/// Three-way grade of a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    Pass,
    Warning,
    Fail,
}

impl ScoreStatus {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= PASS_THRESHOLD {
            ScoreStatus::Pass
        } else if percent >= WARNING_THRESHOLD {
            ScoreStatus::Warning
        } else {
            ScoreStatus::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreStatus::Pass => "pass",
            ScoreStatus::Warning => "warning",
            ScoreStatus::Fail => "fail",
        }
    }
}

impl std::fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall pass/fail verdict of an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= PASS_THRESHOLD {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Running earned/max totals for a set of items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub earned: f64,
    pub max: f64,
    /// Items that counted towards `max`
    pub answered: usize,
}

impl Tally {
    pub fn add(&mut self, item: &Item) {
        let earned_fraction = match item.selected_choice {
            Some(Choice::Yes) => 1.0,
            Some(Choice::Partially) => PARTIAL_CREDIT,
            Some(Choice::No) => 0.0,
            // Unanswered and NA items are left out of the denominator
            Some(Choice::NotApplicable) | None => return,
        };
        let weight = parse_weight(item.coeff.as_ref());
        self.earned += weight * earned_fraction;
        self.max += weight;
        self.answered += 1;
    }

    /// `earned / max * 100`, or exactly 0 when nothing was scorable.
    pub fn percent(&self) -> f64 {
        if self.max > 0.0 {
            self.earned / self.max * 100.0
        } else {
            0.0
        }
    }

    pub fn result(&self) -> ScoreResult {
        let percent = self.percent();
        ScoreResult {
            percent,
            status: ScoreStatus::from_percent(percent),
            earned: self.earned,
            max: self.max,
            answered: self.answered,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub percent: f64,
    pub status: ScoreStatus,
    pub earned: f64,
    pub max: f64,
    pub answered: usize,
}

/// Tally every item of the given sections.
pub fn score_sections<'a, I>(sections: I) -> ScoreResult
where
    I: IntoIterator<Item = &'a Section>,
{
    let mut tally = Tally::default();
    for item in sections.into_iter().flat_map(|s| s.items.iter()) {
        tally.add(item);
    }
    tally.result()
}

/// Score across the whole audit, leaving out sections of NA departments.
pub fn overall_score(doc: &AuditDocument, exclusions: &Exclusions) -> ScoreResult {
    score_sections(
        doc.sections
            .iter()
            .filter(|s| !exclusions.excludes(s.department_name.as_deref())),
    )
}

/// Score of the sections tagged with exactly `department`.
///
/// The department's own NA flag is not consulted here.
pub fn department_score(doc: &AuditDocument, department: &str) -> ScoreResult {
    score_sections(
        doc.sections
            .iter()
            .filter(|s| s.department_name.as_deref() == Some(department)),
    )
}

/// Raw score of one section, regardless of its department.
pub fn section_score(section: &Section) -> ScoreResult {
    score_sections(std::iter::once(section))
}
