use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const DEFAULT_PASSING_GRADE: f64 = 80.0;

fn default_passing_grade() -> f64 {
    DEFAULT_PASSING_GRADE
}

/// A completed inspection as supplied by the data store.
///
/// The engine only ever borrows this; nothing in the crate mutates it.
/// Missing, null or wrongly typed fields fall back to their defaults instead
/// of rejecting the document.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub store_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub inspector: String,
    /// Inspection timestamp, kept as supplied; see `output::format_inspected_at`
    #[serde(default, deserialize_with = "lenient_text")]
    pub inspected_at: Option<String>,
    /// Workflow status recorded by the data store (e.g. "completed")
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub departments: Vec<Department>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub icon: Option<String>,
    #[serde(default, rename = "isNA", deserialize_with = "lenient_flag")]
    pub is_na: bool,
    #[serde(default = "default_passing_grade", deserialize_with = "lenient_passing_grade")]
    pub passing_grade: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub icon: Option<String>,
    /// Absent for legacy single-tier audits ("orphan" sections)
    #[serde(default, deserialize_with = "lenient_text")]
    pub department_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, rename = "ref", deserialize_with = "lenient_string")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_choice")]
    pub selected_choice: Option<Choice>,
    #[serde(default)]
    pub coeff: Option<Coefficient>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub finding: Option<String>,
    /// Corrective action text
    #[serde(default, deserialize_with = "lenient_text")]
    pub cr: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
}

impl Item {
    /// Finding text, or None when absent or empty.
    ///
    /// Whitespace counts as text: only a literally empty string is dropped.
    pub fn finding_text(&self) -> Option<&str> {
        self.finding.as_deref().filter(|f| !f.is_empty())
    }
}

/// Answer recorded against a checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Choice {
    Yes,
    Partially,
    No,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Choice {
    /// Parse the stored answer. Matching is exact; anything else is unset.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(Choice::Yes),
            "Partially" => Some(Choice::Partially),
            "No" => Some(Choice::No),
            "NA" => Some(Choice::NotApplicable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Yes => "Yes",
            Choice::Partially => "Partially",
            Choice::No => "No",
            Choice::NotApplicable => "NA",
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "High" => Some(Priority::High),
            "Medium" => Some(Priority::Medium),
            "Low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Item weight exactly as stored. Interpreted by `scoring::parse_weight`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Coefficient {
    Number(f64),
    Text(String),
    /// Anything else (booleans, lists, objects); always weighs the default
    Other(Value),
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Option::<Value>::deserialize(deserializer)?, Some(Value::Bool(true))))
}

fn lenient_passing_grade<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let grade = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(grade.filter(|g| g.is_finite()).unwrap_or(DEFAULT_PASSING_GRADE))
}

// Answers and priorities match exactly; anything else reads as unset.
fn lenient_choice<'de, D>(deserializer: D) -> Result<Option<Choice>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.as_deref().and_then(Choice::parse))
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.as_deref().and_then(Priority::parse))
}
