pub mod engine;
pub mod exclusion;
pub mod weight;

pub use engine::{
    department_score, overall_score, score_sections, section_score, ScoreResult, ScoreStatus,
    Tally, Verdict, PASS_THRESHOLD, WARNING_THRESHOLD,
};
pub use exclusion::{resolve_exclusions, Exclusions};
pub use weight::{parse_weight, DEFAULT_WEIGHT};
