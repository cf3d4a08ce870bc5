pub mod collector;

pub use collector::{collect_findings, Finding, FindingsSummary};
