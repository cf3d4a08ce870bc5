pub mod audit;
pub mod config;
pub mod findings;
pub mod logging;
pub mod output;
pub mod report;
pub mod scoring;

pub use audit::{load_audit, AuditDocument};
pub use report::{assemble_report, save_report, AuditReport, GenerationResult};
