pub mod formatter;

pub use formatter::{
    format_findings_table, format_findings_tsv, format_inspected_at, format_report,
    format_report_tsv, format_score, should_use_colors,
};
