pub mod assembler;
pub mod index;
pub mod storage;

pub use assembler::{
    assemble_report, AuditReport, DepartmentBlock, ReportBlock, ReportSections, SectionBlock,
};
pub use index::DepartmentIndex;
pub use storage::{default_report_file_name, save_report, GenerationResult};
