pub mod check;
pub mod load;
pub mod types;

pub use check::check_document;
pub use load::{expand_inputs, load_audit};
pub use types::{AuditDocument, Choice, Coefficient, Department, Item, Priority, Section};
