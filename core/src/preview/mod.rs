//! Preview payload model and validation

pub mod record;
pub mod validate;

pub use record::{BlogIdea, ComparisonTable, FaqEntry, PreviewRecord, UseCase};
pub use validate::{check_record, first_record};
