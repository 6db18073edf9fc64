//! Transformation module.
//!
//! - Row: one export record into one `BookRecord`
//! - Pipeline: read, transform and insert a whole export in one transaction

pub mod pipeline;
pub mod row;

pub use pipeline::*;
pub use row::{parse_available_since, transform_record, TransformedRow};
