//! Typed records for the seven spreadsheet datasets.
//!
//! Every field is a string and defaults to `""`. Each record knows its
//! dataset and how to lift itself out of a normalized row.

pub mod appointment;
pub mod bed;
pub mod blood_bank;
pub mod dataset;
pub mod doctor;
pub mod equipment;
pub mod hospital;
pub mod patient;

pub use appointment::*;
pub use bed::*;
pub use blood_bank::*;
pub use dataset::*;
pub use doctor::*;
pub use equipment::*;
pub use hospital::*;
pub use patient::*;

use crate::sheets::normalize::{pick, Row};

/// Aliases accepted for the tenant key, in priority order.
pub const HOSPITAL_ID_ALIASES: &[&str] = &["hospital_id", "hospitalid", "hospital"];

pub(crate) fn hospital_id_of(row: &Row) -> String {
    pick(row, HOSPITAL_ID_ALIASES)
}

/// A record that can be read from one dataset.
pub trait SheetRecord: Sized {
    const DATASET: Dataset;

    fn from_row(row: &Row) -> Self;

    /// Tenant key of this record.
    fn hospital_id(&self) -> &str;

    /// Whether a parsed row is kept. Rows are kept by default.
    fn is_complete(&self) -> bool {
        true
    }
}
