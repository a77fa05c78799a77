use serde::{Deserialize, Serialize};

use super::{hospital_id_of, Dataset, SheetRecord};
use crate::sheets::normalize::{pick, Row};

/// `status` is free text. Availability is derived, see
/// [`is_available_bed`](crate::dashboard::is_available_bed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bed {
    pub bed_id: String,
    #[serde(rename = "type")]
    pub bed_type: String,
    pub status: String,
    pub hospital_id: String,
}

impl SheetRecord for Bed {
    const DATASET: Dataset = Dataset::Beds;

    fn from_row(row: &Row) -> Self {
        Self {
            bed_id: pick(row, &["bed_id", "bedid", "id"]),
            bed_type: pick(row, &["type", "bed_type"]),
            status: pick(row, &["status"]),
            hospital_id: hospital_id_of(row),
        }
    }

    fn hospital_id(&self) -> &str {
        &self.hospital_id
    }
}
