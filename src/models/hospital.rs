use serde::{Deserialize, Serialize};

use super::{hospital_id_of, Dataset, SheetRecord};
use crate::sheets::normalize::{pick, Row};

/// Tenant root. Other datasets reference it through `hospital_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub hospital_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl SheetRecord for Hospital {
    const DATASET: Dataset = Dataset::Hospitals;

    fn from_row(row: &Row) -> Self {
        Self {
            hospital_id: hospital_id_of(row),
            name: pick(row, &["name", "hospital_name", "hospital"]),
            phone: pick(row, &["phone", "contact", "contact_number"]),
            address: pick(row, &["address", "location"]),
        }
    }

    fn hospital_id(&self) -> &str {
        &self.hospital_id
    }

    /// A hospital row without an id or a name is a spreadsheet artifact.
    fn is_complete(&self) -> bool {
        !self.hospital_id.is_empty() && !self.name.is_empty()
    }
}
