use serde::{Deserialize, Serialize};

use super::{hospital_id_of, Dataset, SheetRecord};
use crate::sheets::normalize::{pick, Row};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub equipment_name: String,
    pub quantity: String,
    pub status: String,
    pub hospital_id: String,
}

impl SheetRecord for Equipment {
    const DATASET: Dataset = Dataset::Equipment;

    fn from_row(row: &Row) -> Self {
        Self {
            equipment_name: pick(row, &["equipment_name", "equipment", "name"]),
            quantity: pick(row, &["quantity", "qty"]),
            status: pick(row, &["status"]),
            hospital_id: hospital_id_of(row),
        }
    }

    fn hospital_id(&self) -> &str {
        &self.hospital_id
    }
}
