use serde::{Deserialize, Serialize};

use super::{hospital_id_of, Dataset, SheetRecord};
use crate::sheets::normalize::{pick, Row};

/// Stock for one blood group at one hospital. `units` is a numeric string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodBankEntry {
    pub blood_group: String,
    pub units: String,
    pub hospital_id: String,
}

impl BloodBankEntry {
    /// Parsed unit count. `None` when the cell is blank or not a number.
    pub fn unit_count(&self) -> Option<f64> {
        self.units.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

impl SheetRecord for BloodBankEntry {
    const DATASET: Dataset = Dataset::BloodBank;

    fn from_row(row: &Row) -> Self {
        Self {
            blood_group: pick(row, &["blood_group", "bloodgroup", "group"]),
            units: pick(row, &["units", "unit"]),
            hospital_id: hospital_id_of(row),
        }
    }

    fn hospital_id(&self) -> &str {
        &self.hospital_id
    }
}
