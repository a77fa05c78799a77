use serde::{Deserialize, Serialize};

use super::{hospital_id_of, Dataset, SheetRecord};
use crate::sheets::normalize::{pick, Row};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub doctor_id: String,
    pub name: String,
    pub specialization: String,
    pub available_days: String,
    pub hospital_id: String,
}

impl SheetRecord for Doctor {
    const DATASET: Dataset = Dataset::Doctors;

    fn from_row(row: &Row) -> Self {
        Self {
            doctor_id: pick(row, &["doctor_id", "doctorid", "id"]),
            name: pick(row, &["name", "doctor_name"]),
            specialization: pick(row, &["specialization", "speciality", "department"]),
            available_days: pick(row, &["available_days", "availabledays", "schedule"]),
            hospital_id: hospital_id_of(row),
        }
    }

    fn hospital_id(&self) -> &str {
        &self.hospital_id
    }
}
