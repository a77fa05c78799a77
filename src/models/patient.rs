use serde::{Deserialize, Serialize};

use super::{hospital_id_of, Dataset, SheetRecord};
use crate::sheets::normalize::{pick, Row};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: String,
    pub disease: String,
    pub doctor: String,
    pub hospital_id: String,
    pub date: String,
}

impl Patient {
    /// Name key used by the ensure-exists check.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// Trimmed, lower-cased patient name.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl SheetRecord for Patient {
    const DATASET: Dataset = Dataset::Patients;

    fn from_row(row: &Row) -> Self {
        Self {
            patient_id: pick(row, &["patient_id", "patientid", "id"]),
            name: pick(row, &["name", "patient_name"]),
            age: pick(row, &["age"]),
            disease: pick(row, &["disease", "diagnosis"]),
            doctor: pick(row, &["doctor", "doctor_name"]),
            hospital_id: hospital_id_of(row),
            date: pick(row, &["date", "visit_date"]),
        }
    }

    fn hospital_id(&self) -> &str {
        &self.hospital_id
    }
}

/// Input for the `addPatient` write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub age: Option<String>,
    pub disease: Option<String>,
    pub doctor: Option<String>,
    pub hospital_id: String,
}

impl NewPatient {
    pub fn new(name: &str, hospital_id: &str) -> Self {
        Self {
            name: name.to_string(),
            hospital_id: hospital_id.to_string(),
            ..Default::default()
        }
    }
}
