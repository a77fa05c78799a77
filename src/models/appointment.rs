use serde::{Deserialize, Serialize};

use super::{hospital_id_of, Dataset, SheetRecord};
use crate::sheets::normalize::{pick, Row};

pub const APPOINTMENT_ID_PREFIX: &str = "APT-";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_name: String,
    pub doctor: String,
    pub date: String,
    pub hospital_id: String,
}

impl SheetRecord for Appointment {
    const DATASET: Dataset = Dataset::Appointments;

    fn from_row(row: &Row) -> Self {
        Self {
            appointment_id: pick(row, &["appointment_id", "appointmentid", "id"]),
            patient_name: pick(row, &["patient_name", "name"]),
            doctor: pick(row, &["doctor", "doctor_name"]),
            date: pick(row, &["date", "appointment_date"]),
            hospital_id: hospital_id_of(row),
        }
    }

    fn hospital_id(&self) -> &str {
        &self.hospital_id
    }
}

/// Input for booking an appointment.
///
/// `age` and `disease` are not stored on the appointment; they seed the
/// patient record created by the follow-up ensure-exists step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_name: String,
    pub age: Option<String>,
    pub disease: Option<String>,
    pub doctor: String,
    pub date: String,
    pub hospital_id: String,
}

/// `APT-` followed by the epoch-millisecond timestamp.
///
/// Two bookings inside the same millisecond get the same id. Nothing here
/// or in the backing store prevents that.
pub fn appointment_id_at(epoch_millis: i64) -> String {
    format!("{APPOINTMENT_ID_PREFIX}{epoch_millis}")
}
