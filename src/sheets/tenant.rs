//! Tenant-bound view of the adapter for hospital staff pages.
//!
//! A scope cannot exist without a hospital id, so every call made through
//! it is filtered by, and writes are stamped with, that id.

use super::adapter::{AddPatientPayload, BookingOutcome, SheetAdapter, WriteReceipt};
use super::http::HttpClient;
use crate::error::SheetError;
use crate::models::{
    Appointment, Bed, BloodBankEntry, Doctor, Equipment, NewAppointment, NewPatient, Patient,
};

pub struct TenantScope<'a, H: HttpClient> {
    adapter: &'a SheetAdapter<H>,
    hospital_id: String,
}

impl<H: HttpClient> SheetAdapter<H> {
    /// Bind to a hospital. Fails before any I/O when the id is missing or blank.
    pub fn for_tenant(&self, hospital_id: Option<&str>) -> Result<TenantScope<'_, H>, SheetError> {
        let hospital_id = hospital_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(SheetError::MissingHospitalId)?;
        Ok(TenantScope {
            adapter: self,
            hospital_id: hospital_id.to_string(),
        })
    }
}

impl<'a, H: HttpClient> TenantScope<'a, H> {
    pub fn hospital_id(&self) -> &str {
        &self.hospital_id
    }

    pub async fn patients(&self) -> Result<Vec<Patient>, SheetError> {
        self.adapter.get_patients(Some(&self.hospital_id)).await
    }

    pub async fn doctors(&self) -> Result<Vec<Doctor>, SheetError> {
        self.adapter.get_doctors(Some(&self.hospital_id)).await
    }

    pub async fn appointments(&self) -> Result<Vec<Appointment>, SheetError> {
        self.adapter.get_appointments(Some(&self.hospital_id)).await
    }

    pub async fn beds(&self) -> Result<Vec<Bed>, SheetError> {
        self.adapter.get_beds(Some(&self.hospital_id)).await
    }

    pub async fn blood_bank(&self) -> Result<Vec<BloodBankEntry>, SheetError> {
        self.adapter.get_blood_bank(Some(&self.hospital_id)).await
    }

    pub async fn equipment(&self) -> Result<Vec<Equipment>, SheetError> {
        self.adapter.get_equipment(Some(&self.hospital_id)).await
    }

    /// Add a patient to this hospital. Any hospital id on `input` is replaced.
    pub async fn add_patient(
        &self,
        input: NewPatient,
    ) -> Result<WriteReceipt<AddPatientPayload>, SheetError> {
        let input = NewPatient {
            hospital_id: self.hospital_id.clone(),
            ..input
        };
        self.adapter.add_patient(&input).await
    }

    /// Book at this hospital. Any hospital id on `input` is replaced.
    pub async fn create_appointment(&self, input: NewAppointment) -> Result<BookingOutcome, SheetError> {
        let input = NewAppointment {
            hospital_id: self.hospital_id.clone(),
            ..input
        };
        self.adapter.create_appointment(&input).await
    }
}
