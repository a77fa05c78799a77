//! Figures the portals derive from raw rows: bed availability, blood stock,
//! and a per-hospital overview loaded in one go.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::SheetError;
use crate::models::{Appointment, Bed, BloodBankEntry, Doctor, Equipment};
use crate::sheets::{HttpClient, SheetAdapter};

static AVAILABLE_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)avail|free|vacant|open").unwrap());
static ICU: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)icu").unwrap());
static OXYGEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)oxygen").unwrap());
static GENERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)general").unwrap());

const UNTYPED_BED: &str = "General";

/// Bed status is free text; anything mentioning avail/free/vacant/open counts.
pub fn is_available_bed(status: &str) -> bool {
    AVAILABLE_STATUS.is_match(status)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BedCount {
    pub available: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedTypeSummary {
    pub bed_type: String,
    pub available: usize,
    pub total: usize,
}

/// Available/total per bed type, ordered by type.
pub fn bed_summary(beds: &[Bed]) -> Vec<BedTypeSummary> {
    let mut by_type: BTreeMap<&str, BedCount> = BTreeMap::new();
    for bed in beds {
        let bed_type = if bed.bed_type.is_empty() {
            UNTYPED_BED
        } else {
            bed.bed_type.as_str()
        };
        let count = by_type.entry(bed_type).or_default();
        count.total += 1;
        if is_available_bed(&bed.status) {
            count.available += 1;
        }
    }
    by_type
        .into_iter()
        .map(|(bed_type, count)| BedTypeSummary {
            bed_type: bed_type.to_string(),
            available: count.available,
            total: count.total,
        })
        .collect()
}

/// Free beds in the categories the emergency view cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CriticalBeds {
    pub icu: usize,
    pub oxygen: usize,
    pub general: usize,
}

pub fn critical_bed_availability(beds: &[Bed]) -> CriticalBeds {
    let free = |pattern: &Regex| {
        beds.iter()
            .filter(|b| pattern.is_match(&b.bed_type) && is_available_bed(&b.status))
            .count()
    };
    CriticalBeds {
        icu: free(&*ICU),
        oxygen: free(&*OXYGEN),
        general: free(&*GENERAL),
    }
}

/// Sum of parseable unit counts. Blank or non-numeric cells add nothing.
pub fn total_blood_units(entries: &[BloodBankEntry]) -> f64 {
    entries.iter().filter_map(BloodBankEntry::unit_count).sum()
}

/// Everything the hospital dashboard shows, fetched together.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalOverview {
    pub hospital_id: String,
    pub beds: Vec<Bed>,
    pub blood_bank: Vec<BloodBankEntry>,
    pub appointments: Vec<Appointment>,
    pub equipment: Vec<Equipment>,
    pub doctors: Vec<Doctor>,
}

impl HospitalOverview {
    /// Load the five datasets concurrently. The first failure wins and the
    /// other results are dropped.
    pub async fn load<H: HttpClient>(
        adapter: &SheetAdapter<H>,
        hospital_id: &str,
    ) -> Result<Self, SheetError> {
        let scope = adapter.for_tenant(Some(hospital_id))?;
        let (beds, blood_bank, appointments, equipment, doctors) = tokio::try_join!(
            scope.beds(),
            scope.blood_bank(),
            scope.appointments(),
            scope.equipment(),
            scope.doctors(),
        )?;
        tracing::debug!(hospital_id = %scope.hospital_id(), "Hospital overview loaded");
        Ok(Self {
            hospital_id: scope.hospital_id().to_string(),
            beds,
            blood_bank,
            appointments,
            equipment,
            doctors,
        })
    }

    pub fn bed_summary(&self) -> Vec<BedTypeSummary> {
        bed_summary(&self.beds)
    }

    pub fn available_beds(&self) -> usize {
        self.beds.iter().filter(|b| is_available_bed(&b.status)).count()
    }

    pub fn critical_beds(&self) -> CriticalBeds {
        critical_bed_availability(&self.beds)
    }

    pub fn blood_units(&self) -> f64 {
        total_blood_units(&self.blood_bank)
    }
}
