use serde::{Deserialize, Serialize};

/// Named row collection in the backing spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dataset {
    Patients,
    Hospitals,
    Doctors,
    Beds,
    BloodBank,
    Equipment,
    Appointments,
}

impl Dataset {
    pub const ALL: [Dataset; 7] = [
        Self::Patients,
        Self::Hospitals,
        Self::Doctors,
        Self::Beds,
        Self::BloodBank,
        Self::Equipment,
        Self::Appointments,
    ];

    /// Identifier sent to the proxy as `dataset=`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Patients => "patients",
            Self::Hospitals => "hospitals",
            Self::Doctors => "doctors",
            Self::Beds => "beds",
            Self::BloodBank => "bloodBank",
            Self::Equipment => "equipment",
            Self::Appointments => "appointments",
        }
    }

    /// Sheet tab id used by the direct transport.
    pub fn gid(&self) -> &'static str {
        match self {
            Self::Patients => "402205425",
            Self::Hospitals => "1302077403",
            Self::Doctors => "1276984231",
            Self::Beds => "239389154",
            Self::BloodBank => "841229088",
            Self::Equipment => "2018027396",
            Self::Appointments => "2022773412",
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown dataset: {s}"))
    }
}
