//! Hospital account registry and role parsing.
//!
//! The identity provider only yields an email and free-form metadata. This
//! module maps those onto a tenant and a portal role.
//!
//! Hospital resolution order: metadata id, registry by id, registry by
//! email, then a brand-name guess from the email address.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalIdentity {
    pub hospital_id: String,
    pub hospital_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalAccount {
    pub email: &'static str,
    pub hospital_id: &'static str,
    pub hospital_name: &'static str,
}

impl HospitalAccount {
    fn identity(&self) -> HospitalIdentity {
        HospitalIdentity {
            hospital_id: self.hospital_id.to_string(),
            hospital_name: self.hospital_name.to_string(),
        }
    }
}

const HOSPITAL_ACCOUNTS: &[HospitalAccount] = &[
    HospitalAccount {
        email: "admin.apollo@hindseva.in",
        hospital_id: "HOSP001",
        hospital_name: "Apollo Care Kolkata",
    },
    HospitalAccount {
        email: "admin.medica@hindseva.in",
        hospital_id: "HOSP002",
        hospital_name: "Medica Superspeciality",
    },
    HospitalAccount {
        email: "admin.amri@hindseva.in",
        hospital_id: "HOSP003",
        hospital_name: "AMRI Hospital",
    },
    HospitalAccount {
        email: "admin.ruby@hindseva.in",
        hospital_id: "HOSP004",
        hospital_name: "Ruby General",
    },
    HospitalAccount {
        email: "admin.peerless@hindseva.in",
        hospital_id: "HOSP005",
        hospital_name: "Peerless Hospital",
    },
    HospitalAccount {
        email: "admin.ils@hindseva.in",
        hospital_id: "HOSP006",
        hospital_name: "ILS Hospital",
    },
];

pub fn all_hospital_accounts() -> &'static [HospitalAccount] {
    HOSPITAL_ACCOUNTS
}

/// Look up the hospital for a staff email (trimmed, case-insensitive).
pub fn hospital_by_email(email: Option<&str>) -> Option<HospitalIdentity> {
    let email = email?.trim().to_lowercase();
    if email.is_empty() {
        return None;
    }
    HOSPITAL_ACCOUNTS
        .iter()
        .find(|a| a.email == email)
        .map(HospitalAccount::identity)
}

/// Look up a hospital by id (trimmed, upper-cased).
pub fn hospital_by_id(hospital_id: Option<&str>) -> Option<HospitalIdentity> {
    let id = hospital_id?.trim().to_uppercase();
    if id.is_empty() {
        return None;
    }
    HOSPITAL_ACCOUNTS
        .iter()
        .find(|a| a.hospital_id == id)
        .map(HospitalAccount::identity)
}

/// Brand fragments checked in order against the whole email address.
const EMAIL_BRANDS: &[(&str, &str)] = &[
    ("apollo", "HOSP001"),
    ("medica", "HOSP002"),
    ("amri", "HOSP003"),
    ("ruby", "HOSP004"),
    ("peerless", "HOSP005"),
    ("ils", "HOSP006"),
];

/// Guess the hospital from a brand name anywhere in the email.
pub fn infer_hospital_from_email(email: Option<&str>) -> Option<HospitalIdentity> {
    let email = email?.trim().to_lowercase();
    if email.is_empty() {
        return None;
    }
    EMAIL_BRANDS
        .iter()
        .find(|(brand, _)| email.contains(*brand))
        .and_then(|(_, id)| hospital_by_id(Some(*id)))
}

/// Tenant for a signed-in user. Metadata wins field by field; the registry
/// and the email guess only fill what metadata leaves blank.
pub fn resolve_hospital(
    metadata_id: Option<&str>,
    metadata_name: Option<&str>,
    email: Option<&str>,
) -> Option<HospitalIdentity> {
    let metadata_id = non_blank(metadata_id).map(str::to_uppercase);
    let metadata_name = non_blank(metadata_name).map(str::to_string);
    let known = hospital_by_id(metadata_id.as_deref())
        .or_else(|| hospital_by_email(email))
        .or_else(|| infer_hospital_from_email(email));

    let hospital_id = metadata_id.or_else(|| known.as_ref().map(|h| h.hospital_id.clone()))?;
    let hospital_name = metadata_name
        .or_else(|| known.map(|h| h.hospital_name))
        .unwrap_or_default();
    Some(HospitalIdentity {
        hospital_id,
        hospital_name,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_receptionist_email(email: Option<&str>) -> bool {
    let local = email
        .unwrap_or_default()
        .split('@')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    local.starts_with("recep") || local.contains("receptionist")
}

/// Portal role carried in identity metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Receptionist,
    Patient,
    Guest,
}

impl Role {
    /// Recognized role names and their aliases.
    pub fn from_alias(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "super_admin" | "superadmin" | "admin" | "hospital_admin" => Some(Self::SuperAdmin),
            "receptionist" | "reception" | "frontdesk" => Some(Self::Receptionist),
            "patient" => Some(Self::Patient),
            "guest" => Some(Self::Guest),
            _ => None,
        }
    }

    /// Unknown or blank values fall back to `Guest`.
    pub fn parse(raw: &str) -> Self {
        Self::from_alias(raw).unwrap_or(Self::Guest)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Receptionist => "receptionist",
            Self::Patient => "patient",
            Self::Guest => "guest",
        }
    }

    /// Roles whose pages are bound to a single hospital.
    pub fn is_tenant_bound(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Receptionist)
    }
}

/// Role for a signed-in user.
///
/// An unrecognized role falls back on the tenant: with a hospital id the
/// user is staff (receptionist when the email's local part says so, admin
/// otherwise); without one they are a patient.
pub fn resolve_role(raw: &str, hospital_id: Option<&str>, email: Option<&str>) -> Role {
    match Role::from_alias(raw) {
        Some(role) if role != Role::Guest => role,
        _ if non_blank(hospital_id).is_none() => Role::Patient,
        _ if is_receptionist_email(email) => Role::Receptionist,
        _ => Role::SuperAdmin,
    }
}
