//! Typed reads and the write/upsert protocol over either transport.
//!
//! Every read re-fetches the whole dataset. Nothing is cached and no state
//! is shared between calls apart from the configuration.

use serde::Serialize;

use super::http::{HttpClient, ReqwestClient};
use super::normalize::scoped;
use super::transport::{self, Transport};
use crate::config::AdapterConfig;
use crate::error::SheetError;
use crate::models::{
    appointment_id_at, name_key, Appointment, Bed, BloodBankEntry, Doctor, Equipment, Hospital,
    NewAppointment, NewPatient, Patient, SheetRecord,
};

// ═══════════════════════════════════════════════════════════
// Write results
// ═══════════════════════════════════════════════════════════

/// Where a write ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// No backend configured. Nothing left the process.
    LocalOnly,
    /// Sent through the proxy.
    AppsScript,
    /// Sent to the appointment webhook.
    Webhook,
}

/// Outcome of one write, echoing the payload that was (or would have been) sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReceipt<P> {
    pub ok: bool,
    pub mode: WriteMode,
    pub payload: P,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddPatientPayload {
    pub action: &'static str,
    pub name: String,
    pub age: String,
    pub disease: String,
    pub doctor: String,
    pub hospital_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentPayload {
    pub action: &'static str,
    pub appointment_id: String,
    pub patient_name: String,
    pub doctor: String,
    pub date: String,
    pub hospital_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnsureOutcome {
    pub created: bool,
}

/// Result of the patient upsert that follows a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatientSync {
    Synced { created: bool },
    /// The appointment was written; only the patient upsert failed.
    Failed { message: String },
    /// The branch taken does not sync patients.
    Skipped,
}

/// Booking result. The two writes are not atomic: `appointment` succeeded
/// whenever this value exists, `patient_sync` reports the follow-up on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingOutcome {
    pub appointment: WriteReceipt<AppointmentPayload>,
    pub patient_sync: PatientSync,
}

// ═══════════════════════════════════════════════════════════
// SheetAdapter
// ═══════════════════════════════════════════════════════════

pub struct SheetAdapter<H: HttpClient = ReqwestClient> {
    config: AdapterConfig,
    http: H,
}

impl SheetAdapter<ReqwestClient> {
    pub fn new(config: AdapterConfig) -> Result<Self, SheetError> {
        Ok(Self::with_client(config, ReqwestClient::new()?))
    }

    /// Adapter configured from `HINDSEVA_*` environment variables.
    pub fn from_env() -> Result<Self, SheetError> {
        Self::new(AdapterConfig::from_env())
    }
}

impl<H: HttpClient> SheetAdapter<H> {
    pub fn with_client(config: AdapterConfig, http: H) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    /// Read one dataset as typed records.
    ///
    /// With a hospital id the proxy is asked to filter, and the result is
    /// filtered again here by exact match, whichever transport ran.
    pub async fn read<T: SheetRecord>(&self, hospital_id: Option<&str>) -> Result<Vec<T>, SheetError> {
        let hospital_id = hospital_id.filter(|id| !id.is_empty());
        let rows = self
            .config
            .transport()
            .fetch_rows(&self.http, T::DATASET, hospital_id)
            .await?;

        let records: Vec<T> = rows
            .iter()
            .map(T::from_row)
            .filter(T::is_complete)
            .collect();

        tracing::debug!(dataset = %T::DATASET, rows = records.len(), "Dataset read");

        Ok(match hospital_id {
            Some(id) => scoped(records, id),
            None => records,
        })
    }

    /// All hospitals. Never tenant-filtered.
    pub async fn get_hospitals(&self) -> Result<Vec<Hospital>, SheetError> {
        self.read(None).await
    }

    pub async fn get_patients(&self, hospital_id: Option<&str>) -> Result<Vec<Patient>, SheetError> {
        self.read(hospital_id).await
    }

    pub async fn get_doctors(&self, hospital_id: Option<&str>) -> Result<Vec<Doctor>, SheetError> {
        self.read(hospital_id).await
    }

    pub async fn get_beds(&self, hospital_id: Option<&str>) -> Result<Vec<Bed>, SheetError> {
        self.read(hospital_id).await
    }

    pub async fn get_blood_bank(
        &self,
        hospital_id: Option<&str>,
    ) -> Result<Vec<BloodBankEntry>, SheetError> {
        self.read(hospital_id).await
    }

    pub async fn get_equipment(&self, hospital_id: Option<&str>) -> Result<Vec<Equipment>, SheetError> {
        self.read(hospital_id).await
    }

    pub async fn get_appointments(
        &self,
        hospital_id: Option<&str>,
    ) -> Result<Vec<Appointment>, SheetError> {
        self.read(hospital_id).await
    }

    /// Send a write action through the proxy, or report it as local-only.
    async fn post_action<P: Serialize>(&self, payload: P) -> Result<WriteReceipt<P>, SheetError> {
        let mode = match self.config.transport() {
            Transport::Proxy { base_url, api_key } => {
                transport::post_proxy(&self.http, &base_url, api_key.as_deref(), &payload).await?;
                WriteMode::AppsScript
            }
            Transport::Direct { .. } => WriteMode::LocalOnly,
        };
        Ok(WriteReceipt {
            ok: true,
            mode,
            payload,
        })
    }

    pub async fn add_patient(
        &self,
        input: &NewPatient,
    ) -> Result<WriteReceipt<AddPatientPayload>, SheetError> {
        let payload = AddPatientPayload {
            action: "addPatient",
            name: input.name.clone(),
            age: input.age.clone().unwrap_or_default(),
            disease: input.disease.clone().unwrap_or_default(),
            doctor: input.doctor.clone().unwrap_or_default(),
            hospital_id: input.hospital_id.clone(),
        };
        let receipt = self.post_action(payload).await?;
        tracing::info!(mode = ?receipt.mode, hospital_id = %input.hospital_id, "Patient added");
        Ok(receipt)
    }

    /// Create the patient unless one with the same name (case-insensitive,
    /// trimmed) already exists at the hospital.
    ///
    /// Read-then-write, not a transaction: two concurrent callers can both
    /// miss and both create.
    pub async fn ensure_patient_exists(&self, input: &NewPatient) -> Result<EnsureOutcome, SheetError> {
        let key = name_key(&input.name);
        if key.is_empty() {
            return Ok(EnsureOutcome { created: false });
        }

        let patients = self.get_patients(Some(&input.hospital_id)).await?;
        if patients.iter().any(|p| p.name_key() == key) {
            return Ok(EnsureOutcome { created: false });
        }

        self.add_patient(input).await?;
        Ok(EnsureOutcome { created: true })
    }

    /// Book an appointment.
    ///
    /// - Proxy configured: write through the proxy, then upsert the patient.
    /// - Only a webhook configured: POST the payload to it, no patient upsert.
    /// - Neither: succeed locally without any I/O.
    pub async fn create_appointment(&self, input: &NewAppointment) -> Result<BookingOutcome, SheetError> {
        let payload = AppointmentPayload {
            action: "createAppointment",
            appointment_id: appointment_id_at(chrono::Utc::now().timestamp_millis()),
            patient_name: input.patient_name.clone(),
            doctor: input.doctor.clone(),
            date: input.date.clone(),
            hospital_id: input.hospital_id.clone(),
        };

        if !self.config.is_proxy_configured() {
            let mode = match &self.config.webhook_url {
                Some(url) => {
                    transport::post_webhook(&self.http, url, &payload).await?;
                    WriteMode::Webhook
                }
                None => WriteMode::LocalOnly,
            };
            tracing::info!(mode = ?mode, appointment_id = %payload.appointment_id, "Appointment created");
            return Ok(BookingOutcome {
                appointment: WriteReceipt {
                    ok: true,
                    mode,
                    payload,
                },
                patient_sync: PatientSync::Skipped,
            });
        }

        let appointment = self.post_action(payload).await?;
        tracing::info!(
            mode = ?appointment.mode,
            appointment_id = %appointment.payload.appointment_id,
            "Appointment created"
        );

        let patient = NewPatient {
            name: input.patient_name.clone(),
            age: Some(input.age.clone().unwrap_or_default()),
            disease: Some(input.disease.clone().unwrap_or_default()),
            doctor: Some(input.doctor.clone()),
            hospital_id: input.hospital_id.clone(),
        };
        let patient_sync = match self.ensure_patient_exists(&patient).await {
            Ok(outcome) => PatientSync::Synced {
                created: outcome.created,
            },
            Err(e) => {
                tracing::warn!(error = %e, hospital_id = %input.hospital_id, "Patient sync after booking failed");
                PatientSync::Failed {
                    message: e.to_string(),
                }
            }
        };

        Ok(BookingOutcome {
            appointment,
            patient_sync,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::sheets::http::{HttpRequest, HttpResponse, Method, MockHttpClient, NetworkError};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    const PROXY: &str = "https://script.example/exec";

    fn proxy_config() -> AdapterConfig {
        AdapterConfig::default().with_proxy(PROXY).with_api_key("k")
    }

    fn rows_body(rows: Value) -> String {
        json!({ "rows": rows }).to_string()
    }

    fn booking(name: &str) -> NewAppointment {
        NewAppointment {
            patient_name: name.into(),
            age: Some("40".into()),
            disease: None,
            doctor: "Dr. Sen".into(),
            date: "2024-06-01".into(),
            hospital_id: "HOSP001".into(),
        }
    }

    /// Proxy stand-in that keeps patients in memory and applies `addPatient`.
    #[derive(Default)]
    struct FakeProxy {
        patients: Mutex<Vec<Value>>,
        writes: Mutex<Vec<Value>>,
        urls: Mutex<Vec<String>>,
        fail_reads: bool,
    }

    #[async_trait]
    impl HttpClient for FakeProxy {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
            self.urls.lock().unwrap().push(request.url.clone());
            match request.method {
                Method::Get => {
                    if self.fail_reads {
                        return Ok(HttpResponse::new(500, ""));
                    }
                    let rows = self.patients.lock().unwrap().clone();
                    Ok(HttpResponse::new(200, rows_body(Value::Array(rows))))
                }
                Method::Post => {
                    let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
                    if body["action"] == "addPatient" {
                        self.patients.lock().unwrap().push(json!({
                            "Name": body["name"],
                            "Hospital ID": body["hospital_id"],
                        }));
                    }
                    self.writes.lock().unwrap().push(body);
                    Ok(HttpResponse::new(200, r#"{"ok":true}"#))
                }
            }
        }
    }

    impl FakeProxy {
        fn with_patient(self, name: &str, hospital_id: &str) -> Self {
            self.patients
                .lock()
                .unwrap()
                .push(json!({"name": name, "hospital_id": hospital_id}));
            self
        }

        fn actions(&self) -> Vec<String> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .map(|w| w["action"].as_str().unwrap_or_default().to_string())
                .collect()
        }
    }

    // ── reads ─────────────────────────────────────────────

    #[tokio::test]
    async fn read_filters_client_side_even_through_proxy() {
        let body = rows_body(json!([
            {"bed_id": "B1", "hospital_id": "HOSP001"},
            {"bed_id": "B2", "hospital_id": "HOSP002"},
            {"bed_id": "B3", "hospitalid": "HOSP001"},
        ]));
        let http = MockHttpClient::new().on(Method::Get, "dataset=beds", 200, &body);
        let adapter = SheetAdapter::with_client(proxy_config(), http);
        let beds = adapter.get_beds(Some("HOSP001")).await.unwrap();
        let ids: Vec<_> = beds.iter().map(|b| b.bed_id.as_str()).collect();
        assert_eq!(ids, ["B1", "B3"]);
    }

    #[tokio::test]
    async fn read_without_hospital_returns_everything() {
        let body = rows_body(json!([
            {"doctor_id": "D1", "hospital_id": "HOSP001"},
            {"doctor_id": "D2", "hospital_id": "HOSP002"},
        ]));
        let http = MockHttpClient::new().on(Method::Get, "dataset=doctors", 200, &body);
        let adapter = SheetAdapter::with_client(proxy_config(), http);
        assert_eq!(adapter.get_doctors(None).await.unwrap().len(), 2);
        assert!(!adapter.http().requests()[0].url.contains("hospital_id"));
    }

    #[tokio::test]
    async fn direct_read_filters_by_tenant() {
        let body = r#"google.visualization.Query.setResponse({"table":{"cols":[{"label":"Blood Group"},{"label":"Units"},{"label":"Hospital ID"}],"rows":[{"c":[{"v":"O+"},{"v":12.0},{"v":"HOSP001"}]},{"c":[{"v":"A-"},{"v":3.0},{"v":"HOSP002"}]}]}});"#;
        let http = MockHttpClient::new().on(Method::Get, "gid=841229088", 200, body);
        let adapter = SheetAdapter::with_client(AdapterConfig::default(), http);
        let entries = adapter.get_blood_bank(Some("HOSP001")).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].blood_group, "O+");
        assert_eq!(entries[0].units, "12");
    }

    #[tokio::test]
    async fn hospitals_drop_incomplete_rows() {
        let body = rows_body(json!([
            {"hospital_id": "HOSP001", "name": "Apollo Care Kolkata"},
            {"hospital_id": "", "name": "Nameless"},
            {"hospital_id": "HOSP003"},
        ]));
        let http = MockHttpClient::new().on(Method::Get, "dataset=hospitals", 200, &body);
        let adapter = SheetAdapter::with_client(proxy_config(), http);
        let hospitals = adapter.get_hospitals().await.unwrap();
        assert_eq!(hospitals.len(), 1);
        assert_eq!(hospitals[0].hospital_id, "HOSP001");
    }

    #[tokio::test]
    async fn empty_hospital_id_means_unscoped() {
        let body = rows_body(json!([
            {"appointment_id": "A1", "hospital_id": "HOSP001"},
            {"appointment_id": "A2", "hospital_id": "HOSP002"},
        ]));
        let http = MockHttpClient::new().on(Method::Get, "dataset=appointments", 200, &body);
        let adapter = SheetAdapter::with_client(proxy_config(), http);
        assert_eq!(adapter.get_appointments(Some("")).await.unwrap().len(), 2);
    }

    // ── add / ensure ──────────────────────────────────────

    #[tokio::test]
    async fn add_patient_defaults_optional_fields() {
        let http = MockHttpClient::new().on(Method::Post, "exec", 200, "{}");
        let adapter = SheetAdapter::with_client(proxy_config(), http);
        let receipt = adapter
            .add_patient(&NewPatient::new("Asha", "HOSP001"))
            .await
            .unwrap();
        assert_eq!(receipt.mode, WriteMode::AppsScript);
        let sent: Value =
            serde_json::from_str(adapter.http().requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            sent,
            json!({
                "action": "addPatient",
                "name": "Asha",
                "age": "",
                "disease": "",
                "doctor": "",
                "hospital_id": "HOSP001",
            })
        );
    }

    #[tokio::test]
    async fn add_patient_without_proxy_is_local_only() {
        let adapter = SheetAdapter::with_client(AdapterConfig::default(), MockHttpClient::new());
        let receipt = adapter
            .add_patient(&NewPatient::new("Asha", "HOSP001"))
            .await
            .unwrap();
        assert_eq!(receipt.mode, WriteMode::LocalOnly);
        assert!(receipt.ok);
        assert_eq!(adapter.http().request_count(), 0);
    }

    #[tokio::test]
    async fn ensure_patient_creates_then_finds() {
        let adapter = SheetAdapter::with_client(proxy_config(), FakeProxy::default());
        let input = NewPatient::new("Ravi Kumar", "HOSP001");

        let first = adapter.ensure_patient_exists(&input).await.unwrap();
        let second = adapter.ensure_patient_exists(&input).await.unwrap();

        assert_eq!(first, EnsureOutcome { created: true });
        assert_eq!(second, EnsureOutcome { created: false });
        assert_eq!(adapter.http().actions(), ["addPatient"]);
    }

    #[tokio::test]
    async fn ensure_patient_matches_case_insensitively() {
        let proxy = FakeProxy::default().with_patient("  RAVI kumar ", "HOSP001");
        let adapter = SheetAdapter::with_client(proxy_config(), proxy);
        let outcome = adapter
            .ensure_patient_exists(&NewPatient::new("ravi Kumar", "HOSP001"))
            .await
            .unwrap();
        assert!(!outcome.created);
    }

    #[tokio::test]
    async fn ensure_patient_ignores_other_hospitals() {
        let proxy = FakeProxy::default().with_patient("Ravi Kumar", "HOSP002");
        let adapter = SheetAdapter::with_client(proxy_config(), proxy);
        let outcome = adapter
            .ensure_patient_exists(&NewPatient::new("Ravi Kumar", "HOSP001"))
            .await
            .unwrap();
        assert!(outcome.created);
    }

    #[tokio::test]
    async fn ensure_patient_blank_name_does_no_io() {
        let adapter = SheetAdapter::with_client(proxy_config(), MockHttpClient::new());
        for name in ["", "   ", "\t\n"] {
            let outcome = adapter
                .ensure_patient_exists(&NewPatient::new(name, "HOSP001"))
                .await
                .unwrap();
            assert!(!outcome.created);
        }
        assert_eq!(adapter.http().request_count(), 0);
    }

    // ── booking ───────────────────────────────────────────

    #[tokio::test]
    async fn booking_without_backend_is_local_only() {
        let adapter = SheetAdapter::with_client(AdapterConfig::default(), MockHttpClient::new());
        let outcome = adapter.create_appointment(&booking("Meera")).await.unwrap();
        assert!(outcome.appointment.ok);
        assert_eq!(outcome.appointment.mode, WriteMode::LocalOnly);
        assert_eq!(outcome.patient_sync, PatientSync::Skipped);
        assert_eq!(adapter.http().request_count(), 0);
    }

    #[tokio::test]
    async fn booking_id_is_epoch_millis() {
        let adapter = SheetAdapter::with_client(AdapterConfig::default(), MockHttpClient::new());
        let before = chrono::Utc::now().timestamp_millis();
        let outcome = adapter.create_appointment(&booking("Meera")).await.unwrap();
        let after = chrono::Utc::now().timestamp_millis();

        let id = &outcome.appointment.payload.appointment_id;
        let digits = id.strip_prefix("APT-").expect("APT- prefix");
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        let millis: i64 = digits.parse().unwrap();
        assert!(before <= millis && millis <= after);
    }

    #[tokio::test]
    async fn booking_via_webhook_posts_json_and_skips_sync() {
        let http = MockHttpClient::new().on(Method::Post, "hook.example", 200, "");
        let config = AdapterConfig::default().with_webhook("https://hook.example/book");
        let adapter = SheetAdapter::with_client(config, http);
        let outcome = adapter.create_appointment(&booking("Meera")).await.unwrap();

        assert_eq!(outcome.appointment.mode, WriteMode::Webhook);
        assert_eq!(outcome.patient_sync, PatientSync::Skipped);
        let sent = adapter.http().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content_type, Some("application/json"));
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["action"], "createAppointment");
        assert_eq!(body["patient_name"], "Meera");
        assert_eq!(body["hospital_id"], "HOSP001");
    }

    #[tokio::test]
    async fn booking_webhook_failure_is_fatal() {
        let http = MockHttpClient::new().on(Method::Post, "hook.example", 500, "");
        let config = AdapterConfig::default().with_webhook("https://hook.example/book");
        let adapter = SheetAdapter::with_client(config, http);
        let err = adapter.create_appointment(&booking("Meera")).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Transport);
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn booking_via_proxy_creates_missing_patient() {
        let adapter = SheetAdapter::with_client(proxy_config(), FakeProxy::default());
        let outcome = adapter.create_appointment(&booking("Meera")).await.unwrap();

        assert_eq!(outcome.appointment.mode, WriteMode::AppsScript);
        assert_eq!(outcome.patient_sync, PatientSync::Synced { created: true });
        assert_eq!(adapter.http().actions(), ["createAppointment", "addPatient"]);

        let writes = adapter.http().writes.lock().unwrap().clone();
        assert_eq!(writes[1]["doctor"], "Dr. Sen");
        assert_eq!(writes[1]["age"], "40");
        assert_eq!(writes[1]["disease"], "");
    }

    #[tokio::test]
    async fn booking_prefers_proxy_over_webhook() {
        let config = proxy_config().with_webhook("https://hook.example/book");
        let adapter = SheetAdapter::with_client(config, FakeProxy::default());
        let outcome = adapter.create_appointment(&booking("Meera")).await.unwrap();

        assert_eq!(outcome.appointment.mode, WriteMode::AppsScript);
        assert_eq!(outcome.patient_sync, PatientSync::Synced { created: true });
        let urls = adapter.http().urls.lock().unwrap().clone();
        assert!(!urls.is_empty());
        assert!(urls.iter().all(|u| u.starts_with(PROXY)), "{urls:?}");
        assert!(!urls.iter().any(|u| u.contains("hook.example")));
    }

    #[tokio::test]
    async fn booking_via_proxy_skips_existing_patient() {
        let proxy = FakeProxy::default().with_patient("meera", "HOSP001");
        let adapter = SheetAdapter::with_client(proxy_config(), proxy);
        let outcome = adapter.create_appointment(&booking("Meera")).await.unwrap();
        assert_eq!(outcome.patient_sync, PatientSync::Synced { created: false });
        assert_eq!(adapter.http().actions(), ["createAppointment"]);
    }

    #[tokio::test]
    async fn booking_survives_patient_sync_failure() {
        let proxy = FakeProxy {
            fail_reads: true,
            ..Default::default()
        };
        let adapter = SheetAdapter::with_client(proxy_config(), proxy);
        let outcome = adapter.create_appointment(&booking("Meera")).await.unwrap();

        assert!(outcome.appointment.ok);
        match outcome.patient_sync {
            PatientSync::Failed { message } => assert!(message.contains("500")),
            other => panic!("expected failed sync, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn booking_proxy_write_failure_is_fatal() {
        let http = MockHttpClient::new().on(Method::Post, "exec", 200, r#"{"error":"quota"}"#);
        let adapter = SheetAdapter::with_client(proxy_config(), http);
        let err = adapter.create_appointment(&booking("Meera")).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Upstream);
        // no patient read after a failed booking
        assert_eq!(adapter.http().request_count(), 1);
    }

    #[test]
    fn write_mode_serializes_kebab_case() {
        assert_eq!(serde_json::to_value(WriteMode::LocalOnly).unwrap(), "local-only");
        assert_eq!(serde_json::to_value(WriteMode::AppsScript).unwrap(), "apps-script");
    }

    #[test]
    fn patient_sync_serializes_with_status_tag() {
        let value = serde_json::to_value(PatientSync::Synced { created: true }).unwrap();
        assert_eq!(value, json!({"status": "synced", "created": true}));
        let value = serde_json::to_value(PatientSync::Skipped).unwrap();
        assert_eq!(value, json!({"status": "skipped"}));
    }
}
