use chrono::NaiveDate;
use loan_audit::config::IntelligenceConfig;
use loan_audit::workflows::audit::{
    AuditId, AuditRecord, AuditRepository, DocumentIntelligence, IntelligenceError,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditRepository {
    records: Arc<Mutex<HashMap<AuditId, AuditRecord>>>,
}

impl AuditRepository for InMemoryAuditRepository {
    fn insert(&self, record: AuditRecord) -> Result<AuditRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.audit_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.audit_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AuditId) -> Result<Option<AuditRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Placeholder collaborator for deployments without an extraction backend.
/// Requests carrying an inline analysis payload never reach it; document-only
/// requests are refused with a pointer at the configured model.
pub(crate) struct UnconfiguredIntelligence {
    model: String,
}

impl UnconfiguredIntelligence {
    pub(crate) fn from_config(config: &IntelligenceConfig) -> Self {
        Self {
            model: config.model.clone(),
        }
    }
}

impl DocumentIntelligence for UnconfiguredIntelligence {
    fn analyze(&self, _document_text: &str) -> Result<Value, IntelligenceError> {
        Err(IntelligenceError::Unavailable(format!(
            "extraction backend `{}` is not bundled with this build; \
             submit the audit with an inline analysis payload",
            self.model
        )))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
