use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AnalysisResult, AuditId};

/// Stored audit. Immutable once inserted; starting a new audit produces a
/// new record under a new id rather than updating this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub audit_id: AuditId,
    pub analyzed_on: NaiveDate,
    pub result: AnalysisResult,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AuditRepository: Send + Sync {
    fn insert(&self, record: AuditRecord) -> Result<AuditRecord, RepositoryError>;
    fn fetch(&self, id: &AuditId) -> Result<Option<AuditRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
