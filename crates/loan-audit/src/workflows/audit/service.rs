use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use super::covenants::{compute_slack, is_covenant_candidate, SlackCalculation};
use super::domain::AuditId;
use super::export::{clauses_to_csv, ExportError};
use super::intelligence::{DocumentIntelligence, IntelligenceError};
use super::normalizer::{normalize, SchemaViolation};
use super::repository::{AuditRecord, AuditRepository, RepositoryError};

/// Service composing the intelligence boundary, the normalizer, and the
/// audit repository.
pub struct LoanAuditService<R, I> {
    repository: Arc<R>,
    intelligence: Arc<I>,
}

static AUDIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_audit_id() -> AuditId {
    let id = AUDIT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AuditId(format!("audit-{id:06}"))
}

impl<R, I> LoanAuditService<R, I>
where
    R: AuditRepository + 'static,
    I: DocumentIntelligence + 'static,
{
    pub fn new(repository: Arc<R>, intelligence: Arc<I>) -> Self {
        Self {
            repository,
            intelligence,
        }
    }

    /// Run the intelligence collaborator against the document, normalize its
    /// payload, and store the result.
    pub fn audit_document(
        &self,
        document_text: &str,
        analyzed_on: NaiveDate,
    ) -> Result<AuditRecord, AuditServiceError> {
        let payload = self.intelligence.analyze(document_text)?;
        self.audit_with_payload(document_text, &payload, analyzed_on)
    }

    /// Normalize a collaborator payload supplied by the caller and store it.
    pub fn audit_with_payload(
        &self,
        document_text: &str,
        payload: &Value,
        analyzed_on: NaiveDate,
    ) -> Result<AuditRecord, AuditServiceError> {
        let result = normalize(payload, document_text)?;
        let record = AuditRecord {
            audit_id: next_audit_id(),
            analyzed_on,
            result,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Fetch a stored audit for API responses.
    pub fn fetch(&self, audit_id: &AuditId) -> Result<AuditRecord, AuditServiceError> {
        let record = self
            .repository
            .fetch(audit_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Export the clause table of a stored audit as CSV.
    pub fn export_csv(&self, audit_id: &AuditId) -> Result<String, AuditServiceError> {
        let record = self.fetch(audit_id)?;
        Ok(clauses_to_csv(&record.result.clauses)?)
    }

    /// Compute covenant headroom for one clause of a stored audit.
    ///
    /// The clause must be among the audit's covenant candidates. The limit
    /// and actual are free-form text; an unparseable pair yields `Ok(None)`
    /// so the caller can render a neutral state.
    pub fn covenant_slack(
        &self,
        audit_id: &AuditId,
        clause_name: &str,
        limit_text: &str,
        actual_text: &str,
    ) -> Result<Option<SlackCalculation>, AuditServiceError> {
        let record = self.fetch(audit_id)?;
        let known = record.result.clauses.iter().any(|clause| {
            clause.name.eq_ignore_ascii_case(clause_name) && is_covenant_candidate(&clause.name)
        });

        if !known {
            return Err(AuditServiceError::CovenantNotFound(clause_name.to_string()));
        }

        Ok(compute_slack(limit_text, actual_text, clause_name))
    }
}

/// Error raised by the audit service.
#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error(transparent)]
    Intelligence(#[from] IntelligenceError),
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("clause `{0}` is not a covenant candidate of this audit")]
    CovenantNotFound(String),
}
