use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::AuditId;
use super::intelligence::DocumentIntelligence;
use super::repository::{AuditRepository, RepositoryError};
use super::service::{AuditServiceError, LoanAuditService};

/// Router builder exposing HTTP endpoints for audit intake and review.
pub fn audit_router<R, I>(service: Arc<LoanAuditService<R, I>>) -> Router
where
    R: AuditRepository + 'static,
    I: DocumentIntelligence + 'static,
{
    Router::new()
        .route("/api/v1/audits", post(submit_handler::<R, I>))
        .route("/api/v1/audits/:audit_id", get(report_handler::<R, I>))
        .route(
            "/api/v1/audits/:audit_id/export",
            get(export_handler::<R, I>),
        )
        .route("/api/v1/audits/:audit_id/slack", post(slack_handler::<R, I>))
        .with_state(service)
}

/// Intake body. When `analysis` is omitted the configured intelligence
/// collaborator is consulted for the payload.
#[derive(Debug, Deserialize)]
pub struct AuditSubmission {
    pub document_text: String,
    #[serde(default)]
    pub analysis: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SlackRequest {
    pub clause_name: String,
    pub limit: String,
    pub actual: String,
}

pub(crate) async fn submit_handler<R, I>(
    State(service): State<Arc<LoanAuditService<R, I>>>,
    axum::Json(submission): axum::Json<AuditSubmission>,
) -> Response
where
    R: AuditRepository + 'static,
    I: DocumentIntelligence + 'static,
{
    let analyzed_on = Local::now().date_naive();
    let outcome = match &submission.analysis {
        Some(payload) => {
            service.audit_with_payload(&submission.document_text, payload, analyzed_on)
        }
        None => service.audit_document(&submission.document_text, analyzed_on),
    };

    match outcome {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.report_view())).into_response(),
        Err(AuditServiceError::Schema(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AuditServiceError::Intelligence(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(AuditServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "audit already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn report_handler<R, I>(
    State(service): State<Arc<LoanAuditService<R, I>>>,
    Path(audit_id): Path<String>,
) -> Response
where
    R: AuditRepository + 'static,
    I: DocumentIntelligence + 'static,
{
    let id = AuditId(audit_id);
    match service.fetch(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.report_view())).into_response(),
        Err(AuditServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "audit not found",
                "audit_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn export_handler<R, I>(
    State(service): State<Arc<LoanAuditService<R, I>>>,
    Path(audit_id): Path<String>,
) -> Response
where
    R: AuditRepository + 'static,
    I: DocumentIntelligence + 'static,
{
    let id = AuditId(audit_id);
    match service.export_csv(&id) {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            csv,
        )
            .into_response(),
        Err(AuditServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "audit not found",
                "audit_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn slack_handler<R, I>(
    State(service): State<Arc<LoanAuditService<R, I>>>,
    Path(audit_id): Path<String>,
    axum::Json(request): axum::Json<SlackRequest>,
) -> Response
where
    R: AuditRepository + 'static,
    I: DocumentIntelligence + 'static,
{
    let id = AuditId(audit_id);
    match service.covenant_slack(&id, &request.clause_name, &request.limit, &request.actual) {
        Ok(calculation) => {
            // A null calculation is the neutral "enter values" state for
            // unparseable input, not an error.
            let payload = json!({
                "clause_name": request.clause_name,
                "calculation": calculation,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(AuditServiceError::CovenantNotFound(clause_name)) => {
            let payload = json!({
                "error": format!("clause `{clause_name}` is not a covenant candidate"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(AuditServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "audit not found",
                "audit_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
