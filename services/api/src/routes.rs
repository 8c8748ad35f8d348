use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use loan_audit::error::AppError;
use loan_audit::workflows::audit::{
    audit_router, extract_covenants, normalize, AuditRepository, DocumentIntelligence,
    LoanAuditService,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Dry-run intake. The analysis payload is normalized and classified exactly
/// as a stored audit would be, but nothing is persisted and no audit id is
/// assigned.
#[derive(Debug, Deserialize)]
pub(crate) struct AuditPreviewRequest {
    #[serde(default)]
    pub(crate) document_text: String,
    pub(crate) analysis: serde_json::Value,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) analyzed_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuditPreviewResponse {
    pub(crate) analyzed_on: NaiveDate,
    pub(crate) readiness_score: u8,
    pub(crate) readiness_label: &'static str,
    pub(crate) risk_label: &'static str,
    pub(crate) clause_count: usize,
    pub(crate) review_clauses: Vec<String>,
    pub(crate) covenant_candidates: Vec<String>,
}

pub(crate) fn with_audit_routes<R, I>(service: Arc<LoanAuditService<R, I>>) -> axum::Router
where
    R: AuditRepository + 'static,
    I: DocumentIntelligence + 'static,
{
    audit_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/audits/preview",
            axum::routing::post(audit_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn audit_preview_endpoint(
    Json(request): Json<AuditPreviewRequest>,
) -> Result<Json<AuditPreviewResponse>, AppError> {
    let AuditPreviewRequest {
        document_text,
        analysis,
        analyzed_on,
    } = request;

    let result = normalize(&analysis, &document_text)?;
    let analyzed_on = analyzed_on.unwrap_or_else(|| Local::now().date_naive());

    let review_clauses = result
        .clauses
        .iter()
        .filter(|clause| clause.review_required)
        .map(|clause| clause.name.clone())
        .collect();
    let covenant_candidates = extract_covenants(&result.clauses)
        .into_iter()
        .map(|clause| clause.name.clone())
        .collect();

    Ok(Json(AuditPreviewResponse {
        analyzed_on,
        readiness_score: result.deal_readiness.score,
        readiness_label: result.deal_readiness.status.label(),
        risk_label: result.risk_assessment.overall_rating.label(),
        clause_count: result.clauses.len(),
        review_clauses,
        covenant_candidates,
    }))
}
