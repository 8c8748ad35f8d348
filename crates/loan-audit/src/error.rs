use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::audit::{AuditServiceError, RepositoryError, SchemaViolation};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Parse(serde_json::Error),
    Audit(AuditServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Parse(err) => write!(f, "analysis payload is not valid JSON: {}", err),
            AppError::Audit(err) => write!(f, "audit error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Parse(err) => Some(err),
            AppError::Audit(err) => Some(err),
        }
    }
}

// Status selection mirrors the per-case mapping in the audit router; the
// unit tests below keep the two in agreement.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Audit(AuditServiceError::Schema(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Audit(AuditServiceError::Repository(RepositoryError::NotFound))
            | AppError::Audit(AuditServiceError::CovenantNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Audit(AuditServiceError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Audit(AuditServiceError::Intelligence(_)) => StatusCode::BAD_GATEWAY,
            AppError::Parse(_) => StatusCode::BAD_REQUEST,
            AppError::Audit(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<AuditServiceError> for AppError {
    fn from(value: AuditServiceError) -> Self {
        Self::Audit(value)
    }
}

impl From<SchemaViolation> for AppError {
    fn from(value: SchemaViolation) -> Self {
        Self::Audit(AuditServiceError::Schema(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::audit::IntelligenceError;
    use serde_json::Value;

    fn status_for(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn schema_violations_map_to_unprocessable_entity() {
        let error = AppError::from(SchemaViolation::MissingSection("dealReadiness"));
        assert_eq!(status_for(error), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_audits_and_unknown_covenants_map_to_not_found() {
        let missing = AppError::Audit(AuditServiceError::Repository(RepositoryError::NotFound));
        assert_eq!(status_for(missing), StatusCode::NOT_FOUND);

        let covenant = AppError::Audit(AuditServiceError::CovenantNotFound(
            "Margin Ratchet".to_string(),
        ));
        assert_eq!(status_for(covenant), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_audits_map_to_conflict() {
        let error = AppError::Audit(AuditServiceError::Repository(RepositoryError::Conflict));
        assert_eq!(status_for(error), StatusCode::CONFLICT);
    }

    #[test]
    fn intelligence_failures_map_to_bad_gateway() {
        let error = AppError::Audit(AuditServiceError::Intelligence(
            IntelligenceError::Unavailable("backend offline".to_string()),
        ));
        assert_eq!(status_for(error), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unparseable_analysis_maps_to_bad_request() {
        let parse = serde_json::from_str::<Value>("{not json").expect_err("invalid json");
        assert_eq!(status_for(AppError::from(parse)), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_failures_map_to_internal_server_error() {
        let io = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        assert_eq!(status_for(io), StatusCode::INTERNAL_SERVER_ERROR);

        let unavailable = AppError::Audit(AuditServiceError::Repository(
            RepositoryError::Unavailable("pool exhausted".to_string()),
        ));
        assert_eq!(status_for(unavailable), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn error_bodies_carry_the_display_message() {
        let response =
            AppError::from(SchemaViolation::MissingSection("commercialSummary")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("collects body");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("commercialSummary"));
    }
}
