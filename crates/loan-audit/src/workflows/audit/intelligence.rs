use serde_json::Value;

/// Boundary to the external document-intelligence model.
///
/// Implementations own transport, prompting, and retries; the audit engine
/// only ever sees the structured payload they return. Constructors take an
/// [`IntelligenceConfig`](crate::config::IntelligenceConfig) so nothing in
/// this module reads the environment.
pub trait DocumentIntelligence: Send + Sync {
    fn analyze(&self, document_text: &str) -> Result<Value, IntelligenceError>;
}

/// Failure surfaced by an intelligence implementation.
#[derive(Debug, thiserror::Error)]
pub enum IntelligenceError {
    #[error("document intelligence backend unavailable: {0}")]
    Unavailable(String),
    #[error("document intelligence returned an unusable response: {0}")]
    Malformed(String),
}
