//! Credit-agreement audit workflow.
//!
//! The pipeline is: raw document text plus a structured payload from the
//! document-intelligence collaborator, normalized into a canonical
//! [`AnalysisResult`], then classified (confidence bands, deal readiness,
//! review flags) and mined for covenant headroom on demand. Normalization is
//! all-or-nothing; every derived value is recomputed here rather than
//! trusted from the collaborator.

pub mod classify;
pub mod covenants;
pub mod domain;
pub mod export;
pub mod intelligence;
pub mod normalizer;
pub mod payload;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

pub use classify::{
    classify_confidence, classify_readiness, requires_review, REVIEW_SCORE_FLOOR,
};
pub use covenants::{
    compute_slack, covenant_type_for, extract_covenants, is_covenant_candidate, SlackCalculation,
};
pub use domain::{
    AnalysisResult, AuditId, ClauseAnalysis, CommercialSummary, ConfidenceBand, CovenantType,
    DealReadiness, DocumentOverview, LmaComparison, MarketDeviation, ReadinessStatus,
    RiskAssessment, RiskRating,
};
pub use export::{clauses_to_csv, ExportError};
pub use intelligence::{DocumentIntelligence, IntelligenceError};
pub use normalizer::{normalize, SchemaViolation, DEFAULT_BENCHMARK, DEFAULT_IMPACT};
pub use payload::{
    AnalysisPayload, ClausePayload, CommercialSummaryPayload, DealReadinessPayload,
    OverviewPayload, RiskAssessmentPayload,
};
pub use report::{AuditReportView, ClauseAuditView, ReadinessView, RiskView};
pub use repository::{AuditRecord, AuditRepository, RepositoryError};
pub use router::{audit_router, AuditSubmission, SlackRequest};
pub use service::{AuditServiceError, LoanAuditService};
