//! Wire contract expected from the document-intelligence collaborator.
//!
//! Field spelling mirrors the payload the extraction model is prompted to
//! return: camelCase section keys, snake_case keys inside each clause entry.
//! Unknown extra fields are ignored; missing required fields surface as a
//! schema violation during normalization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub overview: OverviewPayload,
    pub clauses: Vec<ClausePayload>,
    #[serde(rename = "dealReadiness")]
    pub deal_readiness: DealReadinessPayload,
    #[serde(rename = "riskAssessment")]
    pub risk_assessment: RiskAssessmentPayload,
    #[serde(rename = "commercialSummary")]
    pub commercial_summary: CommercialSummaryPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewPayload {
    pub facility_type: String,
    pub borrower_lender: String,
    pub currency: String,
    pub amount: String,
    pub maturity: String,
    pub law: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClausePayload {
    pub clause_name: String,
    pub extracted_text: String,
    pub confidence_score: i64,
    pub market_deviation: String,
    pub review_required: bool,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lma_benchmark_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_impact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealReadinessPayload {
    pub score: i64,
    /// Advisory only; the stored status is recomputed from `score`.
    pub status: String,
    pub drivers_positive: Vec<String>,
    pub drivers_negative: Vec<String>,
    pub key_issues: Vec<String>,
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessmentPayload {
    pub overall_rating: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialSummaryPayload {
    pub snapshot: String,
    pub highlights: Vec<String>,
    pub risks: Vec<String>,
    pub next_actions: Vec<String>,
}
