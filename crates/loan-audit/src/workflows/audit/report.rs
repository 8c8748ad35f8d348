//! Serializable projections of a stored audit for API and CLI consumers.
//! Views carry presentation fields only; the raw document text stays on the
//! record.

use chrono::NaiveDate;
use serde::Serialize;

use super::classify::classify_confidence;
use super::covenants::extract_covenants;
use super::domain::{
    AuditId, ClauseAnalysis, CommercialSummary, ConfidenceBand, DocumentOverview, ReadinessStatus,
    RiskRating,
};
use super::repository::AuditRecord;

#[derive(Debug, Clone, Serialize)]
pub struct ClauseAuditView {
    pub name: String,
    pub summary: String,
    pub confidence_score: u8,
    pub confidence_band: ConfidenceBand,
    pub confidence_label: &'static str,
    pub review_required: bool,
    pub reason: String,
    pub standard_benchmark: String,
    pub deviations: String,
    pub impact: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessView {
    pub score: u8,
    pub status: ReadinessStatus,
    pub status_label: &'static str,
    pub drivers_positive: Vec<String>,
    pub drivers_negative: Vec<String>,
    pub key_issues: Vec<String>,
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskView {
    pub overall_rating: RiskRating,
    pub rating_label: &'static str,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReportView {
    pub audit_id: AuditId,
    pub analyzed_on: NaiveDate,
    pub overview: DocumentOverview,
    pub clauses: Vec<ClauseAuditView>,
    pub readiness: ReadinessView,
    pub risk: RiskView,
    pub commercial_summary: CommercialSummary,
    pub covenant_candidates: Vec<String>,
}

fn clause_view(clause: &ClauseAnalysis) -> ClauseAuditView {
    let band = classify_confidence(i64::from(clause.confidence_score));

    ClauseAuditView {
        name: clause.name.clone(),
        summary: clause.summary.clone(),
        confidence_score: clause.confidence_score,
        confidence_band: band,
        confidence_label: band.label(),
        review_required: clause.review_required,
        reason: clause.reason.clone(),
        standard_benchmark: clause.lma_comparison.standard_benchmark.clone(),
        deviations: clause.lma_comparison.deviations.clone(),
        impact: clause.lma_comparison.impact.clone(),
    }
}

impl AuditRecord {
    pub fn report_view(&self) -> AuditReportView {
        let readiness = &self.result.deal_readiness;
        let risk = &self.result.risk_assessment;

        let covenant_candidates = extract_covenants(&self.result.clauses)
            .into_iter()
            .map(|clause| clause.name.clone())
            .collect();

        AuditReportView {
            audit_id: self.audit_id.clone(),
            analyzed_on: self.analyzed_on,
            overview: self.result.overview.clone(),
            clauses: self.result.clauses.iter().map(clause_view).collect(),
            readiness: ReadinessView {
                score: readiness.score,
                status: readiness.status,
                status_label: readiness.status.label(),
                drivers_positive: readiness.drivers_positive.clone(),
                drivers_negative: readiness.drivers_negative.clone(),
                key_issues: readiness.key_issues.clone(),
                recommended_actions: readiness.recommended_actions.clone(),
            },
            risk: RiskView {
                overall_rating: risk.overall_rating,
                rating_label: risk.overall_rating.label(),
                summary: risk.summary.clone(),
            },
            commercial_summary: self.result.commercial_summary.clone(),
            covenant_candidates,
        }
    }
}
