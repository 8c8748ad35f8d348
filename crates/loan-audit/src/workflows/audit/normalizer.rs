//! Maps the collaborator's loose JSON into the canonical [`AnalysisResult`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::classify::{classify_readiness, requires_review};
use super::domain::{
    AnalysisResult, ClauseAnalysis, CommercialSummary, DealReadiness, DocumentOverview,
    LmaComparison, RiskAssessment, RiskRating,
};
use super::payload::{
    ClausePayload, CommercialSummaryPayload, DealReadinessPayload, OverviewPayload,
    RiskAssessmentPayload,
};

/// Benchmark line used when the collaborator omits LMA context.
pub const DEFAULT_BENCHMARK: &str = "Market standard position.";
/// Impact line used when the collaborator omits commercial impact.
pub const DEFAULT_IMPACT: &str = "Review required for specific commercial impact.";

/// Raised when a required section of the inbound payload is missing or does
/// not deserialize into the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum SchemaViolation {
    #[error("analysis payload must be a JSON object")]
    NotAnObject,
    #[error("analysis payload is missing required section `{0}`")]
    MissingSection(&'static str),
    #[error("section `{section}` does not match the expected shape: {source}")]
    MalformedSection {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Build a canonical result from a raw collaborator payload.
///
/// All-or-nothing: a missing or misshapen required section aborts the whole
/// construction. Scores are clamped into [0, 100], the review flag and the
/// readiness status are recomputed rather than trusted, and the original
/// document text is attached verbatim, never re-parsed. Pure function of its
/// inputs.
pub fn normalize(raw: &Value, document_text: &str) -> Result<AnalysisResult, SchemaViolation> {
    let sections = raw.as_object().ok_or(SchemaViolation::NotAnObject)?;

    let overview: OverviewPayload = section(sections, "overview")?;
    let clauses: Vec<ClausePayload> = section(sections, "clauses")?;
    let readiness: DealReadinessPayload = section(sections, "dealReadiness")?;
    let risk: RiskAssessmentPayload = section(sections, "riskAssessment")?;
    let commercial: CommercialSummaryPayload = section(sections, "commercialSummary")?;

    Ok(AnalysisResult {
        overview: map_overview(overview),
        clauses: clauses.into_iter().map(map_clause).collect(),
        deal_readiness: map_readiness(readiness),
        risk_assessment: RiskAssessment {
            overall_rating: RiskRating::from_label(&risk.overall_rating),
            summary: risk.summary,
        },
        commercial_summary: CommercialSummary {
            snapshot: commercial.snapshot,
            highlights: commercial.highlights,
            risks: commercial.risks,
            next_actions: commercial.next_actions,
        },
        raw_text: document_text.to_string(),
    })
}

fn section<T: DeserializeOwned>(
    sections: &Map<String, Value>,
    name: &'static str,
) -> Result<T, SchemaViolation> {
    let value = sections
        .get(name)
        .ok_or(SchemaViolation::MissingSection(name))?;

    serde_json::from_value(value.clone())
        .map_err(|source| SchemaViolation::MalformedSection { section: name, source })
}

fn map_overview(raw: OverviewPayload) -> DocumentOverview {
    DocumentOverview {
        facility_type: raw.facility_type,
        borrower_lender: raw.borrower_lender,
        currency: raw.currency,
        amount: raw.amount,
        maturity: raw.maturity,
        governing_law: raw.law,
    }
}

/// Total mapping from a raw clause entry; every optional field has a default.
/// The deviation label doubles as the benchmark deviation note, so the
/// collaborator's classification survives even when no richer text exists.
fn map_clause(raw: ClausePayload) -> ClauseAnalysis {
    let review_required = requires_review(raw.confidence_score, &raw.market_deviation);

    ClauseAnalysis {
        name: raw.clause_name,
        summary: raw.extracted_text,
        confidence_score: clamp_score(raw.confidence_score),
        review_required,
        reason: raw.explanation,
        lma_comparison: LmaComparison {
            standard_benchmark: raw
                .lma_benchmark_context
                .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string()),
            deviations: raw.market_deviation,
            impact: raw
                .potential_impact
                .unwrap_or_else(|| DEFAULT_IMPACT.to_string()),
        },
    }
}

fn map_readiness(raw: DealReadinessPayload) -> DealReadiness {
    DealReadiness {
        score: clamp_score(raw.score),
        // The supplied status string is advisory; the stored status always
        // tracks the numeric score.
        status: classify_readiness(raw.score),
        drivers_positive: raw.drivers_positive,
        drivers_negative: raw.drivers_negative,
        key_issues: raw.key_issues,
        recommended_actions: raw.recommended_actions,
    }
}

fn clamp_score(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::audit::domain::ReadinessStatus;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "overview": {
                "facilityType": "Term Loan B",
                "borrowerLender": "Meridian Foods Ltd / Consortium led by Halton Bank",
                "currency": "EUR",
                "amount": "450,000,000",
                "maturity": "7 years from the Closing Date",
                "law": "England and Wales"
            },
            "clauses": [
                {
                    "clause_name": "Leverage Ratio",
                    "extracted_text": "Total Net Debt to EBITDA shall not exceed 3.5:1.",
                    "confidence_score": 91,
                    "market_deviation": "Standard",
                    "review_required": false,
                    "explanation": "Quarterly tested maintenance covenant with customary cure rights.",
                    "lma_benchmark_context": "LMA leveraged facilities set leverage maintenance at 3.5x-4.0x.",
                    "potential_impact": "Headroom consistent with base case projections."
                },
                {
                    "clause_name": "Events of Default",
                    "extracted_text": "",
                    "confidence_score": 58,
                    "market_deviation": "Aggressive",
                    "review_required": false,
                    "explanation": "Cross-default threshold could not be located in the provided text."
                }
            ],
            "dealReadiness": {
                "score": 72,
                "status": "Execution Ready",
                "driversPositive": ["Clean security package"],
                "driversNegative": ["Events of Default incomplete"],
                "keyIssues": ["Confirm cross-default threshold"],
                "recommendedActions": ["Request conformed copy of Clause 23"]
            },
            "riskAssessment": {
                "overallRating": "Medium",
                "summary": "Standard leveraged facility with one unresolved default trigger."
            },
            "commercialSummary": {
                "snapshot": "EUR 450m TLB for Meridian Foods, broadly on market terms.",
                "highlights": ["Margin ratchet within guidance"],
                "risks": ["Default mechanics unverified"],
                "nextActions": ["Circulate issues list to counsel"]
            }
        })
    }

    #[test]
    fn round_trips_document_text_verbatim() {
        let text = "THIS AGREEMENT is made on...\r\n  Clause 1.\tDefinitions";
        let result = normalize(&sample_payload(), text).expect("payload normalizes");
        assert_eq!(result.raw_text, text);
    }

    #[test]
    fn fills_benchmark_defaults_for_missing_optional_fields() {
        let result = normalize(&sample_payload(), "doc").expect("payload normalizes");
        let defaults = &result.clauses[1].lma_comparison;
        assert_eq!(defaults.standard_benchmark, DEFAULT_BENCHMARK);
        assert_eq!(defaults.deviations, "Aggressive");
        assert_eq!(defaults.impact, DEFAULT_IMPACT);

        let supplied = &result.clauses[0].lma_comparison;
        assert_eq!(
            supplied.standard_benchmark,
            "LMA leveraged facilities set leverage maintenance at 3.5x-4.0x."
        );
        assert_eq!(supplied.deviations, "Standard");
    }

    #[test]
    fn recomputes_review_flag_from_score_and_deviation() {
        let mut payload = sample_payload();
        payload["clauses"][0]["confidence_score"] = json!(60);
        payload["clauses"][0]["market_deviation"] = json!("Standard");
        payload["clauses"][0]["review_required"] = json!(false);

        let result = normalize(&payload, "doc").expect("payload normalizes");
        assert!(result.clauses[0].review_required);
        // Aggressive deviation keeps the second clause flagged even though
        // its supplied flag said otherwise.
        assert!(result.clauses[1].review_required);
    }

    #[test]
    fn recomputes_readiness_status_from_score() {
        let result = normalize(&sample_payload(), "doc").expect("payload normalizes");
        assert_eq!(result.deal_readiness.score, 72);
        assert_eq!(result.deal_readiness.status, ReadinessStatus::ReadyWithReview);
    }

    #[test]
    fn clamps_out_of_range_scores() {
        let mut payload = sample_payload();
        payload["clauses"][0]["confidence_score"] = json!(140);
        payload["dealReadiness"]["score"] = json!(-10);

        let result = normalize(&payload, "doc").expect("payload normalizes");
        assert_eq!(result.clauses[0].confidence_score, 100);
        assert_eq!(result.deal_readiness.score, 0);
        assert_eq!(
            result.deal_readiness.status,
            ReadinessStatus::NotExecutionReady
        );
    }

    #[test]
    fn coerces_unrecognized_risk_rating_to_medium() {
        let mut payload = sample_payload();
        payload["riskAssessment"]["overallRating"] = json!("Catastrophic");

        let result = normalize(&payload, "doc").expect("payload normalizes");
        assert_eq!(result.risk_assessment.overall_rating, RiskRating::Medium);
    }

    #[test]
    fn missing_section_aborts_normalization() {
        let mut payload = sample_payload();
        payload
            .as_object_mut()
            .expect("payload is an object")
            .remove("dealReadiness");

        let error = normalize(&payload, "doc").expect_err("normalization fails");
        assert!(matches!(
            error,
            SchemaViolation::MissingSection("dealReadiness")
        ));
    }

    #[test]
    fn misshapen_section_aborts_normalization() {
        let mut payload = sample_payload();
        payload["clauses"] = json!(17);

        let error = normalize(&payload, "doc").expect_err("normalization fails");
        assert!(matches!(
            error,
            SchemaViolation::MalformedSection { section: "clauses", .. }
        ));
    }

    #[test]
    fn rejects_non_object_payloads() {
        let error = normalize(&json!([1, 2, 3]), "doc").expect_err("normalization fails");
        assert!(matches!(error, SchemaViolation::NotAnObject));
    }
}
