//! Pure classification rules layered on top of the canonical model.
//!
//! Both classifiers are total over `i64`: scores arrive from a probabilistic
//! collaborator and must never crash the audit flow, so anything below the
//! lowest threshold falls through to the lowest band.

use super::domain::{ConfidenceBand, MarketDeviation, ReadinessStatus};

/// Confidence below this always flags a clause for human review.
pub const REVIEW_SCORE_FLOOR: i64 = 75;

pub const fn classify_confidence(score: i64) -> ConfidenceBand {
    if score >= 85 {
        ConfidenceBand::High
    } else if score >= 70 {
        ConfidenceBand::Moderate
    } else {
        ConfidenceBand::Critical
    }
}

pub const fn classify_readiness(score: i64) -> ReadinessStatus {
    if score >= 85 {
        ReadinessStatus::ExecutionReady
    } else if score >= 70 {
        ReadinessStatus::ReadyWithReview
    } else {
        ReadinessStatus::NotExecutionReady
    }
}

/// Review rule enforced regardless of what the collaborator claimed: low
/// confidence or an aggressive market position flags the clause. A label
/// outside the known deviation vocabulary does not force review on its own.
pub fn requires_review(confidence_score: i64, market_deviation: &str) -> bool {
    if confidence_score < REVIEW_SCORE_FLOOR {
        return true;
    }

    MarketDeviation::from_label(market_deviation)
        .map_or(false, |deviation| deviation.forces_review())
}
