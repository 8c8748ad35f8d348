use serde::{Deserialize, Serialize};

/// Identifier assigned to a stored audit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditId(pub String);

/// Headline commercial terms extracted from the agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOverview {
    pub facility_type: String,
    pub borrower_lender: String,
    pub currency: String,
    pub amount: String,
    pub maturity: String,
    pub governing_law: String,
}

/// Benchmark commentary attached to a clause. Absent sub-fields are filled
/// during normalization so rendering never branches on presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LmaComparison {
    pub standard_benchmark: String,
    pub deviations: String,
    pub impact: String,
}

/// One audited clause. An empty `summary` signals "not detected".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseAnalysis {
    pub name: String,
    pub summary: String,
    pub confidence_score: u8,
    pub review_required: bool,
    pub reason: String,
    pub lma_comparison: LmaComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealReadiness {
    pub score: u8,
    pub status: ReadinessStatus,
    pub drivers_positive: Vec<String>,
    pub drivers_negative: Vec<String>,
    pub key_issues: Vec<String>,
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_rating: RiskRating,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialSummary {
    pub snapshot: String,
    pub highlights: Vec<String>,
    pub risks: Vec<String>,
    pub next_actions: Vec<String>,
}

/// Canonical audit result. Constructed exactly once per normalized payload
/// and read-only afterwards; derived values (bands, slack) are never written
/// back into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overview: DocumentOverview,
    pub clauses: Vec<ClauseAnalysis>,
    pub deal_readiness: DealReadiness,
    pub risk_assessment: RiskAssessment,
    pub commercial_summary: CommercialSummary,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Moderate,
    Critical,
}

impl ConfidenceBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High Confidence",
            Self::Moderate => "Moderate Review",
            Self::Critical => "Critical / Low Confidence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    ExecutionReady,
    ReadyWithReview,
    NotExecutionReady,
}

impl ReadinessStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExecutionReady => "Execution Ready",
            Self::ReadyWithReview => "Ready with Review",
            Self::NotExecutionReady => "Not Execution Ready",
        }
    }
}

/// How far a clause sits from the standard market position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDeviation {
    Standard,
    SlightlyAggressive,
    Aggressive,
    NonStandard,
}

impl MarketDeviation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::SlightlyAggressive => "Slightly Aggressive",
            Self::Aggressive => "Aggressive",
            Self::NonStandard => "Non-Standard",
        }
    }

    /// Parse the collaborator's label. Matching is on the whole trimmed
    /// label; "Slightly Aggressive" must not read as "Aggressive".
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "slightly aggressive" => Some(Self::SlightlyAggressive),
            "aggressive" => Some(Self::Aggressive),
            "non-standard" | "nonstandard" | "non standard" | "aggressive/non-standard" => {
                Some(Self::NonStandard)
            }
            _ => None,
        }
    }

    pub const fn forces_review(self) -> bool {
        matches!(self, Self::Aggressive | Self::NonStandard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

impl RiskRating {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Coerce the collaborator's free-text rating into the closed set.
    /// Unrecognized or missing values resolve to `Medium`.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

/// Polarity of a financial covenant's contractual limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovenantType {
    Max,
    Min,
}

impl CovenantType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Max => "Ceiling",
            Self::Min => "Floor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_deviation_label_matching_is_exact() {
        assert_eq!(
            MarketDeviation::from_label(" Aggressive "),
            Some(MarketDeviation::Aggressive)
        );
        assert_eq!(
            MarketDeviation::from_label("Non-Standard"),
            Some(MarketDeviation::NonStandard)
        );
        assert_eq!(
            MarketDeviation::from_label("Slightly Aggressive"),
            Some(MarketDeviation::SlightlyAggressive)
        );
        assert_eq!(MarketDeviation::from_label("Borrower Friendly"), None);
        assert!(!MarketDeviation::SlightlyAggressive.forces_review());
        assert!(MarketDeviation::Aggressive.forces_review());
        assert!(MarketDeviation::NonStandard.forces_review());
    }

    #[test]
    fn risk_rating_defaults_to_medium() {
        assert_eq!(RiskRating::from_label("LOW"), RiskRating::Low);
        assert_eq!(RiskRating::from_label("High"), RiskRating::High);
        assert_eq!(RiskRating::from_label("Severe"), RiskRating::Medium);
        assert_eq!(RiskRating::from_label(""), RiskRating::Medium);
    }
}
