//! Financial-covenant detection and headroom ("slack") math.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use super::domain::{ClauseAnalysis, CovenantType};

/// Substring markers identifying covenant-like clause names.
const COVENANT_MARKERS: [&str; 3] = ["covenant", "leverage", "ratio"];

static POLARITY_MAP: OnceLock<HashMap<String, CovenantType>> = OnceLock::new();

fn polarity_map() -> &'static HashMap<String, CovenantType> {
    POLARITY_MAP.get_or_init(|| {
        const NAME_TO_POLARITY: &[(&str, CovenantType)] = &[
            // Ceiling covenants: breach when the actual exceeds the limit.
            ("leverage ratio", CovenantType::Max),
            ("leverage covenant", CovenantType::Max),
            ("net leverage ratio", CovenantType::Max),
            ("total net leverage ratio", CovenantType::Max),
            ("senior leverage ratio", CovenantType::Max),
            ("debt to ebitda", CovenantType::Max),
            ("net debt to ebitda", CovenantType::Max),
            ("debt/ebitda", CovenantType::Max),
            ("loan to value ratio", CovenantType::Max),
            ("ltv ratio", CovenantType::Max),
            ("capital expenditure covenant", CovenantType::Max),
            // Floor covenants: breach when the actual falls below the limit.
            ("interest cover ratio", CovenantType::Min),
            ("interest coverage ratio", CovenantType::Min),
            ("fixed charge coverage ratio", CovenantType::Min),
            ("debt service coverage ratio", CovenantType::Min),
            ("dscr", CovenantType::Min),
            ("cashflow cover ratio", CovenantType::Min),
            ("tangible net worth covenant", CovenantType::Min),
            ("minimum liquidity covenant", CovenantType::Min),
        ];

        let mut map = HashMap::with_capacity(NAME_TO_POLARITY.len());
        for (name, polarity) in NAME_TO_POLARITY {
            map.insert(normalized_name(name), *polarity);
        }
        map
    })
}

fn normalized_name(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Heuristic covenant detection by clause name. Over-selection is accepted
/// (a clause like "Ratio of Voting Rights" matches); the slack calculator is
/// additionally gated on the caller supplying numeric inputs.
pub fn is_covenant_candidate(name: &str) -> bool {
    let normalized = normalized_name(name);
    COVENANT_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Filter a clause set down to its covenant candidates, preserving order.
pub fn extract_covenants(clauses: &[ClauseAnalysis]) -> Vec<&ClauseAnalysis> {
    clauses
        .iter()
        .filter(|clause| is_covenant_candidate(&clause.name))
        .collect()
}

/// Resolve covenant polarity from the clause name.
///
/// Known names resolve through the lookup table. Unmapped names fall back to
/// substrings with coverage markers checked before ceiling markers, so a name
/// like "Debt Service Cover Test" stays a floor covenant despite containing
/// "debt". Anything left resolves to a floor.
pub fn covenant_type_for(clause_name: &str) -> CovenantType {
    let normalized = normalized_name(clause_name);
    if let Some(polarity) = polarity_map().get(&normalized) {
        return *polarity;
    }

    if normalized.contains("cover") {
        return CovenantType::Min;
    }
    if normalized.contains("leverage")
        || normalized.contains("debt")
        || normalized.contains("gearing")
    {
        return CovenantType::Max;
    }

    CovenantType::Min
}

/// Headroom between a covenant's contractual limit and the current actual.
/// Derived on demand and never written back into the analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlackCalculation {
    pub limit: f64,
    pub actual: f64,
    pub covenant_type: CovenantType,
    pub slack: f64,
    /// `None` when the denominator is zero; serialized as an explicit null.
    pub percentage: Option<f64>,
    pub is_safe: bool,
}

/// Compute covenant headroom from free-form limit/actual inputs.
///
/// Returns `None` when either input fails to parse so callers can render a
/// neutral "enter values" state instead of an error. Zero slack is compliant;
/// a zero denominator leaves the percentage undefined rather than raising.
pub fn compute_slack(
    limit_text: &str,
    actual_text: &str,
    clause_name: &str,
) -> Option<SlackCalculation> {
    let limit = parse_decimal(limit_text)?;
    let actual = parse_decimal(actual_text)?;
    let covenant_type = covenant_type_for(clause_name);

    let (slack, denominator) = match covenant_type {
        CovenantType::Max => (limit - actual, limit),
        CovenantType::Min => (actual - limit, actual),
    };

    let percentage = if denominator == 0.0 {
        None
    } else {
        Some(slack / denominator * 100.0)
    };

    Some(SlackCalculation {
        limit,
        actual,
        covenant_type,
        slack,
        percentage,
        is_safe: slack >= 0.0,
    })
}

/// Parse a free-form numeric field. Tolerates surrounding whitespace,
/// thousands separators, and a trailing `x` or `%` unit; non-finite values
/// count as parse failures.
fn parse_decimal(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace(',', "");
    let cleaned = cleaned.trim_end_matches(&['x', 'X', '%'][..]).trim_end();
    if cleaned.is_empty() {
        return None;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::audit::domain::LmaComparison;

    fn clause(name: &str) -> ClauseAnalysis {
        ClauseAnalysis {
            name: name.to_string(),
            summary: String::new(),
            confidence_score: 80,
            review_required: false,
            reason: "test clause".to_string(),
            lma_comparison: LmaComparison {
                standard_benchmark: String::new(),
                deviations: String::new(),
                impact: String::new(),
            },
        }
    }

    fn assert_close(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "{left} != {right}");
    }

    #[test]
    fn extracts_covenant_candidates_by_name() {
        let clauses = vec![
            clause("Financial Covenants"),
            clause("Events of Default"),
            clause("Leverage Ratio"),
            clause("Governing Law"),
        ];

        let candidates = extract_covenants(&clauses);
        let names: Vec<&str> = candidates
            .iter()
            .map(|clause| clause.name.as_str())
            .collect();
        assert_eq!(names, vec!["Financial Covenants", "Leverage Ratio"]);
    }

    #[test]
    fn candidate_matching_is_case_insensitive_and_over_selects() {
        assert!(is_covenant_candidate("NET LEVERAGE"));
        assert!(is_covenant_candidate("Interest Cover Ratio"));
        // Accepted false positive of the substring heuristic.
        assert!(is_covenant_candidate("Ratio of Voting Rights"));
        assert!(!is_covenant_candidate("Conditions Precedent"));
    }

    #[test]
    fn ceiling_covenant_slack() {
        let calc = compute_slack("3.5", "2.1", "Leverage Ratio").expect("inputs parse");
        assert_eq!(calc.covenant_type, CovenantType::Max);
        assert_close(calc.slack, 1.4);
        assert_close(calc.percentage.expect("denominator nonzero"), 40.0);
        assert!(calc.is_safe);
    }

    #[test]
    fn ceiling_breach_reports_negative_slack() {
        let calc = compute_slack("3.5", "4.0", "Leverage Ratio").expect("inputs parse");
        assert_eq!(calc.covenant_type, CovenantType::Max);
        assert_close(calc.slack, -0.5);
        assert!(!calc.is_safe);
    }

    #[test]
    fn floor_covenant_slack() {
        let calc = compute_slack("2.0", "2.5", "Interest Cover Ratio").expect("inputs parse");
        assert_eq!(calc.covenant_type, CovenantType::Min);
        assert_close(calc.slack, 0.5);
        assert_close(calc.percentage.expect("denominator nonzero"), 20.0);
        assert!(calc.is_safe);
    }

    #[test]
    fn exactly_at_the_limit_is_compliant() {
        let calc = compute_slack("3.5", "3.5", "Leverage Ratio").expect("inputs parse");
        assert_close(calc.slack, 0.0);
        assert!(calc.is_safe);
    }

    #[test]
    fn unparseable_input_yields_no_calculation() {
        assert!(compute_slack("abc", "2.1", "Leverage Ratio").is_none());
        assert!(compute_slack("3.5", "", "Leverage Ratio").is_none());
        assert!(compute_slack("inf", "2.1", "Leverage Ratio").is_none());
    }

    #[test]
    fn tolerates_units_and_separators() {
        let calc = compute_slack(" 3.5x ", "2,100%", "Leverage Ratio").expect("inputs parse");
        assert_close(calc.limit, 3.5);
        assert_close(calc.actual, 2100.0);
    }

    #[test]
    fn zero_denominator_leaves_percentage_undefined() {
        let ceiling = compute_slack("0", "1.0", "Leverage Ratio").expect("inputs parse");
        assert_eq!(ceiling.percentage, None);
        assert!(!ceiling.is_safe);

        let floor = compute_slack("2.0", "0", "Interest Cover Ratio").expect("inputs parse");
        assert_eq!(floor.percentage, None);
        assert!(!floor.is_safe);
    }

    #[test]
    fn compute_slack_is_idempotent() {
        let first = compute_slack("3.5", "2.1", "Leverage Ratio");
        let second = compute_slack("3.5", "2.1", "Leverage Ratio");
        assert_eq!(first, second);
    }

    #[test]
    fn coverage_wins_over_debt_for_ambiguous_names() {
        assert_eq!(
            covenant_type_for("Debt Service Coverage Ratio"),
            CovenantType::Min
        );
        assert_eq!(covenant_type_for("Debt Service Cover Test"), CovenantType::Min);
        assert_eq!(covenant_type_for("Net Debt Cap"), CovenantType::Max);
        assert_eq!(covenant_type_for("Gearing Ratio"), CovenantType::Max);
        assert_eq!(covenant_type_for("Tangible Net Worth"), CovenantType::Min);
    }
}
