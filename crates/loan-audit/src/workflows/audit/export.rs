//! CSV export of the clause audit table.

use super::domain::ClauseAnalysis;

/// Column order is part of the export contract with downstream spreadsheets.
const CSV_HEADER: [&str; 8] = [
    "Clause Name",
    "Confidence Score",
    "Review Required",
    "Provision Summary",
    "Audit Logic",
    "Market Standard Context",
    "Deviation Analysis",
    "Counterparty Impact",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("exported CSV was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize the clause table in display order. Embedded delimiters and
/// quotes are escaped by standard CSV quote doubling.
pub fn clauses_to_csv(clauses: &[ClauseAnalysis]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();

    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(CSV_HEADER)?;

        for clause in clauses {
            let score = clause.confidence_score.to_string();
            let review = if clause.review_required { "Yes" } else { "No" };
            writer.write_record([
                clause.name.as_str(),
                score.as_str(),
                review,
                clause.summary.as_str(),
                clause.reason.as_str(),
                clause.lma_comparison.standard_benchmark.as_str(),
                clause.lma_comparison.deviations.as_str(),
                clause.lma_comparison.impact.as_str(),
            ])?;
        }

        writer.flush()?;
    }

    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::audit::domain::LmaComparison;

    fn clause(name: &str, summary: &str) -> ClauseAnalysis {
        ClauseAnalysis {
            name: name.to_string(),
            summary: summary.to_string(),
            confidence_score: 88,
            review_required: true,
            reason: "Tested against the market standard form.".to_string(),
            lma_comparison: LmaComparison {
                standard_benchmark: "LMA standard position".to_string(),
                deviations: "Standard".to_string(),
                impact: "None noted".to_string(),
            },
        }
    }

    #[test]
    fn writes_header_and_field_order() {
        let csv = clauses_to_csv(&[clause("Leverage Ratio", "Net Debt/EBITDA <= 3.5x")])
            .expect("export succeeds");
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some(
                "Clause Name,Confidence Score,Review Required,Provision Summary,Audit Logic,\
                 Market Standard Context,Deviation Analysis,Counterparty Impact"
            )
        );
        assert_eq!(
            lines.next(),
            Some(
                "Leverage Ratio,88,Yes,Net Debt/EBITDA <= 3.5x,\
                 Tested against the market standard form.,LMA standard position,Standard,None noted"
            )
        );
    }

    #[test]
    fn doubles_embedded_quotes_and_round_trips() {
        let tricky = r#"The "Majority Lenders", being 66.67%, may waive"#;
        let csv = clauses_to_csv(&[clause("Waivers, Amendments", tricky)]).expect("export succeeds");

        assert!(csv.contains(r#""The ""Majority Lenders"", being 66.67%, may waive""#));
        assert!(csv.contains(r#""Waivers, Amendments""#));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader
            .records()
            .next()
            .expect("one data row")
            .expect("row parses");
        assert_eq!(&record[0], "Waivers, Amendments");
        assert_eq!(&record[3], tricky);
    }

    #[test]
    fn empty_clause_table_still_exports_header() {
        let csv = clauses_to_csv(&[]).expect("export succeeds");
        assert_eq!(csv.lines().count(), 1);
    }
}
