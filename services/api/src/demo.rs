use crate::infra::{InMemoryAuditRepository, UnconfiguredIntelligence};
use chrono::{Local, NaiveDate};
use clap::Args;
use loan_audit::config::IntelligenceConfig;
use loan_audit::error::AppError;
use loan_audit::workflows::audit::{AuditRecord, LoanAuditService, SlackCalculation};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the audit date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) analyzed_on: Option<NaiveDate>,
    /// Include the full clause-by-clause table in the output.
    #[arg(long)]
    pub(crate) list_clauses: bool,
    /// Skip the covenant headroom portion of the demo.
    #[arg(long)]
    pub(crate) skip_slack: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AuditReportArgs {
    /// Path to the agreement text to attach to the audit
    #[arg(long)]
    pub(crate) document: PathBuf,
    /// Path to the JSON analysis payload produced by the extraction model
    #[arg(long)]
    pub(crate) analysis: PathBuf,
    /// Write the clause table as CSV to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Audit date for the stored record (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) analyzed_on: Option<NaiveDate>,
    /// Include the full clause-by-clause table in the output
    #[arg(long)]
    pub(crate) list_clauses: bool,
}

pub(crate) fn run_audit_report(args: AuditReportArgs) -> Result<(), AppError> {
    let AuditReportArgs {
        document,
        analysis,
        csv,
        analyzed_on,
        list_clauses,
    } = args;

    let document_text = std::fs::read_to_string(&document)?;
    let raw_analysis = std::fs::read_to_string(&analysis)?;
    let payload: Value = serde_json::from_str(&raw_analysis)?;

    let analyzed_on = analyzed_on.unwrap_or_else(|| Local::now().date_naive());
    let service = build_local_service();
    let record = service.audit_with_payload(&document_text, &payload, analyzed_on)?;

    render_audit_report(&record, list_clauses);

    if let Some(path) = csv {
        let table = service.export_csv(&record.audit_id)?;
        std::fs::write(&path, table)?;
        println!("\nClause table written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        analyzed_on,
        list_clauses,
        skip_slack,
    } = args;

    let analyzed_on = analyzed_on.unwrap_or_else(|| Local::now().date_naive());

    println!("Loan audit demo");
    let service = build_local_service();
    let payload = demo_analysis_payload();
    let record = match service.audit_with_payload(demo_document_text(), &payload, analyzed_on) {
        Ok(record) => record,
        Err(err) => {
            println!("  Audit rejected: {}", err);
            return Ok(());
        }
    };

    render_audit_report(&record, list_clauses);

    if !skip_slack {
        println!("\nCovenant headroom walkthrough");
        let scenarios = [
            ("Financial Covenants - Leverage Ratio", "3.75x", "3.10x"),
            ("Financial Covenants - Leverage Ratio", "3.75x", "4.20x"),
            ("Interest Cover Ratio", "2.00x", "2.60x"),
            ("Interest Cover Ratio", "tbc", "2.60x"),
        ];
        for (clause, limit, actual) in scenarios {
            match service.covenant_slack(&record.audit_id, clause, limit, actual) {
                Ok(Some(calc)) => render_slack_line(clause, limit, actual, &calc),
                Ok(None) => println!(
                    "- {clause}: limit {limit} / actual {actual} -> inputs are not numeric, \
                     no calculation"
                ),
                Err(err) => println!("- {clause}: {err}"),
            }
        }
    }

    match service.export_csv(&record.audit_id) {
        Ok(table) => {
            println!("\nCSV preview");
            for line in table.lines().take(3) {
                println!("  {line}");
            }
        }
        Err(err) => println!("\nCSV export unavailable: {}", err),
    }

    Ok(())
}

fn build_local_service() -> Arc<LoanAuditService<InMemoryAuditRepository, UnconfiguredIntelligence>>
{
    let repository = Arc::new(InMemoryAuditRepository::default());
    let intelligence = Arc::new(UnconfiguredIntelligence::from_config(
        &IntelligenceConfig::default(),
    ));
    Arc::new(LoanAuditService::new(repository, intelligence))
}

fn render_slack_line(clause: &str, limit: &str, actual: &str, calc: &SlackCalculation) {
    let headroom = match calc.percentage {
        Some(pct) => format!("{pct:.1}% headroom"),
        None => "headroom not expressible".to_string(),
    };
    let verdict = if calc.is_safe { "compliant" } else { "BREACH" };
    println!(
        "- {clause} ({}) limit {limit} / actual {actual} -> slack {:.2}, {headroom}, {verdict}",
        calc.covenant_type.label(),
        calc.slack,
    );
}

pub(crate) fn render_audit_report(record: &AuditRecord, list_clauses: bool) {
    let report = record.report_view();

    println!(
        "Audit {} (analyzed {})",
        report.audit_id.0, report.analyzed_on
    );
    println!("\nOverview");
    println!("- Facility: {}", report.overview.facility_type);
    println!("- Parties: {}", report.overview.borrower_lender);
    println!(
        "- Size: {} {}",
        report.overview.currency, report.overview.amount
    );
    println!("- Maturity: {}", report.overview.maturity);
    println!("- Governing law: {}", report.overview.governing_law);

    println!(
        "\nDeal readiness: {}/100 ({})",
        report.readiness.score, report.readiness.status_label
    );
    for driver in &report.readiness.drivers_positive {
        println!("  + {}", driver);
    }
    for driver in &report.readiness.drivers_negative {
        println!("  - {}", driver);
    }
    if !report.readiness.key_issues.is_empty() {
        println!("  Key issues:");
        for issue in &report.readiness.key_issues {
            println!("    - {}", issue);
        }
    }
    if !report.readiness.recommended_actions.is_empty() {
        println!("  Recommended actions:");
        for action in &report.readiness.recommended_actions {
            println!("    - {}", action);
        }
    }

    println!(
        "\nRisk assessment: {} - {}",
        report.risk.rating_label, report.risk.summary
    );

    println!("\nCommercial snapshot: {}", report.commercial_summary.snapshot);
    for highlight in &report.commercial_summary.highlights {
        println!("  + {}", highlight);
    }
    for risk in &report.commercial_summary.risks {
        println!("  ! {}", risk);
    }
    for action in &report.commercial_summary.next_actions {
        println!("  > {}", action);
    }

    let flagged: Vec<_> = report
        .clauses
        .iter()
        .filter(|clause| clause.review_required)
        .collect();
    if flagged.is_empty() {
        println!("\nClauses requiring review: none");
    } else {
        println!(
            "\nClauses requiring review ({} of {})",
            flagged.len(),
            report.clauses.len()
        );
        for clause in flagged {
            println!(
                "- {} (confidence {}, {}): {}",
                clause.name, clause.confidence_score, clause.confidence_label, clause.reason
            );
        }
    }

    if report.covenant_candidates.is_empty() {
        println!("\nCovenant candidates: none detected");
    } else {
        println!(
            "\nCovenant candidates: {}",
            report.covenant_candidates.join(", ")
        );
    }

    if list_clauses {
        println!("\nClause table");
        for clause in &report.clauses {
            let review = if clause.review_required { "Yes" } else { "No" };
            println!(
                "- {} | confidence {} ({}) | review {}",
                clause.name, clause.confidence_score, clause.confidence_label, review
            );
            if !clause.summary.is_empty() {
                println!("    {}", clause.summary);
            }
            println!("    Benchmark: {}", clause.standard_benchmark);
            println!("    Deviations: {}", clause.deviations);
            println!("    Impact: {}", clause.impact);
        }
    }
}

fn demo_document_text() -> &'static str {
    "THIS SENIOR FACILITIES AGREEMENT is dated 3 June 2026 and made between \
     Harborview Logistics plc as the Company and Castlegate Bank plc as Agent \
     of the other Finance Parties.\n\n\
     Clause 3. Purpose: the Borrower shall apply all amounts borrowed by it \
     towards refinancing Existing Indebtedness and general corporate purposes.\n\n\
     Clause 21. Financial Covenants: the Company shall ensure that Leverage in \
     respect of any Relevant Period does not exceed 3.75:1 and that Interest \
     Cover is not less than 2.00:1.\n\n\
     Clause 22. Negative Pledge: no Obligor shall create or permit to subsist \
     any Security over any of its assets, subject to the Permitted Security \
     carve-outs listed in Schedule 9."
}

fn demo_analysis_payload() -> Value {
    serde_json::json!({
        "overview": {
            "facilityType": "Senior Secured Term and Revolving Facilities",
            "borrowerLender": "Harborview Logistics plc / Syndicate led by Castlegate Bank",
            "currency": "GBP",
            "amount": "320,000,000",
            "maturity": "5 years from Signing",
            "law": "England and Wales"
        },
        "clauses": [
            {
                "clause_name": "Purpose and Utilisation",
                "extracted_text": "Proceeds applied to refinancing and general corporate purposes.",
                "confidence_score": 97,
                "market_deviation": "Standard",
                "review_required": false,
                "explanation": "Standard purpose clause with no restricted-payment leakage."
            },
            {
                "clause_name": "Financial Covenants - Leverage Ratio",
                "extracted_text": "Leverage shall not exceed 3.75:1 for any Relevant Period.",
                "confidence_score": 88,
                "market_deviation": "Standard",
                "review_required": false,
                "explanation": "Quarterly maintenance test with customary equity cure rights.",
                "lma_benchmark_context": "Leveraged facilities typically set opening leverage between 3.5x and 4.0x.",
                "potential_impact": "Headroom of roughly half a turn against the sponsor base case."
            },
            {
                "clause_name": "Interest Cover Ratio",
                "extracted_text": "Interest Cover shall not be less than 2.00:1.",
                "confidence_score": 82,
                "market_deviation": "Slightly Aggressive",
                "review_required": false,
                "explanation": "Floor sits at the tight end of the customary 2.0x-2.5x range.",
                "lma_benchmark_context": "Interest cover floors usually open at 2.25x for this rating band."
            },
            {
                "clause_name": "Negative Pledge",
                "extracted_text": "No Obligor shall create Security outside the Permitted Security basket.",
                "confidence_score": 74,
                "market_deviation": "Standard",
                "review_required": false,
                "explanation": "Schedule 9 carve-outs were only partially legible in the scanned copy."
            },
            {
                "clause_name": "Events of Default",
                "extracted_text": "",
                "confidence_score": 54,
                "market_deviation": "Non-Standard",
                "review_required": false,
                "explanation": "Cross-default threshold and cure periods could not be extracted."
            }
        ],
        "dealReadiness": {
            "score": 77,
            "status": "Execution Ready",
            "driversPositive": [
                "Security package complete",
                "Pricing within current market guidance"
            ],
            "driversNegative": [
                "Events of Default section unresolved",
                "Negative pledge carve-outs unverified"
            ],
            "keyIssues": [
                "Confirm cross-default threshold with counsel"
            ],
            "recommendedActions": [
                "Obtain a conformed copy of Clause 23",
                "Re-run extraction once the executed version arrives"
            ]
        },
        "riskAssessment": {
            "overallRating": "Medium",
            "summary": "Broadly market-standard terms with one unresolved default trigger."
        },
        "commercialSummary": {
            "snapshot": "GBP 320m senior facilities for Harborview Logistics, on market terms bar the default mechanics.",
            "highlights": [
                "Covenant headroom consistent with the base case",
                "No unusual mandatory prepayment sweeps"
            ],
            "risks": [
                "Default mechanics unverified against the executed version"
            ],
            "nextActions": [
                "Circulate the open-issues list to counsel"
            ]
        }
    })
}
