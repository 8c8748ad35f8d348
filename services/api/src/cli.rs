use crate::demo::{run_audit_report, run_demo, AuditReportArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_audit::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Audit Service",
    about = "Run and demonstrate the credit-agreement audit service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Audit a stored analysis and render the review report
    Audit {
        #[command(subcommand)]
        command: AuditCommand,
    },
    /// Run an end-to-end CLI demo over a canned facility agreement
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum AuditCommand {
    /// Build a review report from a document and its analysis payload
    Report(AuditReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Audit {
            command: AuditCommand::Report(args),
        } => run_audit_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
