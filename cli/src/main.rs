//! CLI for the issue cloner.
//!
//! Searches a Jira-compatible tracker by JQL and clones the matching issues
//! into a target project, printing per-issue progress and keeping a local
//! clone history database.

use clap::{Args, Parser, Subcommand};
use issue_cloner::{
    ApiError, ClientConfig, ClientConfigError, CloneOrchestrator, CloneOutcome, CloneReport,
    CloneRequest, HistoryLedger, Issue, IssueService, JiraClient, LedgerError, ProgressEvent,
    Project, RunError, SqliteLedger,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Issue Cloner - copy issues between tracker projects, links included.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the local clone history database.
    #[arg(long, env = "ISSUE_CLONER_DB", default_value = "clone-history.db", global = true)]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search issues by JQL and clone them into a target project.
    Clone(CloneArgs),

    /// Inspect or clear the local clone history.
    History {
        /// Emit JSON instead of a table when listing.
        #[arg(long)]
        json: bool,

        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Show the per-issue results of one past operation.
    Show {
        /// Operation id from `history`.
        operation_id: String,
    },

    /// Delete all recorded clone history.
    Reset,
}

#[derive(Args, Debug)]
struct CloneArgs {
    /// Base URL of the tracker, e.g. https://example.atlassian.net.
    #[arg(long, env = "JIRA_BASE_URL")]
    base_url: String,

    /// Account email for basic auth.
    #[arg(long, env = "JIRA_EMAIL")]
    email: String,

    /// API token for basic auth.
    #[arg(long, env = "JIRA_API_TOKEN")]
    api_token: String,

    /// JQL selecting the issues to clone (a bare issue key also works).
    #[arg(long)]
    jql: String,

    /// Key of the project receiving the copies, e.g. "PD".
    #[arg(long)]
    target_project: String,

    /// Tracker id of the target project; resolved from the key when omitted.
    #[arg(long)]
    target_project_id: Option<String>,

    /// Preview what would be cloned without creating anything.
    #[arg(long)]
    dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    yes: bool,
}

/// Errors surfaced at the CLI boundary.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read confirmation: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(had_failures) => {
            if had_failures {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Dispatches one subcommand. Returns whether any per-issue failures
/// occurred, for the exit code.
async fn run(cli: Cli) -> Result<bool, CliError> {
    match cli.command {
        Command::Clone(args) => run_clone(&cli.db_path, args).await,
        Command::History { json, action } => {
            let ledger = SqliteLedger::open(&cli.db_path)?;
            match action {
                None => print_history(&ledger, json)?,
                Some(HistoryAction::Show { operation_id }) => {
                    print_results(&ledger, &operation_id)?;
                }
                Some(HistoryAction::Reset) => {
                    ledger.reset_all()?;
                    println!("Clone history cleared.");
                }
            }
            Ok(false)
        }
    }
}

async fn run_clone(db_path: &PathBuf, args: CloneArgs) -> Result<bool, CliError> {
    let client = JiraClient::new(ClientConfig {
        base_url: args.base_url,
        email: args.email,
        api_token: args.api_token,
    })?;

    let issues = client.search_issues(&args.jql).await?;
    if issues.is_empty() {
        println!("No issues matched the query.");
        return Ok(false);
    }

    let target_project = match args.target_project_id {
        Some(id) => Project::new(id, args.target_project.clone(), args.target_project.clone()),
        None => client.get_project(&args.target_project).await?,
    };

    if args.dry_run {
        print_dry_run_preview(&issues, &target_project);
        return Ok(false);
    }

    if !args.yes && !confirm_clone(issues.len(), &target_project.key)? {
        println!("Aborted.");
        return Ok(false);
    }

    let ledger = Arc::new(SqliteLedger::open(db_path)?);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = CloneOrchestrator::new(Arc::new(client), ledger.clone(), ledger)
        .with_progress(tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_progress(&event);
        }
    });

    let report = orchestrator
        .run(CloneRequest {
            issues,
            target_project,
            query: Some(args.jql),
        })
        .await?;

    // Sender dropped with the orchestrator; drain the printer.
    let _ = printer.await;
    print_report(&report);
    Ok(report.has_failures())
}

/// Asks the operator to confirm before anything is created.
fn confirm_clone(count: usize, target_key: &str) -> Result<bool, CliError> {
    print!("Clone {count} issues into {target_key}? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

/// Anything other than `y`/`yes` (case-insensitive) counts as a no.
fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_ascii_lowercase();
    answer == "y" || answer == "yes"
}

fn print_dry_run_preview(issues: &[Issue], target_project: &Project) {
    println!("\n[DRY RUN] Would clone {} issues into {}:\n", issues.len(), target_project.key);
    for (i, issue) in issues.iter().enumerate() {
        println!("  [{}/{}] {} - {}", i + 1, issues.len(), issue.key, issue.summary);
    }
    println!();
}

fn print_progress(event: &ProgressEvent) {
    match event {
        ProgressEvent::Started { total, .. } => {
            println!("Cloning {total} issues...");
        }
        ProgressEvent::IssueFinished { index, result } => match &result.outcome {
            CloneOutcome::Success { target } => {
                println!("  [{}] {} -> {}", index + 1, result.source.key, target.key);
            }
            CloneOutcome::Failed { error } => {
                println!("  [{}] {} FAILED: {error}", index + 1, result.source.key);
            }
            CloneOutcome::Pending => {}
        },
        ProgressEvent::Completed { .. } => {}
    }
}

fn print_report(report: &CloneReport) {
    println!("\nClone operation completed: {} issues processed", report.total());
    println!("  succeeded: {}", report.successful);
    println!("  failed:    {}", report.failed);
    if let Some(stats) = &report.reconciliation {
        println!(
            "  links:     {} recreated, {} skipped",
            stats.recreated, stats.skipped
        );
    }
    println!("  operation: {}", report.operation_id);
}

fn print_history(ledger: &SqliteLedger, json: bool) -> Result<(), CliError> {
    let operations = ledger.list_operations()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&operations)?);
        return Ok(());
    }

    if operations.is_empty() {
        println!("No clone operations recorded.");
        return Ok(());
    }

    for op in &operations {
        println!(
            "{}  {} -> {}  total={} ok={} failed={}  {}",
            op.created_at.format("%Y-%m-%d %H:%M:%S"),
            op.source_project_id,
            op.target_project_id,
            op.total_issues,
            op.successful_issues,
            op.failed_issues,
            op.id,
        );
    }
    Ok(())
}

fn print_results(ledger: &SqliteLedger, operation_id: &str) -> Result<(), CliError> {
    let results = ledger.results_for(operation_id)?;
    if results.is_empty() {
        println!("No results recorded for operation {operation_id}.");
        return Ok(());
    }

    for record in &results {
        match (&record.target_issue_key, &record.error_message) {
            (Some(target), _) => {
                println!("{}  {} -> {}", record.status.as_str(), record.source_issue_key, target);
            }
            (None, Some(error)) => {
                println!("{}  {}  {}", record.status.as_str(), record.source_issue_key, error);
            }
            (None, None) => {
                println!("{}  {}", record.status.as_str(), record.source_issue_key);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{is_affirmative, Cli, Command, HistoryAction};
    use clap::Parser;

    #[test]
    fn history_subcommands_parse() {
        let cli = Cli::try_parse_from(["issue-cloner", "history"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::History { json: false, action: None }
        ));

        let cli = Cli::try_parse_from(["issue-cloner", "history", "show", "op-1"]).unwrap();
        match cli.command {
            Command::History {
                action: Some(HistoryAction::Show { operation_id }),
                ..
            } => assert_eq!(operation_id, "op-1"),
            other => panic!("expected history show, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["issue-cloner", "history", "reset"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::History { action: Some(HistoryAction::Reset), .. }
        ));
    }

    #[test]
    fn only_yes_answers_confirm() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("Yes\n"));
        assert!(is_affirmative("  YES  "));

        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("n\n"));
        assert!(!is_affirmative("yeah\n"));
        assert!(!is_affirmative("no\n"));
    }
}
