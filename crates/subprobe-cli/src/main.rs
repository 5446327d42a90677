//! `subprobe`: diagnostics for the submissions database and its AI workflow.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use subprobe_core::Credentials;
use subprobe_store::{RestStore, Store};
use subprobe_sync::{DEFAULT_WEBHOOK_URL, PollConfig, WebhookClient};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::inspect::{StatusReport, TablesReport};

mod display;
mod dump;
mod functions;
mod inspect;
mod pipeline;

/// Pause between running the SEO procedure and reading its output.
const SEO_SETTLE: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "subprobe")]
#[command(about = "Inspect submissions, log tables, and the AI content workflow")]
#[command(version)]
struct Cli {
    /// Workflow webhook that receives submission payloads
    #[arg(long, global = true, env = "SUBPROBE_WEBHOOK_URL", default_value = DEFAULT_WEBHOOK_URL)]
    webhook_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Every field of a submission, grouped into AI, SEO and other
    Fields {
        #[arg(default_value = inspect::DEFAULT_INSPECT_ID)]
        id: String,
    },
    /// AI processing status; saves the row once content exists
    Status {
        #[arg(default_value = inspect::DEFAULT_STATUS_ID)]
        id: String,
    },
    /// Sectioned AI/SEO detail; always saves the row
    Detail {
        #[arg(default_value = inspect::DEFAULT_INSPECT_ID)]
        id: String,
    },
    /// Recent webhook executions, audit logs and processed submissions
    Logs,
    /// Newest submissions and whether they have AI output
    Recent,
    /// Tables listed by the database, or row counts of known tables
    Tables,
    /// Which RPC functions exist
    Functions,
    /// Run the SEO automation procedure (defaults to the newest TEST submission)
    Seo { id: Option<String> },
    /// Create a test submission, trigger the workflow, and wait for AI content
    Create {
        /// Create through the create_submission function first, inserting directly if it fails
        #[arg(long)]
        via_rpc: bool,
    },
    /// Re-send an existing submission to the workflow and wait for AI content
    Trigger {
        #[arg(default_value = pipeline::DEFAULT_TRIGGER_ID)]
        id: String,
    },
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };
    debug!(?credentials, "resolved credentials");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let store = RestStore::new(&credentials);
    if let Err(e) = runtime.block_on(run(cli, &store)) {
        eprintln!("❌ Error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli, store: &dyn Store) -> Result<()> {
    let out_dir = Path::new(".");
    let webhook = WebhookClient::new(cli.webhook_url);
    let poll = PollConfig::default();

    match cli.command {
        Command::Fields { id } => {
            if let Some(summary) = inspect::fields(store, &id).await? {
                info!(
                    markers = summary.marker_hits.len(),
                    populated = summary.populated.len(),
                    "field dump finished"
                );
            }
        }
        Command::Status { id } => {
            match inspect::status(store, &id, out_dir).await? {
                StatusReport::Generated { dump } => {
                    info!(dump = %dump.display(), "status check finished")
                }
                other => info!(report = ?other, "status check finished"),
            }
        }
        Command::Detail { id } => {
            let dump = inspect::detail(store, &id, out_dir).await?;
            info!(?dump, "detail check finished");
        }
        Command::Logs => {
            let summary = inspect::logs(store).await;
            info!(
                webhook_executions = ?summary.webhook_executions,
                audit_logs = ?summary.audit_logs,
                processed = ?summary.processed_submissions,
                "log check finished"
            );
        }
        Command::Recent => {
            let summary = inspect::recent(store).await?;
            info!(total = summary.total, with_ai = summary.with_ai, "recent check finished");
        }
        Command::Tables => {
            match inspect::tables(store).await {
                TablesReport::Listed(listed) => info!(%listed, "tables listed by database"),
                TablesReport::Counted(counts) => {
                    let missing = counts.iter().filter(|(_, r)| r.is_err()).count();
                    info!(tables = counts.len(), missing, "table check finished");
                }
            }
        }
        Command::Functions => {
            let (results, schema) = functions::functions(store).await;
            let found = results.iter().filter(|(_, o)| o.exists()).count();
            info!(found, schema = schema.is_some(), "function probe finished");
        }
        Command::Seo { id } => {
            if let Some(report) = pipeline::seo(store, id.as_deref(), SEO_SETTLE).await? {
                info!(
                    submission_id = %report.submission_id,
                    generated = report.seo_generated,
                    "seo automation finished"
                );
            }
        }
        Command::Create { via_rpc } => {
            let report = pipeline::create(store, &webhook, &poll, via_rpc, out_dir).await?;
            info!(
                submission_id = %report.submission_id,
                created_via = ?report.created_via,
                ai_content = report.ai_content_generated,
                seo_fields = report.seo_fields_populated,
                dump = ?report.dump,
                "create finished"
            );
        }
        Command::Trigger { id } => {
            let outcome = pipeline::trigger(store, &webhook, &id, &poll).await?;
            info!(found = outcome.is_some_and(|o| o.is_found()), "trigger finished");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ids_fall_back_to_defaults() {
        let cli = Cli::parse_from(["subprobe", "status"]);
        assert!(matches!(cli.command, Command::Status { id } if id == inspect::DEFAULT_STATUS_ID));

        let cli = Cli::parse_from(["subprobe", "seo"]);
        assert!(matches!(cli.command, Command::Seo { id: None }));

        let cli = Cli::parse_from(["subprobe", "trigger", "abc"]);
        assert!(matches!(cli.command, Command::Trigger { id } if id == "abc"));
    }

    #[test]
    fn create_inserts_directly_unless_asked() {
        let cli = Cli::parse_from(["subprobe", "create"]);
        assert!(matches!(cli.command, Command::Create { via_rpc: false }));

        let cli = Cli::parse_from(["subprobe", "create", "--via-rpc"]);
        assert!(matches!(cli.command, Command::Create { via_rpc: true }));
    }

    #[test]
    fn webhook_url_flag_overrides_default() {
        let cli = Cli::parse_from(["subprobe", "--webhook-url", "http://localhost:5678/hook", "create"]);
        assert_eq!(cli.webhook_url, "http://localhost:5678/hook");
    }
}
