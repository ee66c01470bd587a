//! XertiQ Wallet command-line client
//!
//! Reconcile and submit certificate batches, follow their progress, and
//! check credits from the terminal.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use xertiq_wallet::core::reconcile::{list_pdf_names, load_csv_rows};
use xertiq_wallet::utils::logging::init_logging;
use xertiq_wallet::{
    BatchStatus, ProgressTracker, ProgressView, ReconciliationResult, Termination, WalletClient,
    LONG_VERSION, WalletConfig, WalletStore, check_submission, reconcile,
};
use xertiq_wallet::utils::{CancelFlag, PollOutcome};

#[derive(Debug, Parser)]
#[command(
    name = "xertiq",
    version,
    long_version = LONG_VERSION,
    about = "XertiQ Wallet batch client"
)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "XERTIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match PDFs in a directory against a metadata CSV
    Reconcile { pdf_dir: PathBuf, csv: PathBuf },
    /// Reconcile, upload the batch and optionally follow it
    Submit {
        pdf_dir: PathBuf,
        csv: PathBuf,
        /// Follow batch progress until it finishes
        #[arg(long)]
        watch: bool,
    },
    /// Follow progress of an existing batch session
    Watch { session_id: String },
    /// Show the current credit balance
    Credits,
    /// Wait until a checkout session is paid
    AwaitPayment { checkout_session_id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.json_logs) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = WalletConfig::load(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;
    debug!("xertiq {}, backend at {}", LONG_VERSION, config.api.base_url);

    match cli.command {
        Command::Reconcile { pdf_dir, csv } => {
            let (_, result) = reconcile_dir(&pdf_dir, &csv)?;
            Ok(exit_code(result.is_valid()))
        }
        Command::Submit {
            pdf_dir,
            csv,
            watch,
        } => submit(&config, &pdf_dir, &csv, watch).await,
        Command::Watch { session_id } => {
            let client = WalletClient::new(config.api.clone())?;
            watch_batch(&config, &client, session_id).await
        }
        Command::Credits => {
            let client = WalletClient::new(config.api.clone())?;
            let credits = client.credit_balance().await?;
            remember_credits(&config, credits).await;
            println!("{} credits", credits);
            Ok(ExitCode::SUCCESS)
        }
        Command::AwaitPayment {
            checkout_session_id,
        } => await_payment(&config, &checkout_session_id).await,
    }
}

/// Reconcile `pdf_dir` against `csv` and print the report
fn reconcile_dir(pdf_dir: &Path, csv: &Path) -> anyhow::Result<(Vec<String>, ReconciliationResult)> {
    let pdfs = list_pdf_names(pdf_dir)
        .with_context(|| format!("failed to list PDFs in {}", pdf_dir.display()))?;
    let rows =
        load_csv_rows(csv).with_context(|| format!("failed to read {}", csv.display()))?;
    let result = reconcile(&pdfs, &rows);

    println!("{} of {} PDF(s) matched", result.matched.len(), pdfs.len());
    for name in &result.missing_in_csv {
        println!("  missing in CSV: {}", name);
    }
    for name in &result.duplicate_filenames {
        println!("  duplicate CSV row: {}", name);
    }

    Ok((pdfs, result))
}

async fn submit(
    config: &WalletConfig,
    pdf_dir: &Path,
    csv: &Path,
    watch: bool,
) -> anyhow::Result<ExitCode> {
    let (names, result) = reconcile_dir(pdf_dir, csv)?;
    if let Err(blocker) = check_submission(names.len(), true, &result) {
        println!("Cannot submit: {}", blocker);
        return Ok(ExitCode::FAILURE);
    }

    let client = WalletClient::new(config.api.clone())?;
    let pdfs: Vec<PathBuf> = names.iter().map(|n| pdf_dir.join(n)).collect();
    let upload = client.submit_batch(&pdfs, csv).await?;
    println!("Batch session: {}", upload.session_id);

    if watch {
        watch_batch(config, &client, upload.session_id).await
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn watch_batch(
    config: &WalletConfig,
    client: &WalletClient,
    session_id: String,
) -> anyhow::Result<ExitCode> {
    let view = ProgressView::new(config.progress.auto_dismiss_delay());
    let mut tracker = ProgressTracker::new();
    let mut updates = tracker.subscribe();
    client.track_batch(&mut tracker, session_id, config.progress.idle_timeout());

    let printer = tokio::spawn(async move {
        let mut last_line = String::new();
        while updates.changed().await.is_ok() {
            let line = match updates.borrow_and_update().as_ref() {
                Some(snapshot) => match &snapshot.state {
                    Some(state) => ProgressView::progress_line(state),
                    None => continue,
                },
                None => continue,
            };
            if line != last_line {
                eprintln!("{}", line);
                last_line = line;
            }
        }
    });

    let finished = tokio::select! {
        snapshot = tracker.wait_terminated() => snapshot,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, closing progress stream");
            None
        }
    };
    tracker.cancel();
    printer.abort();

    let Some(snapshot) = finished else {
        return Ok(ExitCode::FAILURE);
    };
    print!("{}", view.render(&snapshot));

    let ok = match (&snapshot.termination, &snapshot.state) {
        (Some(Termination::Completed), Some(state)) => {
            if let Some(delay) = view.auto_dismiss_delay(state) {
                tokio::time::sleep(delay).await;
                debug!("Progress view dismissed");
            }
            state.status != BatchStatus::Failed
        }
        _ => false,
    };

    Ok(exit_code(ok))
}

async fn await_payment(config: &WalletConfig, checkout_session_id: &str) -> anyhow::Result<ExitCode> {
    let client = WalletClient::new(config.api.clone())?;
    let cancel = CancelFlag::new();

    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let outcome = client
        .await_payment(checkout_session_id, &config.polling.policy(), &cancel)
        .await;
    ctrl_c.abort();

    match outcome? {
        PollOutcome::Ready { value, attempts } => {
            info!("Payment confirmed after {} checks", attempts);
            let credits = match value.credits {
                Some(credits) => credits,
                None => client.credit_balance().await?,
            };
            remember_credits(config, credits).await;
            println!("Payment complete, balance: {} credits", credits);
            Ok(ExitCode::SUCCESS)
        }
        PollOutcome::Exhausted { attempts } => {
            bail!("payment not confirmed after {} checks", attempts)
        }
        PollOutcome::Cancelled { .. } => Ok(ExitCode::FAILURE),
    }
}

async fn remember_credits(config: &WalletConfig, credits: u64) {
    let result = async {
        let mut store = WalletStore::hydrate(config.store.resolved_path()).await?;
        store.set_credits(credits);
        store.persist().await
    }
    .await;

    if let Err(e) = result {
        warn!("Could not update local wallet state: {}", e);
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
