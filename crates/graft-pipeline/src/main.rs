//! graft - reconcile an external document archive with the note store.
//!
//! Modes:
//!   ingest   - create notes for archive documents with no linked note yet
//!   enrich   - back-fill full document text into notes that lack it
//!   orphans  - list archive documents with no linked note (read-only)
//!   all      - ingest + enrich (default)

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use graft_core::Config;
use graft_corpus::{CorpusClient, Tunnel};
use graft_pipeline::{print_orphan_report, run_enrich, run_ingest, CorpusSnapshot};
use graft_store::{NoteStore, StoreApiClient};

#[derive(Debug, Parser)]
#[command(name = "graft")]
#[command(version, about = "Archive -> note-store reconciliation pipeline")]
struct Cli {
    /// Pipeline mode
    #[arg(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Print what would change, don't write
    #[arg(long)]
    dry_run: bool,

    /// Re-enrich notes that already carry full document content
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    Ingest,
    Enrich,
    Orphans,
    All,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    let do_ingest = matches!(cli.mode, Mode::Ingest | Mode::All);

    // Ingest writes go through the store's API service; fail fast if it is
    // required but not running.
    let api = StoreApiClient::new(&config)?;
    if do_ingest && !cli.dry_run && !api.is_available().await {
        eprintln!(
            "note-store write API not reachable at {}",
            config.store_api_url
        );
        eprintln!("start the note-store service, or use --mode enrich or --dry-run");
        anyhow::bail!("write API required but unreachable");
    }

    // Scoped resources: the tunnel guard and the store handle are released
    // on every exit path below - completion, fatal error, and interrupt.
    let tunnel = Tunnel::open(&config).await?;
    let store = NoteStore::open(&config.store_db_path).await?;
    let corpus = CorpusClient::new(&config)?;

    let outcome = tokio::select! {
        result = run_pipeline(&cli, &config, &corpus, &api, &store) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nInterrupted, shutting down.");
            Ok(())
        }
    };

    store.close().await;
    drop(tunnel);

    outcome.map_err(Into::into)
}

async fn run_pipeline(
    cli: &Cli,
    config: &Config,
    corpus: &CorpusClient,
    api: &StoreApiClient,
    store: &NoteStore,
) -> graft_core::Result<()> {
    let do_ingest = matches!(cli.mode, Mode::Ingest | Mode::All);
    let do_enrich = matches!(cli.mode, Mode::Enrich | Mode::All);
    let do_orphans = cli.mode == Mode::Orphans;

    println!("Fetching archive metadata...");
    let snapshot = CorpusSnapshot::load(corpus, store).await?;
    println!(
        "  {} archive documents, {} already linked to notes",
        snapshot.documents.len(),
        snapshot.linked.len()
    );

    let mut ingested = 0;
    let mut enriched = 0;

    if do_orphans {
        print_orphan_report(&snapshot, &config.valid_domains);
    }
    if do_ingest {
        ingested = run_ingest(&snapshot, corpus, api, store, config, cli.dry_run).await?;
    }
    if do_enrich {
        enriched = run_enrich(corpus, store, cli.dry_run, cli.force).await?;
    }

    println!("\n{}", "-".repeat(50));
    println!("Archive -> note-store pipeline complete");
    let label = if cli.dry_run { "[dry-run] " } else { "" };
    if do_ingest {
        println!("  {label}Notes created: {ingested}");
    }
    if do_enrich {
        println!("  {label}Notes enriched: {enriched}");
    }
    if do_orphans {
        println!("  Orphan documents: {}", snapshot.orphans().len());
    }
    Ok(())
}
