mod assembler;
mod config;
mod db;
mod error;
mod fetch;
mod model;
mod parser;
mod profile;
mod resolve;
mod translate;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};
use url::Url;

use config::{Settings, ShowDescriptor};
use db::SaveCounts;
use fetch::{Fetcher, HttpFetcher};
use parser::ParseOptions;
use profile::Profile;

#[derive(Parser)]
#[command(name = "show_scraper", about = "Scrape wrestling show cards into SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, parse and store every show in the list
    Run {
        /// YAML list of show URLs and merge/partial directives
        #[arg(short, long, default_value = "shows.yaml")]
        input: PathBuf,
        /// Debug-level diagnostics (hides the progress bar)
        #[arg(short, long)]
        verbose: bool,
        /// Keep event names exactly as published
        #[arg(long)]
        no_translate: bool,
        /// Print time spent per phase and the slowest shows
        #[arg(long)]
        profile: bool,
        /// Database file (default: $SHOWS_DB_PATH or data/shows.sqlite)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Row counts of the stored tables
    Stats {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Validate the show list without fetching anything
    Check {
        #[arg(short, long, default_value = "shows.yaml")]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbose = matches!(cli.command, Commands::Run { verbose: true, .. });
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();

    let t0 = Instant::now();
    let mut settings = Settings::load()?;

    let result = match cli.command {
        Commands::Run {
            input,
            verbose,
            no_translate,
            profile,
            db: db_path,
        } => {
            if let Some(path) = db_path {
                settings.db_path = path;
            }
            let descriptors = config::load_descriptors(&input)?;
            if descriptors.is_empty() {
                println!("No shows listed in {:?}.", input);
                return Ok(());
            }

            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let fetcher = HttpFetcher::new(&settings)?;
            let opts = ParseOptions {
                base_url: Url::parse(&settings.base_url)
                    .with_context(|| format!("Invalid base url {:?}", settings.base_url))?,
                translate_names: !no_translate,
            };

            println!("Processing {} shows into {:?}...", descriptors.len(), settings.db_path);
            let mut timings = Profile::new();
            let summary = run_batch(&conn, &fetcher, &descriptors, &opts, &mut timings, !verbose)?;
            summary.print();
            if profile {
                timings.print();
            }
            Ok(())
        }
        Commands::Stats { json, db: db_path } => {
            if let Some(path) = db_path {
                settings.db_path = path;
            }
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&s)?);
            } else {
                println!("Promotions:  {}", s.promotions);
                println!("Shows:       {}", s.shows);
                println!("Workers:     {}", s.workers);
                println!("Appearances: {}", s.appearances);
            }
            Ok(())
        }
        Commands::Check { input } => {
            let descriptors = config::load_descriptors(&input)?;
            for (i, d) in descriptors.iter().enumerate() {
                let kind = match d {
                    ShowDescriptor::Single(_) => "single",
                    ShowDescriptor::Merge(_) => "merge",
                    ShowDescriptor::Partial { exclude_from_count: true, .. } => "partial (uncounted)",
                    ShowDescriptor::Partial { .. } => "partial",
                };
                println!("{:>4}  {:<20} {}", i + 1, kind, d.label());
            }
            println!("\n{} entries OK", descriptors.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct RunSummary {
    ok: usize,
    failed: usize,
    counts: SaveCounts,
}

impl RunSummary {
    fn print(&self) {
        println!(
            "Stored {} shows ({} failed): {} new shows, {} new workers, {} new appearances, {} new promotions.",
            self.ok,
            self.failed,
            self.counts.shows,
            self.counts.workers,
            self.counts.appearances,
            self.counts.promotions,
        );
    }
}

/// One descriptor at a time; a failing descriptor is logged and skipped.
fn run_batch(
    conn: &rusqlite::Connection,
    fetcher: &dyn Fetcher,
    descriptors: &[ShowDescriptor],
    opts: &ParseOptions,
    timings: &mut Profile,
    show_progress: bool,
) -> anyhow::Result<RunSummary> {
    let pb = if show_progress {
        ProgressBar::new(descriptors.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut summary = RunSummary {
        ok: 0,
        failed: 0,
        counts: SaveCounts::default(),
    };

    for descriptor in descriptors {
        let started = Instant::now();
        match assembler::process(conn, fetcher, descriptor, opts, timings) {
            Ok(counts) => {
                summary.ok += 1;
                summary.counts.add(counts);
            }
            Err(e @ error::PipelineError::Storage(_)) => {
                error!("Storage failure on {}: {}", descriptor.label(), e);
                summary.failed += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", descriptor.label(), e);
                summary.failed += 1;
            }
        }
        timings.record_descriptor(descriptor.label(), started.elapsed());
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(summary)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
