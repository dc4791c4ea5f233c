mod domain;
mod error;
mod extract;
mod output;
mod patterns;
mod pipeline;
mod records;
mod search;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::domain::DomainFilter;
use crate::output::OutputPaths;
use crate::patterns::PatternLibrary;
use crate::pipeline::Outcome;
use crate::search::DuckDuckGo;

const DEFAULT_QUERIES: &[&str] = &[
    "หางาน ปทุมธานี facebook",
    "รับสมัครงาน รังสิต facebook",
    "งานพาร์ทไทม์ นนทบุรี facebook",
    "ประกาศรับสมัครงาน คลองหลวง facebook",
];

#[derive(Parser)]
#[command(
    name = "duck_jobs",
    about = "Collect Thai job postings from DuckDuckGo and extract wage, place and role"
)]
struct Cli {
    /// Settings file (default: ./duck_jobs.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, then write raw, cleaned and role-example tables
    Run(SearchArgs),
    /// Search and write the raw table only
    Search(SearchArgs),
    /// Filter and extract from an existing raw table
    Annotate {
        /// Raw table written by `search` or `run`
        #[arg(long)]
        raw: PathBuf,
        /// Output filename prefix
        #[arg(long, default_value = "duck")]
        outfile_prefix: String,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Search queries (default: Pathum Thani / Rangsit job queries)
    #[arg(long, num_args = 1..)]
    queries: Vec<String>,
    /// Max results per query
    #[arg(long = "max", default_value_t = 80)]
    max_results: usize,
    /// Output filename prefix
    #[arg(long, default_value = "duck")]
    outfile_prefix: String,
    /// Drop results from blocked social-network domains
    #[arg(long)]
    exclude_blocked: bool,
}

impl SearchArgs {
    fn queries(&self) -> Vec<String> {
        if self.queries.is_empty() {
            DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect()
        } else {
            self.queries.clone()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    tracing::debug!(?settings, "settings loaded");

    let lib = PatternLibrary::new(settings.wage).context("Failed to compile patterns")?;

    let result = match cli.command {
        Commands::Run(args) => {
            let paths = OutputPaths::new(&settings.output.dir, &args.outfile_prefix);
            let hits = collect(&settings, &args)?;
            finish(pipeline::process(&hits, &lib, &paths, true)?)
        }
        Commands::Search(args) => {
            let paths = OutputPaths::new(&settings.output.dir, &args.outfile_prefix);
            let hits = collect(&settings, &args)?;
            if hits.is_empty() {
                println!("No results (0 raw hits). Try different queries or increase --max");
            } else {
                output::write_raw(&paths.raw, &hits)?;
                println!("Saved raw -> {} ({} rows)", paths.raw.display(), hits.len());
            }
            Ok(())
        }
        Commands::Annotate {
            raw,
            outfile_prefix,
        } => {
            let paths = OutputPaths::new(&settings.output.dir, &outfile_prefix);
            let hits = output::read_raw(&raw)
                .with_context(|| format!("Failed to read raw table {:?}", raw))?;
            println!("Loaded {} raw hits from {}", hits.len(), raw.display());
            finish(pipeline::process(&hits, &lib, &paths, false)?)
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn collect(
    settings: &settings::Settings,
    args: &SearchArgs,
) -> anyhow::Result<Vec<records::SearchHit>> {
    let queries = args.queries();
    println!(
        "[1/3] Searching DuckDuckGo … ({} queries, {} per query)",
        queries.len(),
        args.max_results
    );

    let provider = DuckDuckGo::new(&settings.search).context("Failed to build HTTP client")?;
    let filter = if args.exclude_blocked || settings.search.exclude_blocked {
        DomainFilter::new(&settings.search.blocked_domains)
    } else {
        DomainFilter::allow_all()
    };

    let (hits, stats) = search::collect(&provider, &queries, args.max_results, &filter);
    if stats.failed_queries > 0 {
        println!(
            "{} of {} queries failed (see log)",
            stats.failed_queries, stats.queries
        );
    }
    if stats.blocked > 0 {
        println!("Dropped {} results from blocked domains", stats.blocked);
    }
    Ok(hits)
}

fn finish(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::NoHits => {
            println!("No results (0 raw hits). Try different queries or increase --max");
        }
        Outcome::Done(counts) => {
            println!(
                "Done: {} raw hits, {} job-like.",
                counts.raw, counts.retained
            );
            println!("Next: map job_term → role_id and append to your ontology tables.");
        }
    }
    Ok(())
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
