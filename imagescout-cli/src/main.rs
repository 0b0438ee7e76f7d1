//! ImageScout CLI - acquire a product image from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::error;

use imagescout::source::FallbackSource;
use imagescout::{AcquireConfig, AcquisitionOrchestrator, ProductQuery};

/// Multi-source product image acquisition with quality scoring.
#[derive(Debug, Parser)]
#[command(name = "imagescout", version, about)]
struct Args {
    /// Product name to search for.
    #[arg(short, long)]
    product: String,

    /// Brand name to improve search accuracy.
    #[arg(short, long, default_value = "")]
    brand: String,

    /// Product id used in the stored filename.
    #[arg(short = 'i', long)]
    product_id: Option<String>,

    /// Directory downloaded images are stored in.
    #[arg(short, long, default_value = "product_images")]
    output_dir: PathBuf,

    /// Download the best image instead of search-only.
    #[arg(short, long)]
    download: bool,

    /// Emit the result as JSON instead of a human-readable summary.
    #[arg(long)]
    json: bool,

    /// Minimum number of sources that must return results.
    #[arg(long, default_value_t = 2)]
    min_sources: usize,

    /// Maximum number of candidates probed for quality scoring.
    #[arg(long, default_value_t = 15)]
    candidates: usize,

    /// Download attempts per candidate.
    #[arg(long, default_value_t = 3)]
    attempts: u32,

    /// Also register the low-confidence placeholder source, ranked last.
    #[arg(long)]
    with_fallback: bool,

    /// Write logs to daily-rolling files in this directory instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let _log_guard = imagescout::logging::init(args.log_dir.as_deref());

    let query = match ProductQuery::new(args.product.as_str(), args.brand.as_str()) {
        Ok(query) => query,
        Err(e) => {
            error!(error = %e, "invalid query");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = AcquireConfig::default()
        .with_download(args.download)
        .with_min_sources(args.min_sources)
        .with_candidate_cap(args.candidates)
        .with_attempt_cap(args.attempts);

    let mut orchestrator = match AcquisitionOrchestrator::with_defaults(&args.output_dir, config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!(error = %e, "failed to initialize");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.with_fallback {
        orchestrator
            .registry_mut()
            .register(std::sync::Arc::new(FallbackSource::new()));
    }

    // Ctrl-C cancels at the next stage boundary; partial files are never
    // left behind.
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        error!(error = %e, "failed to install ctrl-c handler");
    }

    let result = orchestrator
        .acquire(&query, args.product_id.as_deref(), &cancel)
        .await;

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", result);
    }

    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
