//! graphbin CLI - Convert a graph file into renderer binaries + metadata.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use graphbin::config::{DEFAULT_OUTPUT_DIR, DEFAULT_SEED};
use graphbin::{convert_file, ConvertConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphbin")]
#[command(about = "Convert a .graphml or node-link .json graph into Float32 binaries for GPU rendering")]
#[command(version)]
struct Cli {
    /// Input graph file (.graphml or .json)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    outdir: PathBuf,

    /// Randomly keep this many edges (0 keeps all of them)
    #[arg(long)]
    sample: Option<u64>,

    /// Random seed for sampling and initial positions
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Half-width of the initial position square
    #[arg(long, default_value_t = graphbin::layout::DEFAULT_EXTENT)]
    extent: f32,

    /// Log per-stage details
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "graphbin=debug" } else { "graphbin=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// `--sample 0` and an absent flag both mean every edge is kept.
fn sample_limit(raw: Option<u64>) -> Result<Option<usize>> {
    raw.filter(|&s| s > 0)
        .map(usize::try_from)
        .transpose()
        .context("--sample does not fit this platform's address space")
}

fn run(cli: &Cli) -> Result<()> {
    let sample = sample_limit(cli.sample)?;

    let config = ConvertConfig::default()
        .with_output_dir(&cli.outdir)
        .with_sample(sample)
        .with_seed(cli.seed)
        .with_position_extent(cli.extent);

    let report = convert_file(&cli.input, &config)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    for warning in &report.warnings {
        eprintln!("WARNING: {warning}");
    }

    println!(
        "Converted {} nodes and {} edges{}",
        report.num_nodes,
        report.num_edges,
        if report.num_edges < report.total_edges {
            format!(" (sampled from {})", report.total_edges)
        } else {
            String::new()
        }
    );
    for path in &report.written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let usage = err
                .downcast_ref::<graphbin::Error>()
                .is_some_and(graphbin::Error::is_usage);
            ExitCode::from(if usage { 2 } else { 1 })
        }
    }
}
