use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

mod cytoband;
mod error;
mod genome;
mod input;
mod interval;
mod layout;
mod render;

use crate::error::Result;
use crate::interval::{CoverageOracle, MergedCoverage};

#[derive(Parser)]
#[command(name = "coverage-ideogram")]
#[command(about = "Create a BED coverage ideogram with centromeres and telomeres.", long_about = None)]
struct Args {
    /// Reference FASTA; a FILE.fai next to it is used for the lengths when present.
    #[arg(short = 'f', long = "fasta", value_name = "FILE")]
    fasta: PathBuf,

    /// BED file with the regions of interest.
    #[arg(short = 'b', long = "bed", value_name = "FILE")]
    bed: PathBuf,

    /// Cytoband table (e.g. UCSC cytoBand.txt).
    #[arg(short = 'c', long = "cytoband", value_name = "FILE")]
    cytoband: PathBuf,

    /// Write the ideogram to this FILE (SVG, PNG, JPEG, BMP or TIFF based on extension).
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: PathBuf,

    /// Figure title.
    #[arg(long = "title", value_name = "STRING", default_value = layout::DEFAULT_TITLE)]
    title: String,

    // Threading
    /// Number of threads to use for parallel operations.
    #[arg(short = 't', long = "threads", value_name = "N")]
    threads: Option<usize>,

    // Logging
    /// Verbosity level (0 = error, 1 = info, 2 = debug).
    #[arg(short = 'v', long = "verbose", value_name = "N", default_value_t = 1)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    let catalog = input::read_chrom_lengths(&args.fasta)?;
    let bed_records = input::read_bed(&args.bed)?;
    let cytobands = input::read_cytobands(&args.cytoband)?;

    let (known, unknown): (Vec<_>, Vec<_>) =
        bed_records.into_iter().partition(|rec| catalog.contains(&rec.chrom));
    if !unknown.is_empty() {
        debug!("Ignored {} intervals on chromosomes absent from the reference", unknown.len());
    }

    let report = MergedCoverage::from_records(known);
    if report.coverage.is_empty() {
        warn!("No intervals cover the reference; every region will be drawn uncovered");
    }
    info!(
        "Merged into {} covered regions ({} malformed intervals rejected)",
        report.coverage.len(),
        report.rejected
    );

    let oracle = CoverageOracle::new(&report.coverage);
    let landmarks = cytoband::extract_landmarks(&cytobands, &catalog);

    let figure = layout::layout(&catalog, &report.coverage, &oracle, &landmarks, &args.title)?;
    render::render(&figure, &args.output)?;

    info!("Saved plot to {:?}", args.output);
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Initialize logger based on verbosity
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    if let Some(threads) = args.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            eprintln!("Warning: could not configure {} threads: {}", threads, e);
        }
    }

    info!("Starting ideogram...");

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!("Done.");
}
