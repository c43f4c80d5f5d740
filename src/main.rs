//! mitodisp CLI: measure mitochondrial dispersal in traced cell regions.

use std::path::{Path, PathBuf};

use clap::Parser;

use mitodisp::constants::DEFAULT_REPORT_FILENAME;
use mitodisp::roi_file::load_rois;
use mitodisp::{AnalysisConfig, Analyzer, FrameSlot};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Parser)]
#[command(name = "mitodisp")]
#[command(about = "Measure mitochondrial dispersal inside traced cell regions")]
#[command(version)]
struct Cli {
    /// Structural cell image; regions are traced on it.
    cell: PathBuf,

    /// Fluorescence image; its green channel is measured.
    mito: PathBuf,

    /// JSON array of polygons, each an array of [x, y] pairs in
    /// working-frame pixel coordinates.
    rois: PathBuf,

    /// Analyzer configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the report (JSON).
    #[arg(long, default_value = DEFAULT_REPORT_FILENAME)]
    out: PathBuf,
}

fn load_config(path: Option<&Path>) -> CliResult<AnalysisConfig> {
    Ok(match path {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    })
}

fn run(cli: &Cli, config: AnalysisConfig) -> CliResult<()> {
    let mut analyzer = Analyzer::new(config);
    analyzer.upload_file(FrameSlot::Cell, &cli.cell)?;
    analyzer.upload_file(FrameSlot::Mito, &cli.mito)?;
    analyzer.add_regions(load_rois(&cli.rois)?)?;

    let report = analyzer.calculate()?;
    println!("{}", report.render_table());

    report.save(&cli.out)?;
    log::info!("Report written to {}", cli.out.display());
    Ok(())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    run(&cli, config)
}
