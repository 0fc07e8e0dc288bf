//! # KerfKit
//!
//! Repairs cutter-compensation sides and lead-in pierce points in
//! profile-cutting CAM programs.
//!
//! ## Architecture
//!
//! KerfKit is organized as a workspace with multiple crates:
//!
//! 1. **kerfkit-core** - Error taxonomy, diagnostics, planar geometry
//! 2. **kerfkit-parser** - Instruction grammar, block records, segmentation
//! 3. **kerfkit-camtools** - Classification passes and compensation correction
//! 4. **kerfkit-settings** - Configuration files and validation
//! 5. **kerfkit** - Command line binary that integrates all crates

use anyhow::{anyhow, Context};
use clap::Parser;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use kerfkit_parser::{LineSink, ReaderLineSource, SourceLine, WriterLineSink};

pub use kerfkit_camtools::{
    CorrectionOptions, CorrectionPipeline, ExteriorPolicy, ProcessedProgram, RunReport,
};
pub use kerfkit_core::{Diagnostic, Severity};
pub use kerfkit_parser::{Block, BlockPhase, Document};
pub use kerfkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Command line arguments
#[derive(Debug, Clone, Parser)]
#[command(
    name = "kerfkit",
    version,
    long_version = LONG_VERSION,
    about = "Fix cutter compensation and lead-ins in profile-cutting CAM programs"
)]
pub struct Cli {
    /// CAM program to correct
    pub input: PathBuf,

    /// Output file [default: output_file from config, "output.cam"]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a JSON report of every block decision to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Run the correction and log the summary without writing the program
    #[arg(long)]
    pub dry_run: bool,
}

/// Initialize logging with the default configuration
///
/// Logs go to stderr so stdout stays free. The level comes from `RUST_LOG`,
/// defaulting to `info`.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn read_program(path: &Path) -> anyhow::Result<Vec<SourceLine>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    ReaderLineSource::new(BufReader::new(file))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Write `lines` to a sibling temporary file, then rename it over `path`
fn write_atomically(path: &Path, lines: &[String]) -> anyhow::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Output path has no file name: {}", path.display()))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let write = || -> std::io::Result<()> {
        let mut sink = WriterLineSink::new(BufWriter::new(File::create(&tmp_path)?));
        for line in lines {
            sink.write_line(line)?;
        }
        sink.into_inner()?.into_inner()?.sync_all()?;
        fs::rename(&tmp_path, path)
    };

    write().map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        anyhow!(e).context(format!("Failed to write {}", path.display()))
    })
}

/// Correct one program end to end
pub fn run(cli: &Cli) -> anyhow::Result<RunReport> {
    let config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let pipeline = CorrectionPipeline::new(config.correction_options())
        .context("Invalid correction options")?;

    tracing::info!(input = %cli.input.display(), "Correcting program");
    let lines = read_program(&cli.input)?;
    let program = pipeline
        .process_lines(lines)
        .with_context(|| format!("Failed to correct {}", cli.input.display()))?;

    for block in &program.report.blocks {
        if block.modified {
            tracing::info!(
                block = block.sequence_id,
                line = block.line_number,
                correction = ?block.correction,
                "Block corrected"
            );
        }
    }

    if cli.dry_run {
        tracing::info!("Dry run, output not written");
    } else {
        let output = cli.output.clone().unwrap_or(config.output_file);
        write_atomically(&output, &program.lines)?;
        tracing::info!(output = %output.display(), "Wrote corrected program");
    }

    if let Some(report_path) = &cli.report {
        let json = program.report.to_json_pretty()?;
        fs::write(report_path, json)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    }

    Ok(program.report)
}
