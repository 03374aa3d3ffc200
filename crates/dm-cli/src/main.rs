//! `draftmerge`: find near-duplicate Markdown drafts and report how they
//! diverge from a canonical version.

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dm_core::{DedupConfig, DirSource};
use dm_dedup::{score, DedupPipeline};
use dm_parser::{DocumentParser, Segmenter};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "draftmerge", version, about = "Cluster near-duplicate Markdown drafts")]
struct Cli {
    /// Debug-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster every draft in a directory and merge each cluster.
    Scan {
        dir: PathBuf,
        /// JSON config file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Near-duplicate threshold in (0, 1].
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Score pairs on the current thread only.
        #[arg(long)]
        sequential: bool,
        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Score two drafts against each other.
    Compare {
        left: PathBuf,
        right: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn load_config(path: Option<&Path>) -> Result<DedupConfig> {
    match path {
        Some(p) => DedupConfig::load(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(DedupConfig::default()),
    }
}

fn scan(
    dir: &Path,
    mut config: DedupConfig,
    threshold: Option<f64>,
    sequential: bool,
    recursive: bool,
    format: OutputFormat,
) -> Result<()> {
    if let Some(t) = threshold {
        config.threshold = t;
    }
    if sequential {
        config.parallel = false;
    }
    if recursive {
        config.recursive = true;
    }

    let source = DirSource::new(dir, config.extensions.clone()).recursive(config.recursive);
    let pipeline = DedupPipeline::new(config).context("invalid configuration")?;
    info!(dir = %dir.display(), threshold = pipeline.config().threshold, "scanning drafts");
    let report = pipeline
        .run(&source)
        .with_context(|| format!("failed to scan {}", dir.display()))?;

    match format {
        OutputFormat::Json => println!("{}", report.to_json_pretty()?),
        OutputFormat::Text => print!("{}", report.render_text()),
    }
    Ok(())
}

fn compare(left: &Path, right: &Path, config: &DedupConfig) -> Result<()> {
    let segmenter = Segmenter::new(&config.segmenter).context("invalid configuration")?;
    let a = segmenter
        .parse_file(&left.to_string_lossy())
        .with_context(|| format!("failed to parse {}", left.display()))?;
    let b = segmenter
        .parse_file(&right.to_string_lossy())
        .with_context(|| format!("failed to parse {}", right.display()))?;

    let s = score(&a, &b);
    println!(
        "{:.4}  {} ({} blocks) vs {} ({} blocks), {} matched",
        s.score,
        s.a,
        a.len(),
        s.b,
        b.len(),
        s.alignment.matched()
    );
    for &(i, j) in &s.alignment.pairs {
        if let Some(block) = a.block(i) {
            println!("  {i:>4} = {j:<4} {}", block.kind);
        }
    }
    let verdict = if s.score >= config.threshold {
        "near-duplicate"
    } else {
        "distinct"
    };
    println!("{verdict} at threshold {:.2}", config.threshold);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::configure_logging(cli.verbose);

    match cli.command {
        Command::Scan {
            dir,
            config,
            threshold,
            sequential,
            recursive,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            scan(&dir, config, threshold, sequential, recursive, format)
        }
        Command::Compare {
            left,
            right,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            compare(&left, &right, &config)
        }
    }
}
