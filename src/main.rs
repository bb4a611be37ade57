use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

use name_shortlist::logging::init_logging;
use name_shortlist::{run, MalformedRowPolicy, PipelineConfig, PipelineError};

#[derive(Parser, Debug)]
#[command(name = "name-shortlist")]
#[command(about = "Shortlist registry names by sex, ending and syllable count")]
#[command(version)]
struct Cli {
    /// Registry CSV (name,sex,count, no header)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Where to write the ranked CSV
    #[arg(long)]
    output: Option<PathBuf>,

    /// CMU-format pronunciation dictionary
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// JSON config file; flags given on the command line override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log and skip malformed rows instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Annotate syllables across all cores
    #[arg(long)]
    parallel: bool,

    /// Sex code to keep
    #[arg(long)]
    sex: Option<String>,

    #[arg(long)]
    min_syllables: Option<u32>,

    #[arg(long)]
    max_syllables: Option<u32>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run_cli(cli) {
        match err.downcast_ref::<PipelineError>() {
            Some(stage_err) => {
                error!(stage = stage_err.stage(), "Pipeline failed");
                eprintln!("❌ {} stage failed: {:#}", stage_err.stage(), err);
            }
            None => eprintln!("❌ {:#}", err),
        }
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    let report_path = cli.report.clone();
    let config = build_config(cli)?;

    println!("📂 {} → {}", config.input.display(), config.output.display());
    let report = run(&config)?;
    println!("✓ {}", report.summary());

    if let Some(path) = report_path {
        report
            .write_json(&path)
            .with_context(|| format!("run report {}", path.display()))?;
        println!("✓ Report written to {}", path.display());
    }

    Ok(())
}

/// Config file first, then command-line overrides
fn build_config(cli: Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => Some(PipelineConfig::from_file(path)?),
        None => None,
    };

    let input = cli.input.or_else(|| config.as_ref().map(|c| c.input.clone()));
    let output = cli.output.or_else(|| config.as_ref().map(|c| c.output.clone()));
    let lexicon = cli.lexicon.or_else(|| config.as_ref().map(|c| c.lexicon.clone()));

    let (input, output, lexicon) = match (input, output, lexicon) {
        (Some(i), Some(o), Some(l)) => (i, o, l),
        _ => {
            return Err(PipelineError::Config(
                "--input, --output and --lexicon are required unless set in --config".to_string(),
            )
            .into())
        }
    };

    let mut merged = config
        .take()
        .unwrap_or_else(|| PipelineConfig::new(input.clone(), output.clone(), lexicon.clone()));
    merged.input = input;
    merged.output = output;
    merged.lexicon = lexicon;

    if cli.skip_malformed {
        merged.malformed_rows = MalformedRowPolicy::Skip;
    }
    if cli.parallel {
        merged.parallel = true;
    }
    if let Some(sex) = cli.sex {
        merged.filter.sex = sex;
    }
    if let Some(min) = cli.min_syllables {
        merged.filter.min_syllables = min;
    }
    if let Some(max) = cli.max_syllables {
        merged.filter.max_syllables = max;
    }

    Ok(merged)
}
