use std::io;
use std::path::PathBuf;
use std::process;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use dia_agg::{
    aggregate, load_config, write_report, AggregateConfig, AggregateOpts, Console, Resolution,
    ResolutionMode,
};
use dia_core::errors::DiaError;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "dia-aggregate",
    about = "Aggregate per-run experiment time series into a single CSV"
)]
struct Cli {
    /// Directories whose immediate subdirectories are run directories.
    #[arg(long, required = true, num_args = 1..)]
    data: Vec<PathBuf>,
    /// Directory the aggregate CSV is written to.
    #[arg(long, default_value = ".")]
    dump: PathBuf,
    /// Measure the resolution stride in evaluations instead of generations.
    #[arg(
        long = "by_evals",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    by_evals: bool,
    /// Sampling stride; the final generation is always kept.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    resolution: i64,
    /// Name of the aggregate CSV inside the dump directory.
    #[arg(long = "out_fname", default_value = "timeseries.csv")]
    out_fname: String,
    /// Optional YAML file overriding run layout and field exclusions.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a JSON summary of the aggregation to this path.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long = "log-level", default_value = "warn")]
    log_level: String,
}

/// `RUST_LOG` wins when it parses; otherwise `--log-level` applies.
fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn run(cli: Cli) -> Result<(), DiaError> {
    let resolution = Resolution::new(cli.resolution)?;
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AggregateConfig::default(),
    };
    debug!(?config, "aggregation config");

    let opts = AggregateOpts {
        data: cli.data,
        dump: cli.dump,
        mode: ResolutionMode::from_by_evals(cli.by_evals),
        resolution,
        out_fname: cli.out_fname,
    };
    let mut console = Console::new(io::stdout().lock());
    let report = aggregate(&opts, &config, &mut console)?;
    if let Some(path) = &cli.report {
        write_report(&report, path)?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(-1);
    }
}
