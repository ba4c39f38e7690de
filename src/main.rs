//! `ironprofile` command line: profile a CSV or JSONL file against a schema.

use anyhow::{Context, Result, bail};
use clap::Parser;
use ironprofile::{Profiler, ProfilerConfig, Schema};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ironprofile", version, about = "Column statistics and Top-N values for a data file")]
struct Args {
    /// Input file (CSV unless --jsonl).
    input: PathBuf,

    /// JSON schema: `{"columns": [{"name": "id", "kind": "integer"}, ...]}`.
    #[arg(long)]
    schema: PathBuf,

    /// JSON profiler config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    top_n: Option<usize>,

    #[arg(long)]
    partitions: Option<usize>,

    #[arg(long)]
    threads: Option<usize>,

    /// Max partials merged per reduce round.
    #[arg(long)]
    fanout: Option<usize>,

    /// Profile on one thread.
    #[arg(long)]
    sequential: bool,

    /// Read JSON Lines instead of CSV.
    #[arg(long)]
    jsonl: bool,

    /// The CSV input has no header row.
    #[arg(long)]
    no_headers: bool,

    /// Also write every metric row here (`.jsonl` for JSON Lines, else CSV).
    #[arg(long)]
    metrics_out: Option<PathBuf>,

    /// Print the whole report as JSON instead of Top-N lines.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &Args) -> Result<ProfilerConfig> {
    let mut cfg = match &args.config {
        Some(path) => ProfilerConfig::from_json_file(path)?,
        None => ProfilerConfig::default(),
    };
    if let Some(n) = args.top_n {
        cfg.top_n = n;
    }
    if args.partitions.is_some() {
        cfg.partitions = args.partitions;
    }
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }
    if args.fanout.is_some() {
        cfg.fanout = args.fanout;
    }
    cfg.sequential |= args.sequential;
    Ok(cfg)
}

#[cfg(feature = "io-csv")]
fn read_csv(args: &Args, schema: &Schema) -> Result<Vec<ironprofile::Row>> {
    ironprofile::read_csv_rows(&args.input, schema, !args.no_headers)
}

#[cfg(not(feature = "io-csv"))]
fn read_csv(_args: &Args, _schema: &Schema) -> Result<Vec<ironprofile::Row>> {
    bail!("CSV input needs the `io-csv` feature")
}

#[cfg(feature = "io-jsonl")]
fn read_jsonl(args: &Args, schema: &Schema) -> Result<Vec<ironprofile::Row>> {
    ironprofile::read_jsonl_rows(&args.input, schema)
}

#[cfg(not(feature = "io-jsonl"))]
fn read_jsonl(_args: &Args, _schema: &Schema) -> Result<Vec<ironprofile::Row>> {
    bail!("JSONL input needs the `io-jsonl` feature")
}

fn write_metrics(path: &Path, rows: &[ironprofile::MetricRow]) -> Result<usize> {
    let jsonl = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));
    match jsonl {
        #[cfg(feature = "io-jsonl")]
        true => ironprofile::write_metrics_jsonl(path, rows),
        #[cfg(feature = "io-csv")]
        false => ironprofile::write_metrics_csv(path, rows),
        #[allow(unreachable_patterns)]
        _ => bail!("no writer enabled for {}", path.display()),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let schema = Schema::from_json_file(&args.schema)?;
    if schema.is_empty() {
        bail!("schema {} has no columns", args.schema.display());
    }
    let config = load_config(&args)?;
    let profiler = Profiler::new(config).context("invalid profiler settings")?;

    let rows = if args.jsonl {
        read_jsonl(&args, &schema)?
    } else {
        read_csv(&args, &schema)?
    };
    info!(rows = rows.len(), input = %args.input.display(), "loaded input");

    let report = profiler.profile(&schema, rows)?;
    let format = &profiler.config().format;

    if let Some(path) = &args.metrics_out {
        let n = write_metrics(path, &report.metric_rows(format))?;
        info!(rows = n, path = %path.display(), "wrote metrics");
    }

    if args.json {
        println!("{}", report.to_json_string()?);
    } else {
        for col in &report.columns {
            println!("{}\t{}", col.name, col.render_top_values(format));
        }
    }
    Ok(())
}
