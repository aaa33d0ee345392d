//! SigScan CLI: universe scans, single-symbol classification, universe listing.
//!
//! Commands:
//! - `scan`: classify every symbol of the universe and print buy/sell lists
//! - `classify`: classify one symbol and show its latest indicator values
//! - `universe`: list or count the symbols a scan would cover

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sigscan_core::classify::compute_indicators;
use sigscan_core::data::FetchWindow;
use sigscan_core::{classify, ScanConfig, ScanPreset};
use sigscan_runner::{
    LogProgress, ProviderConfig, RunConfig, ScanPipeline, ScanResult, UniverseConfig,
    UniverseProvider,
};

#[derive(Parser)]
#[command(
    name = "sigscan",
    about = "SigScan: RSI / MACD / KDJ / volume stock screener"
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that resolves a run config.
#[derive(clap::Args, Clone, Default)]
struct RunArgs {
    /// Path to a TOML run config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named preset: rsi, macd, kdj, volume, combination.
    #[arg(long)]
    preset: Option<String>,

    /// Override one option, e.g. `--set rsiBuy=25` (repeatable).
    #[arg(long = "set", value_name = "KEY=VALUE")]
    assignments: Vec<String>,

    /// Read bars from `<DIR>/<SYMBOL>.csv` instead of Yahoo.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Start date (YYYY-MM-DD). Omit both dates for full history.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to today when --start is given.
    #[arg(long)]
    end: Option<String>,
}

/// Flags that choose the symbol universe.
#[derive(clap::Args, Clone, Default)]
struct UniverseArgs {
    /// Comma-separated ticker list.
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Index membership TOML file.
    #[arg(long)]
    universe_file: Option<PathBuf>,

    /// Limit the membership file to these sectors (repeatable).
    #[arg(long)]
    sector: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a symbol universe and print buyable / sellable symbols.
    Scan {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        universe: UniverseArgs,

        /// Scan only the first N symbols.
        #[arg(long)]
        max_symbols: Option<usize>,

        /// Worker threads (0 = available parallelism).
        #[arg(long)]
        workers: Option<usize>,

        /// Print the full result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Classify a single symbol.
    Classify {
        /// Ticker to classify.
        symbol: String,

        #[command(flatten)]
        run: RunArgs,
    },
    /// List the symbols of the configured universe.
    Universe {
        /// Path to a TOML run config file.
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        universe: UniverseArgs,

        /// Print only the symbol count.
        #[arg(long, default_value_t = false)]
        count: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Commands::Scan {
            run,
            universe,
            max_symbols,
            workers,
            json,
        } => run_scan(&run, &universe, max_symbols, workers, json),
        Commands::Classify { symbol, run } => run_classify(&symbol, &run),
        Commands::Universe {
            config,
            universe,
            count,
        } => run_universe(config, &universe, count),
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_run_config(path: Option<&PathBuf>) -> Result<RunConfig> {
    match path {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("loading run config {}", path.display())),
        None => Ok(RunConfig::default()),
    }
}

/// Apply command-line overrides on top of the file config.
fn apply_run_args(config: &mut RunConfig, args: &RunArgs) -> Result<()> {
    if let Some(name) = &args.preset {
        config.preset = Some(ScanPreset::from_name(name)?);
        config.scan = None;
    }
    if let Some(dir) = &args.csv_dir {
        config.provider = ProviderConfig::Csv { dir: dir.clone() };
    }
    if let Some(window) = parse_window(args.start.as_deref(), args.end.as_deref())? {
        config.fetch = window;
    }
    Ok(())
}

fn apply_universe_args(config: &mut RunConfig, args: &UniverseArgs) -> Result<()> {
    if !args.symbols.is_empty() && args.universe_file.is_some() {
        bail!("--symbols and --universe-file are mutually exclusive");
    }
    if !args.symbols.is_empty() {
        config.universe = UniverseConfig::List {
            symbols: args.symbols.clone(),
        };
    } else if let Some(path) = &args.universe_file {
        config.universe = UniverseConfig::File {
            path: path.clone(),
            sectors: args.sector.clone(),
        };
    } else if !args.sector.is_empty() {
        bail!("--sector requires --universe-file");
    }
    Ok(())
}

fn resolve_scan_config(config: &RunConfig, args: &RunArgs) -> Result<ScanConfig> {
    let mut scan = config.scan_config()?;
    for assignment in &args.assignments {
        scan = scan.with_assignment(assignment)?;
    }
    scan.validate()?;
    Ok(scan)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn parse_window(start: Option<&str>, end: Option<&str>) -> Result<Option<FetchWindow>> {
    let (start, end) = match (start, end) {
        (None, None) => return Ok(None),
        (Some(s), e) => {
            let end = match e {
                Some(e) => parse_date(e)?,
                None => chrono::Local::now().date_naive(),
            };
            (parse_date(s)?, end)
        }
        (None, Some(_)) => bail!("--end requires --start"),
    };
    if start > end {
        bail!("--start {start} is after --end {end}");
    }
    Ok(Some(FetchWindow::Range { start, end }))
}

fn run_scan(
    run: &RunArgs,
    universe_args: &UniverseArgs,
    max_symbols: Option<usize>,
    workers: Option<usize>,
    json: bool,
) -> Result<()> {
    let started = Instant::now();

    let mut config = load_run_config(run.config.as_ref())?;
    apply_run_args(&mut config, run)?;
    apply_universe_args(&mut config, universe_args)?;
    if max_symbols.is_some() {
        config.max_symbols = max_symbols;
    }
    if let Some(workers) = workers {
        config.workers = workers;
    }
    let scan_config = resolve_scan_config(&config, run)?;

    let source = config.universe.build()?;
    let universe_provider = UniverseProvider::new(source).with_retry(config.retry_policy());
    let mut universe = universe_provider.symbols();
    if let Some(n) = config.max_symbols {
        universe = universe.take(n);
    }
    if universe.is_empty() {
        warn!(source = universe_provider.source_name(), "universe is empty");
    }

    let provider = config.provider.build()?;
    let pipeline = ScanPipeline::new(provider)
        .with_workers(config.workers)
        .with_progress(Arc::new(LogProgress::default()));
    info!(
        symbols = universe.len(),
        style = ?scan_config.rule_style,
        window = scan_config.evaluation_window,
        indicators = scan_config.enabled_count(),
        "starting scan"
    );
    let result = pipeline.scan(&universe, &scan_config, &config.fetch)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_scan_summary(&result);
        println!("Elapsed:        {:.1}s", started.elapsed().as_secs_f64());
    }
    Ok(())
}

fn run_classify(symbol: &str, run: &RunArgs) -> Result<()> {
    let mut config = load_run_config(run.config.as_ref())?;
    apply_run_args(&mut config, run)?;
    let scan_config = resolve_scan_config(&config, run)?;

    let provider = config.provider.build()?;
    let series = provider
        .fetch_series(symbol, &config.fetch)
        .with_context(|| format!("fetching {symbol} from {}", provider.name()))?;
    let classification = classify(&series, &scan_config)?;
    let output = compute_indicators(&series, &scan_config)?;

    println!();
    println!("=== {symbol} ===");
    println!("Bars:           {}", series.len());
    if let Some(last) = series.last_date() {
        println!("Last date:      {last}");
    }
    println!("Classification: {classification}");
    println!();
    println!("--- Latest values ---");
    let last = series.len() - 1;
    for (name, values) in output.iter() {
        let v = values[last];
        if v.is_nan() {
            println!("{name:<15} n/a");
        } else {
            println!("{name:<15} {v:.4}");
        }
    }
    println!();
    Ok(())
}

fn run_universe(config_path: Option<PathBuf>, args: &UniverseArgs, count: bool) -> Result<()> {
    let mut config = load_run_config(config_path.as_ref())?;
    apply_universe_args(&mut config, args)?;

    let provider =
        UniverseProvider::new(config.universe.build()?).with_retry(config.retry_policy());
    let mut universe = provider.symbols();
    if let Some(n) = config.max_symbols {
        universe = universe.take(n);
    }

    if count {
        println!("{}", universe.len());
        return Ok(());
    }
    for symbol in universe.iter() {
        println!("{symbol}");
    }
    Ok(())
}

fn print_list(label: &str, symbols: &[String]) {
    println!("{label:<15} {}", symbols.len());
    for chunk in symbols.chunks(10) {
        println!("  {}", chunk.join(" "));
    }
}

fn print_scan_summary(result: &ScanResult) {
    println!();
    println!("=== Scan Result ===");
    println!("Symbols:        {}", result.total());
    println!("Classified:     {}", result.classifications.len());
    println!("Skipped:        {}", result.skipped.len());
    println!("Failed:         {}", result.failed.len());
    println!();
    print_list("Buyable:", &result.buyable);
    print_list("Sellable:", &result.sellable);
    if !result.failed.is_empty() {
        println!();
        println!("--- Failures ---");
        for (symbol, reason) in &result.failed {
            println!("{symbol:<8} {reason}");
        }
    }
    println!();
}
