//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvPriceSource;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report_adapter::SvgReportAdapter;
use crate::domain::asset_series::AssetSeries;
use crate::domain::config_validation::{parse_flag, validate_optimize_config};
use crate::domain::error::FrontierError;
use crate::domain::frontier::{self, DEFAULT_SAMPLES, FrontierResult, MAX_SAMPLES, SearchConfig};
use crate::domain::return_stats::ReturnStats;
use crate::domain::universe::{DateRange, Universe, parse_tickers};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceSource;
use crate::ports::report_port::{FrontierReport, ReportPort};

const DEFAULT_OUTPUT: &str = "frontier.svg";

#[derive(Parser, Debug)]
#[command(name = "frontier", about = "Minimum-risk portfolio search by random sampling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sample portfolios and report the minimum-risk allocation
    Optimize(OptimizeArgs),
    /// Validate an optimization configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the price data available per ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        tickers: Option<String>,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct OptimizeArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    /// Comma separated tickers (2-10)
    #[arg(long)]
    pub tickers: Option<String>,
    /// Start date, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// End date, YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub samples: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Use the batched parallel search
    #[arg(long)]
    pub parallel: bool,
    /// Report path; `.csv` writes the sample table, anything else an SVG chart
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

/// Fully resolved inputs of one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeRequest {
    pub universe: Universe,
    pub range: DateRange,
    pub search: SearchConfig,
    pub parallel: bool,
    pub data_dir: PathBuf,
    pub output: PathBuf,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Optimize(args) => run_optimize(&args),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, tickers } => run_info(&config, tickers.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn missing(section: &str, key: &str) -> FrontierError {
    FrontierError::ConfigMissing {
        section: section.into(),
        key: key.into(),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FrontierError {
    FrontierError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

pub fn build_request(
    config: &dyn ConfigPort,
    args: &OptimizeArgs,
) -> Result<OptimizeRequest, FrontierError> {
    let tickers = args
        .tickers
        .clone()
        .or_else(|| config.get_string("optimize", "tickers"))
        .ok_or_else(|| missing("optimize", "tickers"))?;
    let universe = parse_tickers(&tickers)?;

    let start = args
        .start
        .clone()
        .or_else(|| config.get_string("optimize", "start_date"))
        .ok_or_else(|| missing("optimize", "start_date"))?;
    let end = args
        .end
        .clone()
        .or_else(|| config.get_string("optimize", "end_date"))
        .ok_or_else(|| missing("optimize", "end_date"))?;
    let range = DateRange::parse(&start, &end)?;

    let samples = match args.samples {
        Some(n) => n,
        None => match config.get_string("optimize", "samples") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid("optimize", "samples", "must be a positive integer"))?,
            None => DEFAULT_SAMPLES,
        },
    };
    if samples == 0 {
        return Err(invalid("optimize", "samples", "must be a positive integer"));
    }
    if samples > MAX_SAMPLES {
        return Err(invalid(
            "optimize",
            "samples",
            format!("must be at most {MAX_SAMPLES}"),
        ));
    }

    let seed = match args.seed {
        Some(seed) => Some(seed),
        None => match config.get_string("optimize", "seed") {
            Some(_) => Some(
                config
                    .get_u64("optimize", "seed")
                    .ok_or_else(|| invalid("optimize", "seed", "must be a non-negative integer"))?,
            ),
            None => None,
        },
    };

    let parallel = args.parallel
        || match config.get_string("optimize", "parallel") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                invalid("optimize", "parallel", "must be one of true/yes/1/false/no/0")
            })?,
            None => false,
        };

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| config.get_string("data", "dir").map(PathBuf::from))
        .ok_or_else(|| missing("data", "dir"))?;

    let output = args
        .output
        .clone()
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    Ok(OptimizeRequest {
        universe,
        range,
        search: SearchConfig { samples, seed },
        parallel,
        data_dir,
        output,
    })
}

fn search(stats: &ReturnStats, request: &OptimizeRequest) -> Result<FrontierResult, FrontierError> {
    if request.parallel {
        #[cfg(feature = "parallel")]
        {
            return frontier::search_parallel(stats, &request.search);
        }
        #[cfg(not(feature = "parallel"))]
        warn!("built without the parallel feature, running sequential search");
    }
    frontier::run(stats, &request.search)
}

/// Pick the reporter from the output extension.
pub fn report_writer(output: &Path) -> Box<dyn ReportPort> {
    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Box::new(CsvReportAdapter::new()),
        _ => Box::new(SvgReportAdapter::new()),
    }
}

/// Optimized weights, return and risk as percentages.
pub fn format_summary(tickers: &[String], result: &FrontierResult) -> String {
    let mut out = String::from("Optimized Portfolio Weights:\n");
    for (ticker, weight) in result.best.allocation(tickers) {
        out.push_str(&format!("{}: {:.2}%\n", ticker, weight * 100.0));
    }
    out.push_str(&format!(
        "\nOptimized Portfolio Return: {:.2}%\n",
        result.best.expected_return() * 100.0
    ));
    out.push_str(&format!(
        "Optimized Portfolio Risk (Standard Deviation): {:.2}%\n",
        result.best.risk() * 100.0
    ));
    out
}

/// Load prices, build statistics, search, and write the report.
pub fn run_pipeline(
    source: &dyn PriceSource,
    request: &OptimizeRequest,
) -> Result<FrontierResult, FrontierError> {
    let series = AssetSeries::load(source, &request.universe, request.range)?;
    info!(
        assets = series.asset_count(),
        rows = series.row_count(),
        "aligned price series"
    );

    let stats = ReturnStats::from_series(&series)?;
    eprintln!(
        "Sampling {} portfolios over {} tickers ({} return observations)",
        request.search.samples,
        series.asset_count(),
        stats.observations()
    );

    let result = search(&stats, request)?;

    let report = FrontierReport {
        tickers: series.tickers(),
        range: request.range,
        observations: stats.observations(),
        result: &result,
    };
    let output = request.output.display().to_string();
    report_writer(&request.output).write(&report, &output)?;
    eprintln!("Report written to: {}", output);

    Ok(result)
}

fn run_optimize(args: &OptimizeArgs) -> ExitCode {
    eprintln!("Loading config from {}", args.config.display());
    let adapter = match load_config(&args.config) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_optimize_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let request = match build_request(&adapter, args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Optimizing {} from {}",
        request.universe.tickers.join(", "),
        request.range
    );

    let source = CsvPriceSource::new(request.data_dir.clone());
    match run_pipeline(&source, &request) {
        Ok(result) => {
            println!("{}", format_summary(&request.universe.tickers, &result));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_optimize_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let request = match build_request(&adapter, &OptimizeArgs::default()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nUniverse ({} tickers):", request.universe.count());
    for ticker in &request.universe.tickers {
        eprintln!("  {}", ticker);
    }
    eprintln!("Date range: {}", request.range);
    eprintln!("Samples:    {}", request.search.samples);
    match request.search.seed {
        Some(seed) => eprintln!("Seed:       {}", seed),
        None => eprintln!("Seed:       (entropy)"),
    }
    eprintln!("Parallel:   {}", request.parallel);
    eprintln!("Data dir:   {}", request.data_dir.display());
    eprintln!("Output:     {}", request.output.display());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, tickers: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let Some(data_dir) = config.get_string("data", "dir") else {
        let err = missing("data", "dir");
        eprintln!("error: {err}");
        return (&err).into();
    };
    let source = CsvPriceSource::new(PathBuf::from(data_dir));

    let tickers: Vec<String> = match tickers {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => match source.list_tickers() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    for ticker in &tickers {
        match source.get_data_range(ticker) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} rows, {} to {}", ticker, count, first, last);
            }
            Ok(None) => eprintln!("{}: no data found", ticker),
            Err(e) => warn!(ticker = %ticker, error = %e, "failed to read price data"),
        }
    }
    ExitCode::SUCCESS
}
