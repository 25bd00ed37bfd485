//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::backtest::{self as rotation, RotationConfig, RotationResult, ASSET1_PREFIX};
use crate::domain::config_validation::{parse_columns, validate_backtest_config};
use crate::domain::error::RotatraderError;
use crate::domain::monthly::resample_monthly;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "rotatrader",
    about = "Two-asset monthly rotation backtester"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the rotation backtest against buy-and-hold
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        asset1: Option<String>,
        #[arg(long)]
        asset2: Option<String>,
        /// Write the monthly result table as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write an SVG chart of both NAV curves
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range and month count of a price file
    Info {
        #[arg(short, long)]
        file: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Paths and parameters for one backtest invocation after CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestPlan {
    pub asset1: String,
    pub asset2: String,
    pub output: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub config: RotationConfig,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            asset1,
            asset2,
            output,
            chart,
        } => run_backtest(config.as_deref(), asset1, asset2, output, chart),
        Command::Validate { config } => run_validate(&config),
        Command::Info { file, config } => run_info(&file, config.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, RotatraderError> {
    tracing::info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| RotatraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    validate_backtest_config(&adapter)?;
    Ok(adapter)
}

pub fn build_rotation_config(adapter: &dyn ConfigPort) -> RotationConfig {
    let defaults = RotationConfig::default();
    RotationConfig {
        initial_capital: adapter.get_double(
            "backtest",
            "initial_capital",
            defaults.initial_capital,
        ),
        buy_hold_capital: adapter.get_double(
            "backtest",
            "buy_hold_capital",
            defaults.buy_hold_capital,
        ),
        required_columns: adapter
            .get_string("data", "required_columns")
            .map(|raw| parse_columns(&raw))
            .unwrap_or(defaults.required_columns),
    }
}

/// Merges config file values with CLI overrides. Flags win.
pub fn build_plan(
    adapter: Option<&dyn ConfigPort>,
    asset1: Option<String>,
    asset2: Option<String>,
    output: Option<PathBuf>,
    chart: Option<PathBuf>,
) -> Result<BacktestPlan, RotatraderError> {
    let lookup = |section: &str, key: &str| adapter.and_then(|a| a.get_string(section, key));
    let require = |value: Option<String>, key: &str| {
        value
            .or_else(|| lookup("backtest", key))
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| RotatraderError::ConfigMissing {
                section: "backtest".into(),
                key: key.into(),
            })
    };

    Ok(BacktestPlan {
        asset1: require(asset1, "asset1")?,
        asset2: require(asset2, "asset2")?,
        output: output.or_else(|| lookup("report", "output").map(PathBuf::from)),
        chart: chart.or_else(|| lookup("report", "chart").map(PathBuf::from)),
        config: adapter.map(build_rotation_config).unwrap_or_default(),
    })
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    plan: &BacktestPlan,
) -> Result<RotationResult, RotatraderError> {
    tracing::info!(
        initial_capital = plan.config.initial_capital,
        buy_hold_capital = plan.config.buy_hold_capital,
        "running rotation backtest"
    );
    let result = rotation::run_rotation_from(data_port, &plan.asset1, &plan.asset2, &plan.config)?;

    if let Some(path) = &plan.output {
        CsvReportAdapter.write(&result, path)?;
    }
    if let Some(path) = &plan.chart {
        SvgChartAdapter.write(&result, path)?;
    }
    Ok(result)
}

fn run_backtest(
    config_path: Option<&Path>,
    asset1: Option<String>,
    asset2: Option<String>,
    output: Option<PathBuf>,
    chart: Option<PathBuf>,
) -> Result<(), RotatraderError> {
    let adapter = config_path.map(load_config).transpose()?;
    let plan = build_plan(
        adapter.as_ref().map(|a| a as &dyn ConfigPort),
        asset1,
        asset2,
        output,
        chart,
    )?;

    let result = run_backtest_pipeline(&CsvAdapter::default(), &plan)?;

    let strategy = result.final_strategy_nav().unwrap_or_default();
    let buy_hold = result.final_buy_hold_nav().unwrap_or_default();
    println!("Final Strategy Value: {:.0}", strategy.round_ties_even());
    println!("Final Buy & Hold Value: {:.0}", buy_hold.round_ties_even());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), RotatraderError> {
    let adapter = load_config(config_path)?;
    let config = build_rotation_config(&adapter);

    eprintln!("Initial capital:   {:.2}", config.initial_capital);
    eprintln!("Buy-hold capital:  {:.2}", config.buy_hold_capital);
    eprintln!("Required columns:  {}", config.required_columns.join(", "));
    for key in ["asset1", "asset2"] {
        let value = adapter
            .get_string("backtest", key)
            .unwrap_or_else(|| format!("(set with --{key})"));
        eprintln!("{key}:            {value}");
    }
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_info(file: &str, config_path: Option<&Path>) -> Result<(), RotatraderError> {
    let config = match config_path {
        Some(p) => build_rotation_config(&load_config(p)?),
        None => RotationConfig::default(),
    };

    let series = CsvAdapter::default().fetch_prices(file, &config.required_columns)?;
    match series.date_range() {
        Some((start, end)) => {
            let months = resample_monthly(&series, ASSET1_PREFIX).len();
            println!(
                "{}: {} rows, {} to {}, {} monthly returns",
                file,
                series.len(),
                start,
                end,
                months
            );
        }
        None => println!("{}: no rows with a valid date", file),
    }
    Ok(())
}
