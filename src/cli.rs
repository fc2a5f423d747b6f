//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvRecordSource;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, Simulation};
use crate::domain::catalog::default_strategies;
use crate::domain::config_validation::{load_backtest_config, load_strategies};
use crate::domain::error::TradebotError;
use crate::domain::strategy::StrategyConfig;
use crate::ports::data_port::RecordSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradebot", about = "RSI strategy backtester")]
pub struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a price history
    Backtest {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overrides [backtest] initial_capital
        #[arg(long)]
        capital: Option<f64>,
        /// Also export results as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a configuration without running it
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of a price history
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            data,
            config,
            capital,
            output,
        } => run_backtest(&data, config.as_deref(), capital, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { data } => run_info(&data),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Backtest parameters and strategies from an optional INI file.
pub fn load_run_config(
    config_path: Option<&Path>,
) -> Result<(BacktestConfig, Vec<StrategyConfig>), TradebotError> {
    match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = FileConfigAdapter::from_file(path)?;
            Ok((load_backtest_config(&adapter)?, load_strategies(&adapter)?))
        }
        None => Ok((BacktestConfig::default(), default_strategies())),
    }
}

pub fn run_backtest(
    data_path: &Path,
    config_path: Option<&Path>,
    capital: Option<f64>,
    output_path: Option<&Path>,
) -> Result<(), TradebotError> {
    // Stage 1: configuration
    let (mut config, strategies) = load_run_config(config_path)?;
    if let Some(capital) = capital {
        config.initial_capital = capital;
    }

    // Stage 2: price history
    eprintln!("Loading prices from {}", data_path.display());
    let source = CsvRecordSource::new(data_path);
    let records = source.fetch_records(config.start_date, config.end_date)?;

    // Stage 3: run
    let result = backtest_engine::run_backtest(&records, strategies, &config)?;

    // Stage 4: report
    let mut stdout = std::io::stdout().lock();
    TextReportAdapter::new().write(&result, &mut stdout)?;

    if let Some(path) = output_path {
        CsvReportAdapter::new().write_to_path(&result, path)?;
        eprintln!("Results written to {}", path.display());
    }
    Ok(())
}

/// Dry run: configures a simulation exactly as a backtest would, without reading data.
pub fn run_validate(config_path: &Path) -> Result<(), TradebotError> {
    let (config, strategies) = load_run_config(Some(config_path))?;
    let simulation = Simulation::configure(strategies, &config)?;

    eprintln!("Config validated successfully");
    eprintln!(
        "\ninitial capital {:.2}, window {}, policy {:?}",
        config.initial_capital,
        simulation.bank().window(),
        config.bankruptcy_policy
    );
    eprintln!("\nStrategies:");
    for automaton in simulation.automata() {
        let indicators: Vec<String> = automaton
            .required_indicators()
            .iter()
            .map(|k| k.to_string())
            .collect();
        eprintln!("  {} [{}]", automaton.label(), indicators.join(", "));
    }
    Ok(())
}

pub fn run_info(data_path: &Path) -> Result<(), TradebotError> {
    let source = CsvRecordSource::new(data_path);
    match source.data_range()? {
        Some((first, last, count)) => {
            println!("{}: {} records, {} to {}", data_path.display(), count, first, last);
            Ok(())
        }
        None => Err(TradebotError::NoData),
    }
}

