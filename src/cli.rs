//! Command-line surface for the demo binary.

use crate::adapters::csv_adapter::CsvSeriesSource;
use crate::domain::criteria::{Criterion, NumberOfTrades, TotalProfit};
use crate::domain::error::SigtraderError;
use crate::domain::runner;
use crate::domain::series::Series;
use crate::domain::slicer::SlicePolicy;
use crate::domain::strategies;
use crate::domain::strategy::Strategy;
use crate::domain::trade::Trade;
use crate::ports::data_port::SeriesSource;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use tracing::info;

#[derive(Parser)]
#[command(name = "sigtrader", version, about = "Backtest indicator strategies over OHLCV data")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a strategy over a CSV series and score the trade history.
    Backtest {
        /// OHLCV CSV file to load.
        #[arg(long)]
        data: PathBuf,
        /// Strategy to run.
        #[arg(long, value_enum)]
        strategy: StrategyKind,
        /// Partition the series into slices of this many bars and run
        /// each slice independently.
        #[arg(long)]
        slice_count: Option<usize>,
    },
    /// Describe a CSV series without running anything.
    Info {
        /// OHLCV CSV file to load.
        #[arg(long)]
        data: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyKind {
    /// Close price above/below its 12-bar SMA.
    SmaCrossover,
    /// 2-bar RSI dips inside a 5/200 SMA uptrend.
    Rsi2,
    /// 5-bar CCI pullbacks inside a 200-bar CCI trend.
    CciCorrection,
}

impl StrategyKind {
    fn build(self, series: &Rc<Series>) -> Result<Strategy, SigtraderError> {
        match self {
            StrategyKind::SmaCrossover => strategies::sma_crossover(series, 12),
            StrategyKind::Rsi2 => strategies::rsi2(series),
            StrategyKind::CciCorrection => strategies::cci_correction(series),
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    }
}

fn execute(cli: Cli) -> Result<(), SigtraderError> {
    match cli.command {
        Command::Backtest {
            data,
            strategy,
            slice_count,
        } => backtest(&data, strategy, slice_count),
        Command::Info { data } => describe(&data),
    }
}

fn backtest(
    data: &Path,
    kind: StrategyKind,
    slice_count: Option<usize>,
) -> Result<(), SigtraderError> {
    let series = Rc::new(CsvSeriesSource::new().load_series(data)?);
    let strategy = kind.build(&series)?;
    info!(series = series.name(), strategy = ?kind, "running backtest");

    let policy = match slice_count {
        Some(count) => SlicePolicy::ByCount(count),
        None => SlicePolicy::Single,
    };
    let runs = runner::run_all(&strategy, &series, &policy)?;

    for (slice_index, trades) in runs.iter().enumerate() {
        if runs.len() > 1 {
            println!("slice {slice_index}:");
        }
        report(&series, trades);
    }
    Ok(())
}

fn report(series: &Series, trades: &[Trade]) {
    for trade in trades {
        if let (Some(entry), Some(exit), Some(profit)) =
            (trade.entry(), trade.exit(), trade.profit())
        {
            println!(
                "  enter @{} {} -> exit @{} {} (profit {})",
                entry.index, entry.price, exit.index, exit.price, profit
            );
        }
    }
    let criteria: [&dyn Criterion; 2] = [&TotalProfit, &NumberOfTrades];
    for criterion in criteria {
        println!("  {}: {}", criterion.name(), criterion.calculate(series, trades));
    }
}

fn describe(data: &Path) -> Result<(), SigtraderError> {
    let series = Rc::new(CsvSeriesSource::new().load_series(data)?);
    let first = series.bar(series.begin())?;
    let last = series.bar(series.end())?;
    println!("series: {}", series.name());
    println!("bars:   {}", series.size());
    println!("range:  {} .. {}", first.timestamp, last.timestamp);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn daily_csv(closes: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        for (day, close) in closes.iter().enumerate() {
            writeln!(
                file,
                "2024-01-{:02},{c},{c},{c},{c},1000",
                day + 1,
                c = close
            )
            .unwrap();
        }
        file
    }

    #[test]
    fn backtest_command_runs_end_to_end() {
        let file = daily_csv(&["5", "12", "11", "4", "5"]);
        let cli = Cli {
            command: Command::Backtest {
                data: file.path().to_path_buf(),
                strategy: StrategyKind::SmaCrossover,
                slice_count: None,
            },
        };
        assert!(execute(cli).is_ok());
    }

    #[test]
    fn backtest_command_with_slices() {
        let file = daily_csv(&["5", "12", "13", "14", "12", "4"]);
        let cli = Cli {
            command: Command::Backtest {
                data: file.path().to_path_buf(),
                strategy: StrategyKind::Rsi2,
                slice_count: Some(3),
            },
        };
        assert!(execute(cli).is_ok());
    }

    #[test]
    fn zero_slice_count_fails_with_slicing_error() {
        let file = daily_csv(&["5", "12"]);
        let cli = Cli {
            command: Command::Backtest {
                data: file.path().to_path_buf(),
                strategy: StrategyKind::CciCorrection,
                slice_count: Some(0),
            },
        };
        assert!(matches!(
            execute(cli).unwrap_err(),
            SigtraderError::InvalidSlicing { .. }
        ));
    }

    #[test]
    fn info_command_reports_series() {
        let file = daily_csv(&["1", "2", "3"]);
        let cli = Cli {
            command: Command::Info {
                data: file.path().to_path_buf(),
            },
        };
        assert!(execute(cli).is_ok());
    }

    #[test]
    fn cli_parses_backtest_arguments() {
        let cli = Cli::try_parse_from([
            "sigtrader",
            "backtest",
            "--data",
            "bars.csv",
            "--strategy",
            "sma-crossover",
            "--slice-count",
            "30",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                data,
                strategy: StrategyKind::SmaCrossover,
                slice_count: Some(30),
            } => assert_eq!(data, PathBuf::from("bars.csv")),
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from([
            "sigtrader",
            "backtest",
            "--data",
            "bars.csv",
            "--strategy",
            "martingale",
        ])
        .is_err());
    }
}
