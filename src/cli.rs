//! CLI definition and dispatch.
//!
//! Flags take precedence over values from an optional INI file passed with
//! `--config`:
//!
//! ```ini
//! [backtest]
//! ticker = INFY.NS
//! start_date = 2007-01-01
//! end_date = 2017-12-31
//! short_window = 50
//! long_window = 200
//! capital = 100000
//! stocks_per_trade = 100
//!
//! [data]
//! dir = data
//!
//! [report]
//! output_dir = .
//! portfolio_csv = portfolio.csv
//! charts = true
//! ```

use chrono::NaiveDate;
use clap::Parser;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::config::{
    CrossoverConfig, DEFAULT_CAPITAL, DEFAULT_LONG_WINDOW, DEFAULT_SHARES_PER_TRADE,
    DEFAULT_SHORT_WINDOW,
};
use crate::domain::error::CrossoverError;
use crate::domain::pipeline::{run_pipeline, CrossoverRun};
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const TAIL_ROWS: usize = 5;

#[derive(Parser, Debug, Default)]
#[command(
    name = "macross",
    about = "Backtest a moving average crossover strategy on one security"
)]
pub struct Cli {
    /// The ticker for which you want to test the moving average crossover strategy
    #[arg(long)]
    pub ticker: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long = "start_date", alias = "start-date")]
    pub start_date: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long = "end_date", alias = "end-date")]
    pub end_date: Option<String>,
    /// Size of the short window in days [default: 50]
    #[arg(long = "short_window", alias = "short-window")]
    pub short_window: Option<usize>,
    /// Size of the long window in days [default: 200]
    #[arg(long = "long_window", alias = "long-window")]
    pub long_window: Option<usize>,
    /// Starting capital amount [default: 100000]
    #[arg(long)]
    pub capital: Option<f64>,
    /// Number of stocks traded per buy/sell trade [default: 100]
    #[arg(long = "stocks_per_trade", alias = "stocks-per-trade")]
    pub stocks_per_trade: Option<u64>,
    /// INI file supplying any of the above under [backtest]
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding <TICKER>.csv price files [default: data]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Directory the charts are written to [default: .]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Also write every portfolio row to this CSV file
    #[arg(long)]
    pub portfolio_csv: Option<PathBuf>,
    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,
}

/// Everything a run needs, merged from flags and the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub crossover: CrossoverConfig,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub portfolio_csv: Option<PathBuf>,
    pub charts: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn execute(cli: &Cli) -> Result<(), CrossoverError> {
    let file = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            Some(load_config(path)?)
        }
        None => None,
    };
    let settings = build_settings(cli, file.as_ref().map(|f| f as &dyn ConfigPort))?;

    let data_port = CsvAdapter::new(settings.data_dir.clone());
    let chart_port = SvgChartAdapter::default();
    let report_port = CsvReportAdapter::new();

    let run = run_with_ports(
        &data_port,
        settings.charts.then_some(&chart_port as &dyn ChartPort),
        &report_port,
        &settings,
    )?;

    print!("{}", format_summary(&run));
    Ok(())
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CrossoverError> {
    FileConfigAdapter::from_file(path).map_err(|e| CrossoverError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Full run against the given ports: pipeline, then charts and the optional CSV export.
pub fn run_with_ports(
    data_port: &dyn DataPort,
    chart_port: Option<&dyn ChartPort>,
    report_port: &dyn ReportPort,
    settings: &RunSettings,
) -> Result<CrossoverRun, CrossoverError> {
    let run = run_pipeline(data_port, &settings.crossover)?;

    if let Some(charts) = chart_port {
        charts.render_signal_chart(&run, &settings.output_dir)?;
        charts.render_portfolio_chart(&run, &settings.output_dir)?;
    }
    if let Some(path) = &settings.portfolio_csv {
        report_port.write(&run, path)?;
    }

    Ok(run)
}

pub fn build_settings(
    cli: &Cli,
    file: Option<&dyn ConfigPort>,
) -> Result<RunSettings, CrossoverError> {
    let string = |flag: &Option<String>, section: &str, key: &str| {
        flag.clone()
            .or_else(|| file.and_then(|f| f.get_string(section, key)))
    };

    let ticker = string(&cli.ticker, "backtest", "ticker").ok_or_else(|| missing("ticker"))?;
    let start_date = parse_date(
        &string(&cli.start_date, "backtest", "start_date").ok_or_else(|| missing("start_date"))?,
        "start_date",
    )?;
    let end_date = parse_date(
        &string(&cli.end_date, "backtest", "end_date").ok_or_else(|| missing("end_date"))?,
        "end_date",
    )?;

    let short_window = match cli.short_window {
        Some(w) => w,
        None => file_usize(file, "short_window")?.unwrap_or(DEFAULT_SHORT_WINDOW),
    };
    let long_window = match cli.long_window {
        Some(w) => w,
        None => file_usize(file, "long_window")?.unwrap_or(DEFAULT_LONG_WINDOW),
    };
    let capital = match cli.capital {
        Some(c) => c,
        None => file
            .map(|f| f.get_double("backtest", "capital"))
            .transpose()?
            .flatten()
            .unwrap_or(DEFAULT_CAPITAL),
    };
    let shares_per_trade = match cli.stocks_per_trade {
        Some(s) => s,
        None => file_usize(file, "stocks_per_trade")?
            .map(|s| s as u64)
            .unwrap_or(DEFAULT_SHARES_PER_TRADE),
    };

    let path = |flag: &Option<PathBuf>, section: &str, key: &str| {
        flag.clone()
            .or_else(|| file.and_then(|f| f.get_string(section, key)).map(PathBuf::from))
    };
    let charts = if cli.no_charts {
        false
    } else {
        file.map(|f| f.get_bool("report", "charts"))
            .transpose()?
            .flatten()
            .unwrap_or(true)
    };

    Ok(RunSettings {
        crossover: CrossoverConfig {
            ticker: ticker.trim().to_string(),
            start_date,
            end_date,
            short_window,
            long_window,
            capital,
            shares_per_trade,
        },
        data_dir: path(&cli.data_dir, "data", "dir").unwrap_or_else(|| PathBuf::from("data")),
        output_dir: path(&cli.output_dir, "report", "output_dir")
            .unwrap_or_else(|| PathBuf::from(".")),
        portfolio_csv: path(&cli.portfolio_csv, "report", "portfolio_csv"),
        charts,
    })
}

fn missing(key: &str) -> CrossoverError {
    CrossoverError::ConfigMissing {
        section: "backtest".into(),
        key: key.into(),
    }
}

fn parse_date(value: &str, key: &str) -> Result<NaiveDate, CrossoverError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CrossoverError::ConfigInvalid {
            section: "backtest".into(),
            key: key.into(),
            reason: format!("invalid date `{}` (expected YYYY-MM-DD)", value),
        }
    })
}

/// Non-negative integer from `[backtest] key`; zero is left for validation to reject.
fn file_usize(file: Option<&dyn ConfigPort>, key: &str) -> Result<Option<usize>, CrossoverError> {
    let Some(value) = file.map(|f| f.get_int("backtest", key)).transpose()?.flatten() else {
        return Ok(None);
    };
    usize::try_from(value)
        .map(Some)
        .map_err(|_| CrossoverError::invalid(key, format!("{} must be positive, got {}", key, value)))
}

/// Console report: the last portfolio rows followed by the headline figures.
pub fn format_summary(run: &CrossoverRun) -> String {
    let mut out = String::new();
    let summary = &run.summary;

    let _ = writeln!(
        out,
        "{:<12}{:>12}{:>10}{:>14}{:>14}{:>14}{:>11}",
        "date", "price", "position", "holdings", "cash", "total", "returns"
    );
    for p in run.portfolio.tail(TAIL_ROWS) {
        let price = p.price.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
        let returns = p.returns.map_or_else(|| "-".to_string(), |r| format!("{:.6}", r));
        let _ = writeln!(
            out,
            "{:<12}{:>12}{:>10}{:>14.2}{:>14.2}{:>14.2}{:>11}",
            p.date.to_string(),
            price,
            p.position,
            p.holdings,
            p.cash,
            p.total,
            returns
        );
    }

    let as_of = summary
        .last_date
        .map_or_else(|| "end of range".to_string(), |d| d.to_string());
    let _ = writeln!(out);
    let _ = writeln!(out, "Portfolio total value on {as_of}");
    let _ = writeln!(out, "{:.2}", summary.final_total);
    let _ = writeln!(out, "Absolute return as of {as_of}");
    let _ = writeln!(out, "{:.2}", summary.absolute_return);
    let _ = writeln!(
        out,
        "Return: {:.2}%  Buys: {}  Sells: {}  Business days: {}",
        summary.total_return * 100.0,
        summary.buys,
        summary.sells,
        summary.business_days
    );
    out
}
