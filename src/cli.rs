//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_adapter::{CsvAdapter, CsvReportAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::forecast_task::{DEFAULT_LATENCY, DelayedForecaster};
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::catalog::{Catalog, DEFAULT_BASE_PRICE, DEFAULT_DRIFT_RATE, Security};
use crate::domain::config_validation::{SECURITY_SECTION_PREFIX, validate_config};
use crate::domain::error::MarketsimError;
use crate::domain::forecast::{DEFAULT_UP_PROBABILITY, Forecast, ForecastSimulator, OrderSide};
use crate::domain::indicator::{
    DEFAULT_EMA_PERIOD, DEFAULT_RSI_PERIOD, DEFAULT_SMA_PERIOD, EmaSeed, IndicatorEngine,
};
use crate::domain::portfolio::{PositionFilter, aggregate};
use crate::domain::price_series::{DEFAULT_VOLATILITY, PricePoint, PriceSeriesGenerator};
use crate::logging::{LoggingConfig, init_logging};
use crate::ports::config_port::ConfigPort;
use crate::ports::input_port::InputPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "marketsim", about = "Synthetic market data, indicators and portfolio analytics")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowArgs {
    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// RNG seed for a reproducible series
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the supported securities
    Catalog {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Generate a synthetic daily price series
    Series {
        #[arg(long)]
        symbol: String,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Compute SMA, EMA and RSI over a generated or supplied series
    Indicators {
        #[arg(long, required_unless_present = "input")]
        symbol: Option<String>,
        /// Price series CSV (date,price,volume) to use instead of generating one
        #[arg(long, conflicts_with_all = ["symbol", "start", "end", "seed"])]
        input: Option<PathBuf>,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Forecast the next week of prices for a trade intent
    Forecast {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        side: OrderSide,
        #[arg(long)]
        seed: Option<u64>,
        /// Overrides [forecast] latency_ms
        #[arg(long)]
        latency_ms: Option<u64>,
        /// Give up if the forecast takes longer than this
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Value a set of positions and total the portfolio
    Portfolio {
        /// Positions CSV (symbol,name,quantity,avg_buy_price,current_price)
        #[arg(long)]
        positions: PathBuf,
        /// Case-insensitive match on symbol or name
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        filter: PositionFilter,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match cli.config.as_ref() {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => return report_error(&e),
        },
        None => FileConfigAdapter::empty(),
    };

    init_logging(&LoggingConfig::from_env(&config, cli.verbose));

    if let Err(e) = validate_config(&config) {
        return report_error(&e);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match execute(&cli.command, &config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn report_error(err: &MarketsimError) -> ExitCode {
    tracing::debug!(error = ?err, "command failed");
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MarketsimError> {
    FileConfigAdapter::from_file(path).map_err(|e| MarketsimError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Run one command against an already validated configuration, writing the
/// report to `out`.
pub fn execute(
    command: &Command,
    config: &dyn ConfigPort,
    out: &mut dyn Write,
) -> Result<(), MarketsimError> {
    let catalog = build_catalog(config);

    match command {
        Command::Catalog { format } => {
            let securities: Vec<&Security> = catalog.securities().collect();
            reporter(*format).write_catalog(out, &securities)
        }
        Command::Series {
            symbol,
            window,
            format,
        } => {
            let series = generate_series(config, &catalog, symbol, window)?;
            reporter(*format).write_series(out, &series)
        }
        Command::Indicators {
            symbol,
            input,
            window,
            format,
        } => {
            let (series, base_price) = match (symbol, input) {
                (_, Some(path)) => {
                    let (adapter, name) = input_for(path);
                    (adapter.read_price_series(&name)?, None)
                }
                (Some(symbol), None) => {
                    let base_price = catalog.lookup(symbol)?.base_price;
                    (generate_series(config, &catalog, symbol, window)?, Some(base_price))
                }
                (None, None) => {
                    return Err(MarketsimError::InvalidSeries {
                        reason: "either a symbol or an input file is required".into(),
                    });
                }
            };
            let samples = build_engine(config, base_price).compute(&series)?;
            tracing::info!(samples = samples.len(), "indicators computed");
            reporter(*format).write_indicators(out, &samples)
        }
        Command::Forecast {
            symbol,
            side,
            seed,
            latency_ms,
            timeout_ms,
            format,
        } => {
            let forecaster = build_forecaster(config, catalog, *latency_ms);
            let seed = seed.or_else(|| config_seed(config));
            let forecast = run_forecast(&forecaster, symbol, *side, seed, *timeout_ms)?;
            tracing::info!(
                symbol = %forecast.symbol,
                direction = %forecast.direction,
                "forecast complete"
            );
            reporter(*format).write_forecast(out, &forecast)
        }
        Command::Portfolio {
            positions,
            search,
            filter,
            format,
        } => {
            let (adapter, name) = input_for(positions);
            let summary = aggregate(&adapter.read_positions(&name)?);
            for warning in &summary.warnings {
                eprintln!("warning: {warning}");
            }
            let rows = summary.filter(search, *filter);
            tracing::info!(
                positions = summary.positions.len(),
                shown = rows.len(),
                "portfolio aggregated"
            );
            reporter(*format).write_portfolio(out, &rows, &summary.totals, &summary.warnings)
        }
    }
}

fn reporter(format: OutputFormat) -> &'static dyn ReportPort {
    match format {
        OutputFormat::Json => &JsonReportAdapter,
        OutputFormat::Csv => &CsvReportAdapter,
    }
}

fn input_for(path: &Path) -> (CsvAdapter, String) {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (CsvAdapter::new(dir), name)
}

fn generate_series(
    config: &dyn ConfigPort,
    catalog: &Catalog,
    symbol: &str,
    window: &WindowArgs,
) -> Result<Vec<PricePoint>, MarketsimError> {
    let (start, end) = resolve_window(config, window);
    let mut rng = seeded_rng(window.seed.or_else(|| config_seed(config)));
    let series = build_generator(config).generate_for(catalog, symbol, start, end, &mut rng)?;
    tracing::info!(symbol, %start, %end, points = series.len(), "series generated");
    Ok(series)
}

fn run_forecast(
    forecaster: &DelayedForecaster,
    symbol: &str,
    side: OrderSide,
    seed: Option<u64>,
    timeout_ms: Option<u64>,
) -> Result<Forecast, MarketsimError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let request = forecaster.forecast(symbol, side, seed);
        match timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(Duration::from_millis(timeout_ms), request)
                .await
                .map_err(|_| MarketsimError::ForecastTimeout { timeout_ms })?,
            None => request.await,
        }
    })
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn config_seed(config: &dyn ConfigPort) -> Option<u64> {
    config
        .get_string("generator", "seed")
        .and_then(|s| s.trim().parse().ok())
}

/// Default window when neither the command line nor the config names one.
pub fn default_window() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2025, 8, 31).unwrap_or_default(),
    )
}

/// Command-line dates win over `[generator]` dates, which win over the default window.
pub fn resolve_window(config: &dyn ConfigPort, window: &WindowArgs) -> (NaiveDate, NaiveDate) {
    let (default_start, default_end) = default_window();
    let start = window
        .start
        .or_else(|| config.get_date("generator", "start_date"))
        .unwrap_or(default_start);
    let end = window
        .end
        .or_else(|| config.get_date("generator", "end_date"))
        .unwrap_or(default_end);
    (start, end)
}

/// Built-in securities plus any `[security:SYMBOL]` sections; a configured
/// symbol replaces the built-in entry of the same name.
pub fn build_catalog(config: &dyn ConfigPort) -> Catalog {
    let mut catalog = Catalog::builtin();
    for section in config
        .sections()
        .into_iter()
        .filter(|s| s.starts_with(SECURITY_SECTION_PREFIX))
    {
        let symbol = section[SECURITY_SECTION_PREFIX.len()..].trim().to_uppercase();
        let name = config
            .get_string(&section, "name")
            .unwrap_or_else(|| symbol.clone());
        let base_price = config.get_double(&section, "base_price", DEFAULT_BASE_PRICE);
        let quote_price = config.get_double(&section, "quote_price", base_price);
        let drift_rate = config.get_double(&section, "drift_rate", DEFAULT_DRIFT_RATE);

        tracing::debug!(%symbol, base_price, quote_price, "configured security");
        catalog.insert(Security::new(&symbol, &name, base_price, quote_price, drift_rate));
    }
    catalog
}

pub fn build_generator(config: &dyn ConfigPort) -> PriceSeriesGenerator {
    PriceSeriesGenerator::new(config.get_double("generator", "volatility", DEFAULT_VOLATILITY))
}

/// `ema_seed = base` seeds the EMA with `base_price` when one is known;
/// otherwise the first price is used.
pub fn build_engine(config: &dyn ConfigPort, base_price: Option<f64>) -> IndicatorEngine {
    let period = |key: &str, default: usize| config.get_int("indicators", key, default as i64) as usize;
    let engine = IndicatorEngine {
        sma_period: period("sma_period", DEFAULT_SMA_PERIOD),
        ema_period: period("ema_period", DEFAULT_EMA_PERIOD),
        rsi_period: period("rsi_period", DEFAULT_RSI_PERIOD),
        ema_seed: EmaSeed::FirstPrice,
    };

    let wants_base = config
        .get_string("indicators", "ema_seed")
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("base"));
    match (wants_base, base_price) {
        (true, Some(base)) => engine.with_ema_seed(EmaSeed::Value(base)),
        (true, None) => {
            tracing::warn!("ema_seed = base needs a catalog symbol; seeding with the first price");
            engine
        }
        (false, _) => engine,
    }
}

pub fn build_simulator(config: &dyn ConfigPort) -> ForecastSimulator {
    ForecastSimulator::new(config.get_double("forecast", "up_probability", DEFAULT_UP_PROBABILITY))
}

pub fn build_forecaster(
    config: &dyn ConfigPort,
    catalog: Catalog,
    latency_override: Option<u64>,
) -> DelayedForecaster {
    let latency_ms = latency_override.unwrap_or_else(|| {
        config.get_int("forecast", "latency_ms", DEFAULT_LATENCY.as_millis() as i64) as u64
    });
    DelayedForecaster::new(build_simulator(config), catalog)
        .with_latency(Duration::from_millis(latency_ms))
}
