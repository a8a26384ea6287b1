//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::domain::config_validation::{parse_date, validate_simulation_config};
use crate::domain::error::DcaError;
use crate::domain::period::{Interval, PeriodUnit};
use crate::domain::request::SimulationRequest;
use crate::domain::simulation::SimulationResult;
use crate::logging;
use crate::pipeline::run_simulation;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "dcasim", about = "Dollar-cost averaging simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a DCA simulation
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: SimulationOverrides,
        /// Report path; `.csv` writes the step table, anything else HTML
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List symbols available from the configured data source
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over `[simulation]`.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct SimulationOverrides {
    #[arg(long)]
    pub symbol: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
    /// 1d, 1wk or 1mo
    #[arg(long)]
    pub interval: Option<String>,
    /// day, week, month, quarter or year
    #[arg(long)]
    pub period: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
}

impl SimulationOverrides {
    fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("symbol", self.symbol.as_deref()),
            ("start_date", self.start.as_deref()),
            ("end_date", self.end.as_deref()),
            ("interval", self.interval.as_deref()),
            ("period", self.period.as_deref()),
            ("amount", self.amount.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

/// A config with `[simulation]` keys overridden from the command line.
pub struct LayeredConfig<'a> {
    base: &'a dyn ConfigPort,
    overrides: HashMap<(String, String), String>,
}

impl<'a> LayeredConfig<'a> {
    pub fn new(base: &'a dyn ConfigPort, overrides: &SimulationOverrides) -> Self {
        let overrides = overrides
            .entries()
            .into_iter()
            .map(|(key, value)| {
                (
                    ("simulation".to_string(), key.to_string()),
                    value.to_string(),
                )
            })
            .collect();
        Self { base, overrides }
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&String> {
        self.overrides.get(&(section.to_string(), key.to_string()))
    }
}

impl ConfigPort for LayeredConfig<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match self.lookup(section, key) {
            Some(v) => Some(v.clone()),
            None => self.base.get_string(section, key),
        }
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.lookup(section, key) {
            Some(v) => v.trim().parse().unwrap_or(default),
            None => self.base.get_int(section, key, default),
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.lookup(section, key) {
            Some(v) => v.trim().parse().unwrap_or(default),
            None => self.base.get_double(section, key, default),
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.lookup(section, key) {
            Some(v) => match v.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => true,
                "false" | "no" | "0" | "off" => false,
                _ => default,
            },
            None => self.base.get_bool(section, key, default),
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            overrides,
            output,
            dry_run,
        } => run_simulate(&config, &overrides, output.as_deref(), dry_run),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    let config = FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    logging::init(Some(&config));
    Ok(config)
}

/// Resolves and validates the simulation parameters from config.
pub fn build_simulation_request(config: &dyn ConfigPort) -> Result<SimulationRequest, DcaError> {
    validate_simulation_config(config)?;

    let invalid = |key: &str, reason: String| DcaError::ConfigInvalid {
        section: "simulation".to_string(),
        key: key.to_string(),
        reason,
    };

    let symbol = config.require_string("simulation", "symbol")?.to_uppercase();
    let start_date = parse_date(
        config.get_string("simulation", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = parse_date(
        config.get_string("simulation", "end_date").as_deref(),
        "end_date",
    )?;
    let interval = match config.get_string("simulation", "interval") {
        Some(raw) if !raw.trim().is_empty() => {
            raw.parse::<Interval>().map_err(|e| invalid("interval", e))?
        }
        _ => Default::default(),
    };
    let period = match config.get_string("simulation", "period") {
        Some(raw) if !raw.trim().is_empty() => {
            raw.parse::<PeriodUnit>().map_err(|e| invalid("period", e))?
        }
        _ => Default::default(),
    };
    let amount = config
        .require_string("simulation", "amount")?
        .parse::<f64>()
        .map_err(|e| invalid("amount", e.to_string()))?;

    let request = SimulationRequest {
        symbol,
        start_date,
        end_date,
        interval,
        period,
        amount,
    };
    request.validate()?;
    Ok(request)
}

/// Builds the price source named by `[data] source`.
pub fn build_data_port(
    config: &dyn ConfigPort,
) -> Result<Box<dyn PriceDataPort + Send + Sync>, DcaError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string());
    match source.trim().to_lowercase().as_str() {
        "csv" => {
            let dir = config
                .get_string("data", "csv_dir")
                .unwrap_or_else(|| "data".to_string());
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir.trim()))))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let adapter = crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?;
            Ok(Box::new(adapter))
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => Err(DcaError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: "sqlite feature is not enabled".to_string(),
        }),
        other => Err(DcaError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!("unknown data source '{other}' (expected csv or sqlite)"),
        }),
    }
}

/// Picks the report writer from the output file extension.
pub fn report_adapter_for(path: &Path) -> Box<dyn ReportPort> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvReportAdapter)
    } else {
        Box::new(HtmlReportAdapter::new())
    }
}

/// Fixed-width step table printed to stdout.
pub fn format_step_table(result: &SimulationResult) -> String {
    let mut out = format!(
        "{:<12} {:>12} {:>12} {:>16} {:>14} {:>16}\n",
        "Date", "Price", "Units", "Total Invested", "Shares", "Portfolio Value"
    );
    for step in result.steps() {
        out.push_str(&format!(
            "{:<12} {:>12.2} {:>12.2} {:>16.2} {:>14.6} {:>16.2}\n",
            step.date.to_string(),
            step.price,
            step.units_purchased,
            step.cumulative_invested,
            step.cumulative_units,
            step.portfolio_value,
        ));
    }
    out
}

fn run_simulate(
    config_path: &Path,
    overrides: &SimulationOverrides,
    output_path: Option<&Path>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load config and apply command-line overrides
    eprintln!("Loading config from {}", config_path.display());
    let base = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let config = LayeredConfig::new(&base, overrides);

    // Stage 2: Resolve the request
    let request = match build_simulation_request(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let output = output_path
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("report", "output").map(PathBuf::from));

    if dry_run {
        eprintln!("Config validated successfully");
        eprintln!("\nSimulation:");
        eprintln!("  symbol:   {}", request.symbol);
        eprintln!(
            "  range:    {} to {} (end exclusive)",
            request.start_date, request.end_date
        );
        eprintln!("  interval: {}", request.interval);
        eprintln!("  period:   {}", request.period);
        eprintln!("  amount:   {:.2}", request.amount);
        if let Some(path) = &output {
            eprintln!("  report:   {}", path.display());
        }
        eprintln!("\nDry run complete: configuration is valid");
        return ExitCode::SUCCESS;
    }

    // Stage 3: Data source
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Fetch, periodize and simulate
    eprintln!(
        "Simulating {} from {} to {}, {:.2} per {}",
        request.symbol, request.start_date, request.end_date, request.amount, request.period
    );
    let run = match run_simulation(data_port.as_ref(), &request) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "  {} price points, {} contributions",
        run.source_points,
        run.periodized.len()
    );

    // Stage 5: Print results
    print!("{}", format_step_table(&run.result));

    let summary = run.result.summary();
    eprintln!("\n=== DCA Summary ===");
    eprintln!("Final Portfolio Value: {:.2}", summary.final_portfolio_value);
    eprintln!("Total Investment:      {:.2}", summary.total_invested);
    eprintln!("Total Profit:          {:.2}", summary.total_profit);
    eprintln!("Return:                {:.2}%", summary.return_pct() * 100.0);

    // Stage 6: Report
    if let Some(path) = output {
        let adapter = report_adapter_for(&path);
        if let Err(e) = adapter.write(&run.result, &request, &path.to_string_lossy()) {
            eprintln!("error: failed to write report: {e}");
            return (&e).into();
        }
        eprintln!("\nReport written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match symbol {
        Some(s) => vec![s.trim().to_uppercase()],
        None => match data_port.list_symbols() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    for s in &symbols {
        match data_port.get_data_range(s) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} prices, {} to {}", s, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", s);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", s, e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_serve(config_path: &Path) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let data_port: Arc<dyn PriceDataPort + Send + Sync> = match build_data_port(&config) {
            Ok(p) => Arc::from(p),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let addr: SocketAddr = match listen.trim().parse() {
            Ok(a) => a,
            Err(_) => {
                let err = DcaError::ConfigInvalid {
                    section: "web".to_string(),
                    key: "listen".to_string(),
                    reason: format!("'{listen}' is not a socket address"),
                };
                eprintln!("error: {err}");
                return (&err).into();
            }
        };

        let router = build_router(AppState {
            data_port,
            config: Arc::new(config),
        });

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: failed to start runtime: {e}");
                return ExitCode::from(1);
            }
        };

        eprintln!("Starting web server on {}", addr);
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });
        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: web server failed: {e}");
                ExitCode::from(1)
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
