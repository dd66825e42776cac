//! DCF CLI binary.
//!
//! Values a single company from statement documents and a price file on disk.

use clap::{Args, Parser, Subcommand, ValueEnum};
use dcf::data::{JsonFileSource, PriceHistory, StatementBundle, StatementSource, parse_date};
use dcf::output::{ExportFormat, Exporter, Report, ValuationExport, ValuationSummary};
use dcf::valuation::{Absence, FIELD_MAP};
use dcf::{Pipeline, ValuationConfig};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dcf")]
#[command(about = "Discounted cash flow valuation", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: <config dir>/dcf/config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every pipeline stage to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value a company from files on disk
    Value {
        /// Stock symbol
        symbol: String,

        /// Directory holding <SYMBOL>.json or <SYMBOL>Data.json + <SYMBOL>PriorData.json
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,

        /// Price CSV with date and close columns (default: <data-dir>/<SYMBOL>.csv)
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Override the filing date (YYYY-MM-DD)
        #[arg(long)]
        filing_date: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// List the metric vocabulary and provider keys
    Fields,

    /// Print the effective configuration
    Config {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// ASCII summary table
    Text,
    /// Markdown summary
    Markdown,
    /// Every figure as section,name,value rows
    Csv,
    /// Every figure as JSON rows
    Json,
    /// Full evaluation in a timestamped report
    Report,
}

#[derive(Args, Default)]
struct ConfigOverrides {
    /// Risk-free rate
    #[arg(long)]
    risk_free_rate: Option<f64>,

    /// Expected market return
    #[arg(long)]
    market_return: Option<f64>,

    /// Reference corporate bond yield
    #[arg(long)]
    bond_yield: Option<f64>,

    /// Enterprise value damping factor
    #[arg(long)]
    damping: Option<f64>,

    /// Debt divisor
    #[arg(long)]
    debt_divisor: Option<f64>,

    /// Per-share value scale
    #[arg(long)]
    share_scale: Option<f64>,

    /// Price match window in calendar days
    #[arg(long)]
    window: Option<u32>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut ValuationConfig) {
        let rates = &mut config.macro_inputs;
        rates.risk_free_rate = self.risk_free_rate.unwrap_or(rates.risk_free_rate);
        rates.expected_market_return = self.market_return.unwrap_or(rates.expected_market_return);
        rates.bond_yield = self.bond_yield.unwrap_or(rates.bond_yield);

        let calibration = &mut config.calibration;
        calibration.damping_factor = self.damping.unwrap_or(calibration.damping_factor);
        calibration.debt_divisor = self.debt_divisor.unwrap_or(calibration.debt_divisor);
        calibration.share_value_scale = self.share_scale.unwrap_or(calibration.share_value_scale);

        config.price_match_window_days = self.window.unwrap_or(config.price_match_window_days);
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Value {
            symbol,
            data_dir,
            prices,
            filing_date,
            format,
            output,
            overrides,
        } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let request = ValueRequest {
                symbol: &symbol,
                data_dir: &data_dir,
                prices: prices.as_deref(),
                filing_date: filing_date.as_deref(),
            };
            let rendered = value_symbol(&request, config, format)?;
            match output {
                Some(path) => std::fs::write(path, rendered)?,
                None => print!("{rendered}"),
            }
        }
        Commands::Fields => print_fields(),
        Commands::Config { overrides } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dcf").join("config.json"))
}

fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ValuationConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => ValuationConfig::from_json_file(path)?,
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                debug!(path = %path.display(), "using default config file");
                ValuationConfig::from_json_file(&path)?
            }
            None => ValuationConfig::default(),
        },
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

struct ValueRequest<'a> {
    symbol: &'a str,
    data_dir: &'a Path,
    prices: Option<&'a Path>,
    filing_date: Option<&'a str>,
}

fn value_symbol(
    request: &ValueRequest<'_>,
    config: ValuationConfig,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let source = JsonFileSource::new(request.data_dir);
    let mut bundle = source.load(request.symbol)?;
    if let Some(date) = request.filing_date {
        bundle = StatementBundle::new(&bundle.symbol, parse_date(date)?, bundle.current, bundle.prior)?;
    }

    let prices_path = request.prices.map_or_else(
        || request.data_dir.join(format!("{}.csv", bundle.symbol)),
        Path::to_path_buf,
    );
    let prices = PriceHistory::from_csv_path(&prices_path)?;
    debug!(path = %prices_path.display(), observations = prices.len(), "loaded prices");

    let evaluation = Pipeline::new(config)?.run(&bundle, &prices)?;

    let rendered = match format {
        OutputFormat::Text => ValuationSummary::from_evaluation(&evaluation).to_ascii_table(),
        OutputFormat::Markdown => ValuationSummary::from_evaluation(&evaluation).to_markdown(),
        OutputFormat::Csv => {
            ValuationExport::from_evaluation(&evaluation).export_to_string(ExportFormat::Csv)?
        }
        OutputFormat::Json => {
            let json = ValuationExport::from_evaluation(&evaluation)
                .export_to_string(ExportFormat::PrettyJson)?;
            format!("{json}\n")
        }
        OutputFormat::Report => format!("{}\n", Report::from_evaluation(&evaluation)?.to_json()?),
    };
    Ok(rendered)
}

fn print_fields() {
    println!("{:<26} {:<16} {:<8} Provider keys", "Metric", "When absent", "Prior");
    println!("{}", "-".repeat(90));
    for spec in FIELD_MAP {
        let absence = match spec.absence {
            Absence::Fail => "fail".to_string(),
            Absence::Default(value) => format!("default {value}"),
            Absence::Omit => "omit".to_string(),
        };
        let prior = if spec.required_in_prior { "required" } else { "optional" };
        println!(
            "{:<26} {:<16} {:<8} {}",
            spec.metric.key(),
            absence,
            prior,
            spec.keys.join(", ")
        );
    }
}
