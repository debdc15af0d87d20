use analytics::{MarketReport, MissingDataPolicy, PricingEngine, PricingError};
use anyhow::{Context, Result};
use catalogue::StockCatalogue;
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{Config, OutputFormat, load_config_from};
use core_types::SystemClock;
use ledger::TradeLedger;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the GBCE market calculator.
fn main() {
    // Load RUST_LOG and friends from a .env file when one exists
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {}", e);
    }

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Report(args) => handle_report(args),
        Commands::Yield(args) => handle_yield(args),
        Commands::Stocks(args) => handle_stocks(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Dividend yield, P/E, volume-weighted prices and the All Share Index for the
/// Global Beverage Corporation Exchange.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the configured trades and print per-stock metrics and the index.
    Report(ReportArgs),
    /// Compute the dividend yield and P/E ratio of one stock at a given price.
    Yield(YieldArgs),
    /// List the configured stocks.
    Stocks(StocksArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Fail when a stock has no trades inside the window instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Output format; overrides `report.format` from the configuration.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Parser)]
struct YieldArgs {
    /// The stock symbol (e.g., "GIN").
    #[arg(long)]
    symbol: String,

    /// The market price in pence.
    #[arg(long)]
    price: Decimal,

    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[derive(Parser)]
struct StocksArgs {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load(path: &Path) -> Result<(Config, StockCatalogue)> {
    let config = load_config_from(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    let catalogue = config.catalogue()?;
    Ok((config, catalogue))
}

/// Builds the ledger from the seed trades and prints the market report.
fn handle_report(args: ReportArgs) -> Result<()> {
    let (config, catalogue) = load(&args.config)?;

    let ledger = TradeLedger::for_catalogue(&catalogue, Arc::new(SystemClock));
    for trade in &config.trades {
        ledger
            .register_trade(&trade.symbol, trade.side, trade.price, trade.quantity)
            .with_context(|| format!("Failed to register seed trade for {}", trade.symbol))?;
    }

    let policy = if args.strict || config.report.strict {
        MissingDataPolicy::Abort
    } else {
        MissingDataPolicy::Skip
    };

    let engine = PricingEngine::new();
    let report = engine.market_report(
        &catalogue,
        &ledger,
        &config.quote_map(),
        config.window()?,
        policy,
    )?;

    match args.format.unwrap_or(config.report.format) {
        OutputFormat::Table => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn handle_yield(args: YieldArgs) -> Result<()> {
    let (_config, catalogue) = load(&args.config)?;
    let stock = catalogue.lookup(&args.symbol)?;

    let engine = PricingEngine::new();
    let dividend_yield = engine.dividend_yield(stock, args.price)?;
    let pe_ratio = match engine.pe_ratio(args.price, dividend_yield) {
        Ok(ratio) => Some(ratio),
        Err(PricingError::DivisionByZero(_)) => None,
        Err(e) => return Err(e.into()),
    };

    println!("{} ({}) at {}", stock.symbol, stock.stock_class, args.price);
    println!("  Dividend yield: {}", dividend_yield);
    println!("  P/E ratio:      {}", or_na(pe_ratio));
    Ok(())
}

fn handle_stocks(args: StocksArgs) -> Result<()> {
    let (_config, catalogue) = load(&args.config)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Symbol",
        "Type",
        "Last Dividend",
        "Fixed Dividend",
        "Par Value",
    ]);

    for stock in catalogue.iter() {
        table.add_row(vec![
            stock.symbol.clone(),
            stock.stock_class.to_string(),
            stock.last_dividend.to_string(),
            stock
                .fixed_dividend_pct
                .map(|pct| format!("{}%", pct))
                .unwrap_or_default(),
            stock.par_value.to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn print_report(report: &MarketReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Symbol",
        "Type",
        "Price",
        "Dividend Yield",
        "P/E",
        "VWSP",
        "Trades",
    ]);

    for stock in &report.stocks {
        table.add_row(vec![
            stock.symbol.clone(),
            stock.stock_class.to_string(),
            or_na(stock.price),
            or_na(stock.dividend_yield),
            or_na(stock.pe_ratio),
            or_na(stock.vwsp),
            stock.recent_trades.to_string(),
        ]);
    }

    println!(
        "Market report at {} ({}s window)",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.window_secs
    );
    println!("{table}");
    println!("GBCE All Share Index: {}", or_na(report.all_share_index));
}

fn or_na(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
}
