use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use landed::cli::calc::CalcOptions;
use landed::core::log::init_logging;
use landed::core::scenario::{Field, InputUpdate, parse_amount};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn amount(value: &str) -> Result<f64, String> {
    Ok(parse_amount(value))
}

#[derive(Args)]
struct CalcArgs {
    /// Product cost in TRY
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    product_cost: Option<f64>,
    /// Freight cost in EUR
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    freight_cost: Option<f64>,
    /// TRY per EUR
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    euro_rate: Option<f64>,
    /// TRY per SEK
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    sek_rate: Option<f64>,
    /// Selling price in SEK per ton, excluding VAT
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    selling_price: Option<f64>,
    /// Quantity in tons
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    tonnage: Option<f64>,
    /// VAT rate in percent
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    kdv_rate: Option<f64>,
    /// Income tax rate in percent
    #[arg(long, value_parser = amount, allow_negative_numbers = true)]
    tax_rate: Option<f64>,
    /// Desired net profit in SEK per ton
    #[arg(
        long,
        visible_alias = "target",
        value_parser = amount,
        allow_negative_numbers = true
    )]
    target_net_profit_per_unit: Option<f64>,

    /// Fetch current EUR/TRY and SEK/TRY rates before calculating
    #[arg(short, long)]
    refresh_rates: bool,

    /// Print inputs and results as JSON
    #[arg(long)]
    json: bool,
}

impl From<CalcArgs> for CalcOptions {
    fn from(args: CalcArgs) -> CalcOptions {
        let values = [
            (Field::ProductCost, args.product_cost),
            (Field::FreightCost, args.freight_cost),
            (Field::EuroRate, args.euro_rate),
            (Field::SekRate, args.sek_rate),
            (Field::SellingPrice, args.selling_price),
            (Field::Tonnage, args.tonnage),
            (Field::KdvRate, args.kdv_rate),
            (Field::TaxRate, args.tax_rate),
            (Field::TargetNetProfitPerUnit, args.target_net_profit_per_unit),
        ];
        let overrides = values
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field, v)))
            .fold(InputUpdate::new(), |update, (field, v)| update.set(field, v));

        CalcOptions {
            overrides,
            refresh_rates: args.refresh_rates,
            json: args.json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Calculate landed cost, profit and the target selling price
    Calc(CalcArgs),
    /// Show the current EUR/TRY and SEK/TRY exchange rates
    Rates,
    /// Edit a scenario interactively
    Edit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => landed::cli::setup::setup(),
        Some(Commands::Calc(args)) => {
            landed::run_command(landed::AppCommand::Calc(args.into()), config_path).await
        }
        Some(Commands::Rates) => landed::run_command(landed::AppCommand::Rates, config_path).await,
        Some(Commands::Edit) => landed::run_command(landed::AppCommand::Edit, config_path).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
