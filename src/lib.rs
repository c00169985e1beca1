pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::calc::CalcOptions;
use crate::core::config::AppConfig;
use crate::providers::exchangerate_host::ExchangeRateHostProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Calc(CalcOptions),
    Rates,
    Edit,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

fn rate_provider(config: &AppConfig) -> ExchangeRateHostProvider {
    ExchangeRateHostProvider::new(config.exchangerate_url(), config.rates.timeout())
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("landed starting...");

    let config = load_config(config_path)?;
    let provider = rate_provider(&config);

    match command {
        AppCommand::Calc(options) => {
            let mut stdout = std::io::stdout();
            cli::calc::run(&config.scenario, &options, &provider, &mut stdout).await
        }
        AppCommand::Rates => cli::rates::run(&provider).await,
        AppCommand::Edit => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let session = cli::session::run(stdin, &mut stdout, config.scenario, &provider).await?;
            debug!(inputs = ?session.current(), "Session finished");
            Ok(())
        }
    }
}
