//! Core business logic: the scenario model, the calculation engine and the
//! exchange rate boundary.

pub mod calculator;
pub mod config;
pub mod currency;
pub mod log;
pub mod rates;
pub mod scenario;

// Re-export main types for cleaner imports
pub use calculator::{ScenarioResults, compute};
pub use currency::CurrencyRateProvider;
pub use rates::{RateQuote, refresh_rates};
pub use scenario::{Field, InputUpdate, ScenarioInputs};
