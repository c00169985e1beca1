pub mod calc;
pub mod rates;
pub mod session;
pub mod setup;
pub mod ui;
