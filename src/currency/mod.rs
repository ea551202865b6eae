//! Player currency

pub mod ledger;

pub use ledger::CurrencyLedger;
