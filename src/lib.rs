//! customer-spend: filter a customer/transaction dataset and chart a selected customer's daily
//! spending.
//!
//! The pipeline is `source` -> `store` -> `join` (with `filter`) for the table, and
//! `select` -> `aggregate` -> `chart` for the chart. `dashboard::Dashboard` wires the steps
//! together and recomputes only what an event invalidates.

pub mod aggregate;
pub mod args;
pub mod chart;
pub mod commands;
mod config;
pub mod dashboard;
mod error;
pub mod filter;
pub mod join;
pub mod model;
pub mod select;
pub mod source;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::Error;
pub use error::Result;
