//! Forecast-driven least-cost dispatch of a five-source electricity generation mix.
//!
//! The availability of each source is resolved from a generation forecast and fixed ceilings, then
//! the cheapest dispatch meeting demand is found with a merit-order optimiser.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod availability;
pub mod cli;
pub mod dispatch;
pub mod forecast;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod scenario;
pub mod settings;
pub mod simulation;
pub mod source;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the folder where program settings are stored
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("energy-mix");

    path
}
