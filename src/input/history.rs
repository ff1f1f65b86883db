//! Code for reading the historical generation dataset.
use super::{input_err_msg, read_csv_optional};
use crate::forecast::{HistoricalForecast, HistoricalObservation};
use crate::units::Energy;
use anyhow::{Context, Result, ensure};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::Path;

const HISTORY_FILE_NAME: &str = "history.csv";

/// Represents a row of the history CSV file
#[derive(Debug, Clone, Deserialize, PartialEq)]
struct HistoryRaw {
    datetime: NaiveDateTime,
    solar_pv: f64,
    wind: f64,
    hydro: f64,
}

/// Read the historical dataset and build a forecast from it.
///
/// The dataset is optional.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A [`HistoricalForecast`] if the history file exists, `None` if it doesn't, or an error
pub fn read_historical_forecast(model_dir: &Path) -> Result<Option<HistoricalForecast>> {
    let file_path = model_dir.join(HISTORY_FILE_NAME);
    let Some(rows) = read_csv_optional::<HistoryRaw>(&file_path)? else {
        return Ok(None);
    };

    let observations = rows
        .into_iter()
        .map(observation_from_raw)
        .collect::<Result<Vec<_>>>()
        .with_context(|| input_err_msg(&file_path))?;
    let forecast = HistoricalForecast::from_observations(&observations)
        .with_context(|| input_err_msg(&file_path))?;

    Ok(Some(forecast))
}

/// Validate a row of the history file
fn observation_from_raw(raw: HistoryRaw) -> Result<HistoricalObservation> {
    for (name, value) in [
        ("solar_pv", raw.solar_pv),
        ("wind", raw.wind),
        ("hydro", raw.hydro),
    ] {
        ensure!(
            value.is_finite(),
            "Observation at {}: {name} must be a finite number",
            raw.datetime
        );
    }

    Ok(HistoricalObservation {
        datetime: raw.datetime,
        solar: Energy(raw.solar_pv),
        wind: Energy(raw.wind),
        hydro: Energy(raw.hydro),
    })
}
