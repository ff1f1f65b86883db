//! Forecasts of renewable generation.
//!
//! The dispatch core only needs three numbers per scenario: forecast solar output, forecast wind
//! output and a historical hydro average. Anything able to produce these can be plugged in by
//! implementing [`ForecastProvider`].
use crate::units::Energy;
use anyhow::{Result, bail, ensure};
use chrono::{NaiveDateTime, Timelike};
use log::debug;
use std::collections::HashMap;

/// The number of hours in a day
pub const HOURS_PER_DAY: u32 = 24;

/// Forecast inputs for the availability resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationForecast {
    /// Forecast solar output. May be negative due to model noise.
    pub solar: Energy,
    /// Forecast wind output. May be negative due to model noise.
    pub wind: Energy,
    /// Mean historical hydro output
    pub hydro_historical_mean: Energy,
}

/// A source of generation forecasts
pub trait ForecastProvider {
    /// Forecast generation for the given hour of day (0-23)
    fn forecast(&self, hour: u32) -> Result<GenerationForecast>;
}

/// A single observation from the historical generation dataset
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalObservation {
    /// When the observation was made
    pub datetime: NaiveDateTime,
    /// Observed solar output
    pub solar: Energy,
    /// Observed wind output
    pub wind: Energy,
    /// Observed hydro output
    pub hydro: Energy,
}

/// Running totals used to calculate means
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Accumulator {
    total: f64,
    count: u32,
}

impl Accumulator {
    fn add(&mut self, value: Energy) {
        self.total += value.value();
        self.count += 1;
    }

    fn mean(self) -> Energy {
        Energy(self.total / f64::from(self.count))
    }
}

/// A climatological forecast derived from historical observations.
///
/// Solar and wind are forecast as the mean of all observations made at the same hour of day. Hydro
/// is the mean of all observations. The statistics are computed once, when the forecast is
/// created.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalForecast {
    solar_by_hour: HashMap<u32, Accumulator>,
    wind_by_hour: HashMap<u32, Accumulator>,
    hydro_historical_mean: Energy,
}

impl HistoricalForecast {
    /// Build a forecast from historical observations.
    ///
    /// # Arguments
    ///
    /// * `observations` - The historical dataset
    ///
    /// # Returns
    ///
    /// A new [`HistoricalForecast`] or an error if there are no observations
    pub fn from_observations<'a, I>(observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a HistoricalObservation>,
    {
        let mut solar_by_hour: HashMap<u32, Accumulator> = HashMap::new();
        let mut wind_by_hour: HashMap<u32, Accumulator> = HashMap::new();
        let mut hydro = Accumulator::default();
        for observation in observations {
            let hour = observation.datetime.hour();
            solar_by_hour.entry(hour).or_default().add(observation.solar);
            wind_by_hour.entry(hour).or_default().add(observation.wind);
            hydro.add(observation.hydro);
        }

        ensure!(hydro.count > 0, "Historical dataset contains no observations");
        debug!(
            "Built historical forecast from {} observations covering {} hours of the day",
            hydro.count,
            solar_by_hour.len()
        );

        Ok(Self {
            solar_by_hour,
            wind_by_hour,
            hydro_historical_mean: hydro.mean(),
        })
    }

    /// The mean of all historical hydro observations
    pub fn hydro_historical_mean(&self) -> Energy {
        self.hydro_historical_mean
    }
}

impl ForecastProvider for HistoricalForecast {
    fn forecast(&self, hour: u32) -> Result<GenerationForecast> {
        ensure!(hour < HOURS_PER_DAY, "Invalid hour of day: {hour}");

        let (Some(solar), Some(wind)) =
            (self.solar_by_hour.get(&hour), self.wind_by_hour.get(&hour))
        else {
            bail!("No historical observations for hour {hour}");
        };

        Ok(GenerationForecast {
            solar: solar.mean(),
            wind: wind.mean(),
            hydro_historical_mean: self.hydro_historical_mean,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, historical_observations};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_historical_forecast_hour_means(historical_observations: Vec<HistoricalObservation>) {
        let forecaster = HistoricalForecast::from_observations(&historical_observations).unwrap();

        let noon = forecaster.forecast(12).unwrap();
        assert_approx_eq!(f64, noon.solar.value(), 200.0);
        assert_approx_eq!(f64, noon.wind.value(), 150.0);

        let afternoon = forecaster.forecast(13).unwrap();
        assert_approx_eq!(f64, afternoon.solar.value(), 220.0);
        assert_approx_eq!(f64, afternoon.wind.value(), 110.0);
    }

    #[rstest]
    fn test_historical_forecast_hydro_is_overall_mean(
        historical_observations: Vec<HistoricalObservation>,
    ) {
        let forecaster = HistoricalForecast::from_observations(&historical_observations).unwrap();
        assert_approx_eq!(f64, forecaster.hydro_historical_mean().value(), 97.5);

        // Same value regardless of hour
        for hour in [12, 13] {
            assert_eq!(
                forecaster.forecast(hour).unwrap().hydro_historical_mean,
                forecaster.hydro_historical_mean()
            );
        }
    }

    #[rstest]
    fn test_historical_forecast_missing_hour(historical_observations: Vec<HistoricalObservation>) {
        let forecaster = HistoricalForecast::from_observations(&historical_observations).unwrap();
        assert_error!(
            forecaster.forecast(3),
            "No historical observations for hour 3"
        );
        assert_error!(forecaster.forecast(24), "Invalid hour of day: 24");
    }

    #[test]
    fn test_historical_forecast_empty() {
        assert_error!(
            HistoricalForecast::from_observations(std::iter::empty()),
            "Historical dataset contains no observations"
        );
    }
}
