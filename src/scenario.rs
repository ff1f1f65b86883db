//! Scenarios are the forecast/demand combinations for which dispatch is optimised.
use crate::forecast::{ForecastProvider, GenerationForecast};
use crate::id::{define_id_getter, define_id_type};
use crate::units::Energy;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

define_id_type! {ScenarioID}

/// A map of [`Scenario`]s, keyed by scenario ID, in file order
pub type ScenarioMap = IndexMap<ScenarioID, Scenario>;

/// A single planning interval to dispatch.
///
/// Forecast values given explicitly take precedence. Any which are missing are taken from a
/// [`ForecastProvider`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scenario {
    /// A unique identifier for the scenario
    pub id: ScenarioID,
    /// The hour of day (0-23) the scenario represents
    pub hour: u32,
    /// Forecast demand to be met
    pub demand: Energy,
    /// Forecast solar output
    pub solar: Option<Energy>,
    /// Forecast wind output
    pub wind: Option<Energy>,
    /// Historical mean hydro output
    pub hydro: Option<Energy>,
}
define_id_getter! {Scenario, ScenarioID}

impl Scenario {
    /// Whether any forecast values must come from a [`ForecastProvider`]
    pub fn needs_forecast(&self) -> bool {
        self.solar.is_none() || self.wind.is_none() || self.hydro.is_none()
    }

    /// Get the generation forecast for this scenario.
    ///
    /// # Arguments
    ///
    /// * `provider` - Used to fill in values not given explicitly
    ///
    /// # Returns
    ///
    /// The combined forecast, or an error if a value is missing and no provider can supply it
    pub fn generation_forecast(
        &self,
        provider: Option<&dyn ForecastProvider>,
    ) -> Result<GenerationForecast> {
        if let (Some(solar), Some(wind), Some(hydro)) = (self.solar, self.wind, self.hydro) {
            return Ok(GenerationForecast {
                solar,
                wind,
                hydro_historical_mean: hydro,
            });
        }

        let provider = provider.with_context(|| {
            format!(
                "Scenario {} is missing forecast values and no historical data is available",
                self.id
            )
        })?;
        let forecast = provider
            .forecast(self.hour)
            .with_context(|| format!("Could not forecast generation for scenario {}", self.id))?;

        Ok(GenerationForecast {
            solar: self.solar.unwrap_or(forecast.solar),
            wind: self.wind.unwrap_or(forecast.wind),
            hydro_historical_mean: self.hydro.unwrap_or(forecast.hydro_historical_mean),
        })
    }
}
