//! Resolves forecasts into the capacity each source can dispatch.
use crate::forecast::GenerationForecast;
use crate::model::ModelParameters;
use crate::source::{Source, SourceMap};
use crate::units::Energy;
use anyhow::{Result, ensure};
use log::debug;

/// The range of output a single source can contribute: `[0, max_available]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityBound {
    max_available: Energy,
}

impl CapacityBound {
    /// Create a new bound, clamping negative values to zero.
    ///
    /// The value must be finite.
    pub fn new(max_available: Energy) -> Self {
        debug_assert!(max_available.is_finite());
        Self {
            max_available: max_available.max(Energy(0.0)),
        }
    }

    /// The upper end of the interval
    pub fn max_available(&self) -> Energy {
        self.max_available
    }

    /// Whether `value` lies within the bound, allowing for a small tolerance
    pub fn contains(&self, value: Energy, tolerance: Energy) -> bool {
        value >= Energy(0.0) - tolerance && value <= self.max_available + tolerance
    }
}

/// The capacity bounds for every source
pub type CapacityBounds = SourceMap<CapacityBound>;

/// Check that a forecast value can be turned into a bound
fn check_forecast_value(name: &str, value: Energy) -> Result<Energy> {
    ensure!(value.is_finite(), "{name} forecast is not a finite number: {value}");
    if value < Energy(0.0) {
        debug!("Clamping negative {name} forecast ({value}) to zero");
    }

    Ok(value)
}

/// Turn forecasts into per-source capacity bounds.
///
/// Negative solar, wind and hydro values are clamped to zero. Gas and nuclear use the installed
/// capacity ceilings from the model parameters.
///
/// # Arguments
///
/// * `forecast` - Forecast renewable output and historical hydro average
/// * `parameters` - Model parameters containing the gas and nuclear ceilings
///
/// # Returns
///
/// The capacity bounds, or an error if any forecast value is NaN or infinite
pub fn resolve(
    forecast: &GenerationForecast,
    parameters: &ModelParameters,
) -> Result<CapacityBounds> {
    let solar = check_forecast_value("solar", forecast.solar)?;
    let wind = check_forecast_value("wind", forecast.wind)?;
    let hydro = check_forecast_value("hydro", forecast.hydro_historical_mean)?;

    Ok(CapacityBounds::from_fn(|source| {
        let max_available = match source {
            Source::Solar => solar,
            Source::Wind => wind,
            Source::Hydro => hydro,
            Source::Gas => parameters.gas_ceiling,
            Source::Nuclear => parameters.nuclear_ceiling,
        };
        CapacityBound::new(max_available)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    fn forecast(solar: f64, wind: f64, hydro: f64) -> GenerationForecast {
        GenerationForecast {
            solar: Energy(solar),
            wind: Energy(wind),
            hydro_historical_mean: Energy(hydro),
        }
    }

    fn max_values(bounds: &CapacityBounds) -> [f64; 5] {
        let mut out = [0.0; 5];
        for (source, bound) in bounds.iter() {
            out[source.index()] = bound.max_available().value();
        }
        out
    }

    #[test]
    fn test_resolve() {
        let bounds = resolve(&forecast(200.0, 150.0, 100.0), &ModelParameters::default()).unwrap();
        assert_eq!(max_values(&bounds), [200.0, 150.0, 100.0, 300.0, 300.0]);
    }

    #[test]
    fn test_resolve_custom_ceilings() {
        let parameters = ModelParameters {
            gas_ceiling: Energy(120.0),
            nuclear_ceiling: Energy(0.0),
        };
        let bounds = resolve(&forecast(1.0, 2.0, 3.0), &parameters).unwrap();
        assert_eq!(max_values(&bounds), [1.0, 2.0, 3.0, 120.0, 0.0]);
    }

    #[rstest]
    #[case(forecast(-15.0, 150.0, 100.0), [0.0, 150.0, 100.0, 300.0, 300.0])]
    #[case(forecast(200.0, -0.5, 100.0), [200.0, 0.0, 100.0, 300.0, 300.0])]
    #[case(forecast(-1.0, -2.0, -3.0), [0.0, 0.0, 0.0, 300.0, 300.0])]
    fn test_resolve_clamps_negative(#[case] input: GenerationForecast, #[case] expected: [f64; 5]) {
        let bounds = resolve(&input, &ModelParameters::default()).unwrap();
        assert_eq!(max_values(&bounds), expected);
    }

    #[rstest]
    #[case(forecast(f64::NAN, 1.0, 1.0), "solar forecast is not a finite number: NaN")]
    #[case(forecast(1.0, f64::INFINITY, 1.0), "wind forecast is not a finite number: inf")]
    #[case(
        forecast(1.0, 1.0, f64::NEG_INFINITY),
        "hydro forecast is not a finite number: -inf"
    )]
    fn test_resolve_rejects_non_finite(#[case] input: GenerationForecast, #[case] msg: &str) {
        assert_error!(resolve(&input, &ModelParameters::default()), msg);
    }

    #[test]
    fn test_capacity_bound_contains() {
        let bound = CapacityBound::new(Energy(10.0));
        let tolerance = Energy(1e-6);
        assert!(bound.contains(Energy(0.0), tolerance));
        assert!(bound.contains(Energy(10.0 + 1e-7), tolerance));
        assert!(!bound.contains(Energy(10.1), tolerance));
        assert!(!bound.contains(Energy(-0.1), tolerance));
    }
}
