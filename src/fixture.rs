//! Fixtures for tests

use crate::availability::{CapacityBound, CapacityBounds};
use crate::forecast::{HistoricalForecast, HistoricalObservation};
use crate::model::{Model, ModelParameters};
use crate::scenario::Scenario;
use crate::source::{SourceMap, SourceParameterMap, reference_source_parameters};
use crate::units::Energy;
use indexmap::indexmap;
use rstest::fixture;
use std::path::PathBuf;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Capacity bounds for solar, wind, hydro, gas and nuclear, in that order
pub fn bounds(max_available: [f64; 5]) -> CapacityBounds {
    SourceMap::from(max_available.map(|value| CapacityBound::new(Energy(value))))
}

#[fixture]
pub fn reference_sources() -> SourceParameterMap {
    reference_source_parameters()
}

#[fixture]
pub fn historical_observations() -> Vec<HistoricalObservation> {
    [
        ("2024-06-03T12:00:00", 180.0, 140.0, 90.0),
        ("2024-06-03T13:00:00", 200.0, 120.0, 110.0),
        ("2024-06-04T12:00:00", 220.0, 160.0, 100.0),
        ("2024-06-04T13:00:00", 240.0, 100.0, 90.0),
    ]
    .into_iter()
    .map(|(datetime, solar, wind, hydro)| HistoricalObservation {
        datetime: datetime.parse().unwrap(),
        solar: Energy(solar),
        wind: Energy(wind),
        hydro: Energy(hydro),
    })
    .collect()
}

#[fixture]
pub fn scenario() -> Scenario {
    Scenario {
        id: "reference".into(),
        hour: 13,
        demand: Energy(300.0),
        solar: Some(Energy(200.0)),
        wind: Some(Energy(150.0)),
        hydro: Some(Energy(100.0)),
    }
}

#[fixture]
pub fn model(
    scenario: Scenario,
    reference_sources: SourceParameterMap,
    historical_observations: Vec<HistoricalObservation>,
) -> Model {
    Model {
        model_path: PathBuf::from("model"),
        parameters: ModelParameters::default(),
        sources: reference_sources,
        scenarios: indexmap! {scenario.id.clone() => scenario},
        historical_forecast: Some(
            HistoricalForecast::from_observations(&historical_observations).unwrap(),
        ),
    }
}
