//! The model represents the static input data provided by the user.
use crate::forecast::{ForecastProvider, HistoricalForecast};
use crate::input::history::read_historical_forecast;
use crate::input::scenario::read_scenarios;
use crate::input::source::read_source_parameters;
use crate::scenario::ScenarioMap;
use crate::source::SourceParameterMap;
use anyhow::{Result, ensure};
use log::debug;
use std::path::{Path, PathBuf};

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
#[derive(Debug)]
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Cost and emissions attributes of each source
    pub sources: SourceParameterMap,
    /// Scenarios to dispatch, in file order
    pub scenarios: ScenarioMap,
    /// Forecast built from the historical dataset, if one was provided
    pub historical_forecast: Option<HistoricalForecast>,
}

impl Model {
    /// Read a model from the specified directory.
    ///
    /// All input data is validated before the model is returned.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model, or an error if any of the input files are missing or invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
        let model_dir = model_dir.as_ref();
        let parameters = ModelParameters::from_path(model_dir)?;
        let sources = read_source_parameters(model_dir)?;
        let scenarios = read_scenarios(model_dir)?;
        let historical_forecast = read_historical_forecast(model_dir)?;

        if historical_forecast.is_none() {
            let missing: Vec<_> = scenarios
                .values()
                .filter(|scenario| scenario.needs_forecast())
                .map(|scenario| scenario.id.to_string())
                .collect();
            ensure!(
                missing.is_empty(),
                "No historical data provided, but the following scenarios do not specify all \
                forecast values: {}",
                missing.join(", ")
            );
        }

        debug!(
            "Read {} scenarios from {}",
            scenarios.len(),
            model_dir.display()
        );

        Ok(Model {
            model_path: model_dir.to_path_buf(),
            parameters,
            sources,
            scenarios,
            historical_forecast,
        })
    }

    /// The provider used to fill in forecast values missing from scenarios
    pub fn forecast_provider(&self) -> Option<&dyn ForecastProvider> {
        self.historical_forecast
            .as_ref()
            .map(|forecast| forecast as &dyn ForecastProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    fn write_sources(dir: &Path) {
        write_file(
            dir,
            "sources.csv",
            "source,unit_cost,emission_factor
solar,30,0
wind,25,0
hydro,40,10
gas,80,450
nuclear,90,900",
        );
    }

    #[test]
    fn test_model_from_path_without_history() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        write_file(
            dir.path(),
            "scenarios.csv",
            "id,hour,demand,solar,wind,hydro\nreference,13,300,200,150,100",
        );

        let model = Model::from_path(dir.path()).unwrap();
        assert_eq!(model.parameters, ModelParameters::default());
        assert_eq!(model.scenarios.len(), 1);
        assert!(model.forecast_provider().is_none());
    }

    #[test]
    fn test_model_from_path_missing_history() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        write_file(
            dir.path(),
            "scenarios.csv",
            "id,hour,demand,solar,wind,hydro
reference,13,300,200,150,100
noon,12,580,,,
evening,19,450,0,,",
        );

        assert_error!(
            Model::from_path(dir.path()),
            "No historical data provided, but the following scenarios do not specify all \
            forecast values: noon, evening"
        );
    }

    #[test]
    fn test_model_from_path_with_history() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        write_file(
            dir.path(),
            "scenarios.csv",
            "id,hour,demand,solar,wind,hydro\nnoon,12,580,,,",
        );
        write_file(
            dir.path(),
            "history.csv",
            "datetime,solar_pv,wind,hydro\n2024-06-03T12:00:00,180,140,90",
        );

        let model = Model::from_path(dir.path()).unwrap();
        let provider = model.forecast_provider().unwrap();
        let forecast = model.scenarios["noon"]
            .generation_forecast(Some(provider))
            .unwrap();
        assert_eq!(forecast.solar.value().to_bits(), 180.0f64.to_bits());
    }

    #[test]
    fn test_model_from_path_no_sources() {
        let dir = tempdir().unwrap();
        assert!(Model::from_path(dir.path()).is_err());
    }
}
