//! Functionality for dispatching a batch of scenarios.
use crate::availability::resolve;
use crate::dispatch::{DispatchProblem, DispatchResult, optimise};
use crate::model::Model;
use crate::output::DataWriter;
use crate::scenario::Scenario;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

/// A dispatch problem built for a scenario along with its result
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    /// The problem which was solved
    pub problem: DispatchProblem,
    /// The result of optimisation
    pub result: DispatchResult,
}

/// Run dispatch for every scenario in the model, in file order.
///
/// # Arguments:
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write additional information (e.g. merit order) to file
pub fn run(model: &Model, output_path: &Path, debug_model: bool) -> Result<()> {
    let mut writer = DataWriter::create(output_path, &model.model_path, debug_model)?;

    for scenario in model.scenarios.values() {
        let outcome = dispatch_scenario(model, scenario)?;
        match &outcome.result {
            DispatchResult::Success(solution) => info!(
                "Scenario {}: dispatched {:.2} MWh at a cost of {:.2} with {:.3} t CO2",
                scenario.id,
                solution.total_dispatch().value(),
                solution.total_cost().value(),
                solution.total_emissions().value()
            ),
            DispatchResult::Infeasible(reason) => warn!(
                "Scenario {}: cannot meet demand with available capacity: {reason}",
                scenario.id
            ),
        }

        writer.write_scenario(&scenario.id, &outcome.problem, &outcome.result)?;
    }

    writer.flush()?;

    Ok(())
}

/// Build and solve the dispatch problem for a single scenario.
///
/// Scenarios are independent of one another, so no state is carried between calls.
pub fn dispatch_scenario(model: &Model, scenario: &Scenario) -> Result<ScenarioOutcome> {
    let forecast = scenario.generation_forecast(model.forecast_provider())?;
    let bounds = resolve(&forecast, &model.parameters)
        .with_context(|| format!("Could not resolve capacity for scenario {}", scenario.id))?;
    let problem = DispatchProblem::new(bounds, &model.sources, scenario.demand);
    let result = optimise(&problem);

    Ok(ScenarioOutcome { problem, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, model, scenario};
    use crate::units::Energy;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_dispatch_scenario(model: Model, scenario: Scenario) {
        let outcome = dispatch_scenario(&model, &scenario).unwrap();
        let solution = outcome.result.solution().unwrap();
        assert_eq!(
            solution.dispatch().values().map(|x| x.value()).collect::<Vec<_>>(),
            [150.0, 150.0, 0.0, 0.0, 0.0]
        );
        assert_approx_eq!(f64, solution.total_cost().value(), 8250.0);
    }

    #[rstest]
    fn test_dispatch_scenario_from_history(model: Model, mut scenario: Scenario) {
        scenario.hour = 12;
        scenario.demand = Energy(580.0);
        scenario.solar = None;
        scenario.wind = None;
        scenario.hydro = None;

        let outcome = dispatch_scenario(&model, &scenario).unwrap();
        assert_approx_eq!(
            f64,
            outcome.problem.total_capacity().value(),
            1047.5,
            epsilon = 1e-9
        );
        let solution = outcome.result.solution().unwrap();
        assert_approx_eq!(f64, solution.total_cost().value(), 24250.0, epsilon = 1e-9);
        assert_approx_eq!(f64, solution.total_emissions().value(), 60.6, epsilon = 1e-9);
    }

    #[rstest]
    fn test_dispatch_scenario_infeasible(model: Model, mut scenario: Scenario) {
        scenario.demand = Energy(1100.0);
        let outcome = dispatch_scenario(&model, &scenario).unwrap();
        assert!(!outcome.result.is_success());
    }

    #[rstest]
    fn test_dispatch_scenario_non_finite(model: Model, mut scenario: Scenario) {
        scenario.solar = Some(Energy(f64::NAN));
        assert_error!(
            dispatch_scenario(&model, &scenario),
            "Could not resolve capacity for scenario reference"
        );
    }

    #[rstest]
    fn test_run(model: Model) {
        let dir = tempdir().unwrap();
        run(&model, dir.path(), true).unwrap();

        for file_name in [
            "dispatch.csv",
            "summary.csv",
            "debug_merit_order.csv",
            "metadata.toml",
        ] {
            assert!(dir.path().join(file_name).is_file());
        }
    }
}
