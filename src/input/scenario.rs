//! Code for reading scenarios from a CSV file.
use super::{input_err_msg, read_csv_id_file};
use crate::forecast::HOURS_PER_DAY;
use crate::scenario::{Scenario, ScenarioID, ScenarioMap};
use anyhow::{Context, Result, ensure};
use std::path::Path;

const SCENARIOS_FILE_NAME: &str = "scenarios.csv";

/// Read scenarios from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The scenarios, in file order, or an error
pub fn read_scenarios(model_dir: &Path) -> Result<ScenarioMap> {
    let file_path = model_dir.join(SCENARIOS_FILE_NAME);
    let scenarios = read_csv_id_file::<Scenario, ScenarioID>(&file_path)?;
    for scenario in scenarios.values() {
        validate_scenario(scenario).with_context(|| input_err_msg(&file_path))?;
    }

    Ok(scenarios)
}

/// Check that a scenario's values are valid
fn validate_scenario(scenario: &Scenario) -> Result<()> {
    ensure!(
        scenario.hour < HOURS_PER_DAY,
        "Scenario {}: hour must be between 0 and 23",
        scenario.id
    );
    ensure!(
        scenario.demand.is_finite(),
        "Scenario {}: demand must be a finite number",
        scenario.id
    );
    for (name, value) in [
        ("solar", scenario.solar),
        ("wind", scenario.wind),
        ("hydro", scenario.hydro),
    ] {
        if let Some(value) = value {
            ensure!(
                value.is_finite(),
                "Scenario {}: {name} must be a finite number",
                scenario.id
            );
        }
    }

    Ok(())
}
