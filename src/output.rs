//! The module responsible for writing output data to disk.
use crate::dispatch::{DispatchProblem, DispatchResult};
use crate::scenario::ScenarioID;
use crate::source::Source;
use crate::units::{Emissions, Energy, Money, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "energy_mix_results";

/// The output file name for per-source dispatch
const DISPATCH_FILE_NAME: &str = "dispatch.csv";

/// The output file name for per-scenario totals
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// The output file name for the merit order used in each scenario
const MERIT_ORDER_FILE_NAME: &str = "debug_merit_order.csv";

/// Get the default output directory for the model specified at `model_dir`
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory, if it doesn't already exist.
///
/// # Arguments
///
/// * `output_dir` - The folder to create
/// * `allow_overwrite` - Whether to delete the contents of an existing, non-empty folder
///
/// # Returns
///
/// True if an existing folder's contents will be overwritten, false otherwise
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the dispatch CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DispatchRow {
    scenario_id: ScenarioID,
    source: Source,
    max_available: Energy,
    dispatch: Energy,
}

/// Represents a row in the summary CSV file.
///
/// Cost and emissions are left empty for infeasible scenarios.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SummaryRow {
    scenario_id: ScenarioID,
    demand: Energy,
    total_capacity: Energy,
    success: bool,
    total_cost: Option<Money>,
    total_emissions: Option<Emissions>,
}

/// Represents a row in the merit order debug CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct MeritOrderRow {
    scenario_id: ScenarioID,
    rank: usize,
    source: Source,
    unit_cost: MoneyPerEnergy,
}

/// An object for writing dispatch results to file
pub struct DataWriter {
    dispatch_writer: csv::Writer<File>,
    summary_writer: csv::Writer<File>,
    merit_order_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to and write run metadata.
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `model_path` - Path to the model being run
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(output_path: &Path, model_path: &Path, save_debug_info: bool) -> Result<Self> {
        write_metadata(output_path, model_path).context("Failed to save metadata")?;

        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let merit_order_writer = if save_debug_info {
            // Create debug CSV files
            Some(new_writer(MERIT_ORDER_FILE_NAME)?)
        } else {
            None
        };

        Ok(Self {
            dispatch_writer: new_writer(DISPATCH_FILE_NAME)?,
            summary_writer: new_writer(SUMMARY_FILE_NAME)?,
            merit_order_writer,
        })
    }

    /// Write the results for a single scenario
    pub fn write_scenario(
        &mut self,
        scenario_id: &ScenarioID,
        problem: &DispatchProblem,
        result: &DispatchResult,
    ) -> Result<()> {
        self.write_summary(scenario_id, problem, result)?;
        self.write_dispatch(scenario_id, problem, result)?;
        self.write_merit_order(scenario_id, problem)?;

        Ok(())
    }

    /// Write the totals for a scenario to the summary file
    fn write_summary(
        &mut self,
        scenario_id: &ScenarioID,
        problem: &DispatchProblem,
        result: &DispatchResult,
    ) -> Result<()> {
        let solution = result.solution();
        let row = SummaryRow {
            scenario_id: scenario_id.clone(),
            demand: problem.demand,
            total_capacity: problem.total_capacity(),
            success: result.is_success(),
            total_cost: solution.map(|solution| solution.total_cost()),
            total_emissions: solution.map(|solution| solution.total_emissions()),
        };
        self.summary_writer.serialize(row)?;

        Ok(())
    }

    /// Write per-source dispatch to file. Nothing is written for infeasible scenarios.
    fn write_dispatch(
        &mut self,
        scenario_id: &ScenarioID,
        problem: &DispatchProblem,
        result: &DispatchResult,
    ) -> Result<()> {
        let Some(solution) = result.solution() else {
            return Ok(());
        };

        for (source, &dispatch) in solution.dispatch().iter() {
            let row = DispatchRow {
                scenario_id: scenario_id.clone(),
                source,
                max_available: problem.bounds[source].max_available(),
                dispatch,
            };
            self.dispatch_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write the merit order to the debug file, if enabled
    fn write_merit_order(
        &mut self,
        scenario_id: &ScenarioID,
        problem: &DispatchProblem,
    ) -> Result<()> {
        let Some(writer) = &mut self.merit_order_writer else {
            return Ok(());
        };

        for (rank, source) in problem.merit_order().into_iter().enumerate() {
            let row = MeritOrderRow {
                scenario_id: scenario_id.clone(),
                rank: rank + 1,
                source,
                unit_cost: problem.costs[source],
            };
            writer.serialize(row)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.dispatch_writer.flush()?;
        self.summary_writer.flush()?;
        if let Some(writer) = &mut self.merit_order_writer {
            writer.flush()?;
        }

        Ok(())
    }
}
