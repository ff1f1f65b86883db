//! Code for reading the cost and emissions of each source from a CSV file.
use super::{input_err_msg, read_csv};
use crate::source::{Source, SourceMap, SourceParameterMap, SourceParameters};
use crate::units::{EmissionFactor, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;
use strum::IntoEnumIterator;

const SOURCES_FILE_NAME: &str = "sources.csv";

/// Represents a row of the sources CSV file
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
struct SourceRaw {
    source: Source,
    unit_cost: MoneyPerEnergy,
    emission_factor: EmissionFactor,
}

/// Read the cost and emissions attributes for every source.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The parameters for each source or an error
pub fn read_source_parameters(model_dir: &Path) -> Result<SourceParameterMap> {
    let file_path = model_dir.join(SOURCES_FILE_NAME);
    let iter = read_csv::<SourceRaw>(&file_path)?;
    read_source_parameters_from_iter(iter).with_context(|| input_err_msg(&file_path))
}

/// Validate source rows and collect them into a map.
///
/// Every source must appear exactly once.
fn read_source_parameters_from_iter<I>(iter: I) -> Result<SourceParameterMap>
where
    I: Iterator<Item = SourceRaw>,
{
    let mut map = SourceMap::<Option<SourceParameters>>::default();
    for row in iter {
        ensure!(
            row.unit_cost.is_finite() && row.unit_cost >= MoneyPerEnergy(0.0),
            "unit_cost for {} must be a finite number greater than or equal to zero",
            row.source
        );
        ensure!(
            row.emission_factor.is_finite() && row.emission_factor >= EmissionFactor(0.0),
            "emission_factor for {} must be a finite number greater than or equal to zero",
            row.source
        );

        let params = SourceParameters {
            unit_cost: row.unit_cost,
            emission_factor: row.emission_factor,
        };
        ensure!(
            map[row.source].replace(params).is_none(),
            "Duplicate entry for source {}",
            row.source
        );
    }

    let missing: Vec<String> = Source::iter()
        .filter(|&source| map[source].is_none())
        .map(|source| source.to_string())
        .collect();
    ensure!(
        missing.is_empty(),
        "Missing entries for sources: {}",
        missing.join(", ")
    );

    Ok(map.map(|&params| params.expect("Checked for missing sources above")))
}
