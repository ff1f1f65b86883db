//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::input::{input_err_msg, read_toml};
use crate::units::Energy;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_unit_param_default!(default_gas_ceiling, Energy, 300.0);
define_unit_param_default!(default_nuclear_ceiling, Energy, 300.0);

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// Installed gas capacity available in the planning interval
    #[serde(default = "default_gas_ceiling")]
    pub gas_ceiling: Energy,
    /// Installed nuclear capacity available in the planning interval
    #[serde(default = "default_nuclear_ceiling")]
    pub nuclear_ceiling: Energy,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            gas_ceiling: default_gas_ceiling(),
            nuclear_ceiling: default_nuclear_ceiling(),
        }
    }
}

/// Check that a capacity ceiling is valid
fn check_ceiling(name: &str, value: Energy) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Energy(0.0),
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// If the file is not present, default values are used.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        if !file_path.is_file() {
            return Ok(ModelParameters::default());
        }

        let model_params: ModelParameters = read_toml(&file_path)?;
        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_ceiling("gas_ceiling", self.gas_ceiling)?;
        check_ceiling("nuclear_ceiling", self.nuclear_ceiling)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_model_params_from_path() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MODEL_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(file, "gas_ceiling = 250.0").unwrap();
        }

        let model_params = ModelParameters::from_path(dir.path()).unwrap();
        assert_eq!(
            model_params,
            ModelParameters {
                gas_ceiling: Energy(250.0),
                nuclear_ceiling: Energy(300.0),
            }
        );
    }

    #[test]
    fn test_model_params_from_path_no_file() {
        let dir = tempdir().unwrap();
        assert_eq!(
            ModelParameters::from_path(dir.path()).unwrap(),
            ModelParameters::default()
        );
    }

    #[test]
    fn test_model_params_from_path_invalid() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MODEL_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(file, "nuclear_ceiling = -1.0").unwrap();
        }

        let err = ModelParameters::from_path(dir.path()).unwrap_err();
        assert!(format!("{err:?}").contains("nuclear_ceiling must be a finite number"));
    }

    #[rstest]
    #[case(0.0, true)] // Valid: exactly zero
    #[case(300.0, true)] // Valid: default value
    #[case(f64::MAX, true)] // Valid: maximum finite value
    #[case(-1e-10, false)] // Invalid: very small negative value
    #[case(f64::INFINITY, false)] // Invalid: infinite value
    #[case(f64::NAN, false)] // Invalid: NaN value
    fn test_check_ceiling(#[case] value: f64, #[case] expected_valid: bool) {
        assert_eq!(check_ceiling("gas_ceiling", Energy(value)).is_ok(), expected_valid);
    }
}
