//! Integration tests for the `run` command.
use energy_mix::cli::{RunOpts, handle_run_command};
use energy_mix::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("models/simple")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("ENERGY_MIX_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        debug_model: false,
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();
    assert!(output_dir.join("summary.csv").is_file());
    assert!(output_dir.join("energy_mix_info.log").is_file());

    // Folder is no longer empty, so a second run must be allowed to overwrite it
    assert_eq!(
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    );

    let opts = RunOpts {
        overwrite: true,
        debug_model: true,
        ..opts
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();
    assert!(output_dir.join("debug_merit_order.csv").is_file());
    assert!(!fs::read_to_string(output_dir.join("dispatch.csv")).unwrap().is_empty());
}
