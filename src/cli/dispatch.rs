//! Code for the CLI command which dispatches a single set of forecast values.
use super::{init_logger, load_settings};
use crate::availability::resolve;
use crate::dispatch::{DispatchProblem, DispatchResult, optimise};
use crate::forecast::GenerationForecast;
use crate::input::source::read_source_parameters;
use crate::model::ModelParameters;
use crate::settings::Settings;
use crate::source::{SourceParameterMap, reference_source_parameters};
use crate::units::Energy;
use anyhow::{Context, Result, ensure};
use clap::Args;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Options for the dispatch command
#[derive(Args)]
pub struct DispatchOpts {
    /// Forecast solar output (MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub solar: f64,
    /// Forecast wind output (MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub wind: f64,
    /// Historical mean hydro output (MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub hydro: f64,
    /// Demand to be met (MWh)
    #[arg(long, allow_negative_numbers = true)]
    pub demand: f64,
    /// Model directory to take source costs and ceilings from, instead of the reference values
    #[arg(long)]
    pub model_dir: Option<PathBuf>,
}

/// Handle the `dispatch` command.
pub fn handle_dispatch_command(opts: &DispatchOpts, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;
    init_logger(&settings, None)?;

    let result = dispatch_forecast(opts)?;
    print!("{}", format_report(&result));

    Ok(())
}

/// Load the source table and ceilings, either from a model or the reference configuration
fn load_configuration(model_dir: Option<&Path>) -> Result<(ModelParameters, SourceParameterMap)> {
    let Some(model_dir) = model_dir else {
        return Ok((ModelParameters::default(), reference_source_parameters()));
    };

    let parameters = ModelParameters::from_path(model_dir)?;
    let sources = read_source_parameters(model_dir)?;

    Ok((parameters, sources))
}

/// Solve the dispatch problem described by the command-line options
fn dispatch_forecast(opts: &DispatchOpts) -> Result<DispatchResult> {
    ensure!(
        opts.demand.is_finite(),
        "Demand must be a finite number, got {}",
        opts.demand
    );

    let (parameters, sources) = load_configuration(opts.model_dir.as_deref())
        .context("Failed to load configuration.")?;
    let forecast = GenerationForecast {
        solar: Energy(opts.solar),
        wind: Energy(opts.wind),
        hydro_historical_mean: Energy(opts.hydro),
    };
    let bounds = resolve(&forecast, &parameters)?;
    let problem = DispatchProblem::new(bounds, &sources, Energy(opts.demand));

    Ok(optimise(&problem))
}

/// Describe the result of optimisation in human-readable form
pub fn format_report(result: &DispatchResult) -> String {
    let solution = match result {
        DispatchResult::Success(solution) => solution,
        DispatchResult::Infeasible(reason) => {
            return format!("Cannot meet demand with available capacity: {reason}\n");
        }
    };

    let mut out = String::from("Optimal energy mix:\n");
    for (source, dispatch) in solution.dispatch().iter() {
        let name = source.to_string();
        writeln!(&mut out, "  {name:<8} {:>10.2} MWh", dispatch.value()).unwrap();
    }
    writeln!(&mut out, "Total cost: {:.2}", solution.total_cost().value()).unwrap();
    writeln!(
        &mut out,
        "Total CO2 emissions: {:.3} t",
        solution.total_emissions().value()
    )
    .unwrap();

    out
}
