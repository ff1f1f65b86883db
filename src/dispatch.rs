//! Code for performing dispatch optimisation.
//!
//! The dispatch problem is the linear program
//!
//! ```text
//! minimise    sum_i cost[i] * x[i]
//! subject to  sum_i x[i] = demand
//!             0 <= x[i] <= max_available[i]
//! ```
//!
//! With a single equality constraint and independent box bounds, the optimum is found by filling
//! sources in ascending order of cost (a merit order): shifting any amount of generation from a
//! cheaper unsaturated source to a more expensive one can only increase the cost. This makes the
//! solution exact and reproducible without an LP solver.
//!
//! NB: This only holds for this problem shape. Adding constraints which link sources or periods
//! together (e.g. ramp rates or transmission limits) invalidates the merit-order argument and
//! requires a general LP solver.
use crate::availability::CapacityBounds;
use crate::source::{Source, SourceMap, SourceParameterMap};
use crate::units::{EmissionFactor, Emissions, Energy, Money, MoneyPerEnergy};
use itertools::Itertools;
use log::error;
use std::fmt;

/// The tolerance within which dispatch must match demand.
///
/// This is an absolute tolerance on the demand left unmet by the merit-order fill.
pub const DEMAND_TOLERANCE: Energy = Energy(1e-6);

/// A single instance of the dispatch problem
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchProblem {
    /// The capacity available from each source
    pub bounds: CapacityBounds,
    /// The cost of generation from each source
    pub costs: SourceMap<MoneyPerEnergy>,
    /// The emissions intensity of each source
    pub emission_factors: SourceMap<EmissionFactor>,
    /// The demand which must be met exactly
    pub demand: Energy,
}

impl DispatchProblem {
    /// Create a new problem from bounds, source attributes and demand
    pub fn new(bounds: CapacityBounds, sources: &SourceParameterMap, demand: Energy) -> Self {
        Self {
            bounds,
            costs: sources.map(|params| params.unit_cost),
            emission_factors: sources.map(|params| params.emission_factor),
            demand,
        }
    }

    /// The sum of the capacity available from all sources
    pub fn total_capacity(&self) -> Energy {
        self.bounds.values().map(|bound| bound.max_available()).sum()
    }

    /// The sources in the order in which they are dispatched.
    ///
    /// Sources are sorted by ascending cost. Sources with equal costs keep their relative order.
    pub fn merit_order(&self) -> Vec<Source> {
        self.costs
            .iter()
            .sorted_by(|(_, cost1), (_, cost2)| cost1.total_cmp(cost2))
            .map(|(source, _)| source)
            .collect()
    }
}

/// The reason why a dispatch problem could not be solved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Infeasibility {
    /// Demand is NaN or infinite
    NonFiniteDemand {
        /// The requested demand
        demand: Energy,
    },
    /// Demand is negative, but no source can have negative output
    NegativeDemand {
        /// The requested demand
        demand: Energy,
    },
    /// Demand is larger than the total available capacity
    InsufficientCapacity {
        /// The requested demand
        demand: Energy,
        /// The sum of all sources' available capacity
        total_capacity: Energy,
    },
    /// Numerical error meant that dispatch did not match demand
    Imbalance {
        /// Dispatched total minus demand
        residual: Energy,
    },
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NonFiniteDemand { demand } => {
                write!(f, "demand ({}) is not a finite number", demand.value())
            }
            Self::NegativeDemand { demand } => {
                write!(f, "demand ({:.2} MWh) is negative", demand.value())
            }
            Self::InsufficientCapacity {
                demand,
                total_capacity,
            } => write!(
                f,
                "demand ({:.2} MWh) exceeds total available capacity ({:.2} MWh)",
                demand.value(),
                total_capacity.value()
            ),
            Self::Imbalance { residual } => write!(
                f,
                "dispatch differs from demand by {:e} MWh (tolerance: {:e} MWh)",
                residual.value(),
                DEMAND_TOLERANCE.value()
            ),
        }
    }
}

/// A least-cost dispatch which meets demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchSolution {
    dispatch: SourceMap<Energy>,
    total_cost: Money,
    total_emissions: Emissions,
}

impl DispatchSolution {
    /// The output of each source
    pub fn dispatch(&self) -> &SourceMap<Energy> {
        &self.dispatch
    }

    /// The cost of the whole dispatch
    pub fn total_cost(&self) -> Money {
        self.total_cost
    }

    /// The emissions of the whole dispatch
    pub fn total_emissions(&self) -> Emissions {
        self.total_emissions
    }

    /// The total output of all sources
    pub fn total_dispatch(&self) -> Energy {
        self.dispatch.values().copied().sum()
    }
}

/// The outcome of a dispatch optimisation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchResult {
    /// Demand can be met; contains the optimal dispatch
    Success(DispatchSolution),
    /// Demand cannot be met
    Infeasible(Infeasibility),
}

impl DispatchResult {
    /// Whether the optimisation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The solution, if the optimisation succeeded
    pub fn solution(&self) -> Option<&DispatchSolution> {
        match self {
            Self::Success(solution) => Some(solution),
            Self::Infeasible(_) => None,
        }
    }
}

/// Perform the dispatch optimisation.
///
/// Infeasibility is an expected outcome and is reported as [`DispatchResult::Infeasible`] rather
/// than an error.
///
/// The bounds must be finite and non-negative, which [`crate::availability::resolve`] guarantees.
///
/// # Arguments
///
/// * `problem` - The problem to solve
///
/// # Returns
///
/// The least-cost dispatch, or the reason why demand cannot be met.
pub fn optimise(problem: &DispatchProblem) -> DispatchResult {
    let demand = problem.demand;
    if !demand.is_finite() {
        return DispatchResult::Infeasible(Infeasibility::NonFiniteDemand { demand });
    }
    if demand < Energy(0.0) {
        return DispatchResult::Infeasible(Infeasibility::NegativeDemand { demand });
    }

    let total_capacity = problem.total_capacity();
    if demand > total_capacity {
        return DispatchResult::Infeasible(Infeasibility::InsufficientCapacity {
            demand,
            total_capacity,
        });
    }

    let (dispatch, remaining) = fill_merit_order(problem);

    // Demand and bounds are finite here, so this should only fail due to rounding
    let residual = Energy(-remaining.value());
    if !residual.is_finite() || residual.abs() > DEMAND_TOLERANCE {
        error!(
            "Dispatch does not balance with demand (residual: {:e} MWh)",
            residual.value()
        );
        return DispatchResult::Infeasible(Infeasibility::Imbalance { residual });
    }

    let total_cost = dispatch
        .iter()
        .map(|(source, &output)| output * problem.costs[source])
        .sum();

    // MWh multiplied by g/kWh gives kilograms
    let emissions_kg: f64 = dispatch
        .iter()
        .map(|(source, &output)| output.value() * problem.emission_factors[source].value())
        .sum();
    let total_emissions = Emissions::from_kilograms(emissions_kg);

    DispatchResult::Success(DispatchSolution {
        dispatch,
        total_cost,
        total_emissions,
    })
}

/// Fill sources to capacity in merit order until demand is met.
///
/// Returns the dispatch and the demand left unmet.
fn fill_merit_order(problem: &DispatchProblem) -> (SourceMap<Energy>, Energy) {
    let mut dispatch = SourceMap::<Energy>::default();
    let mut remaining = problem.demand;
    for source in problem.merit_order() {
        if remaining <= Energy(0.0) {
            break;
        }

        let output = problem.bounds[source].max_available().min(remaining);
        dispatch[source] = output;
        remaining -= output;
    }

    (dispatch, remaining)
}
