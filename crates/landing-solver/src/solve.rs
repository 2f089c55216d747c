// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Entry points that run one engine on one model and report a `SolveResult`.
//!
//! Both paths hand back schedules that passed the `SolutionEvaluator`. The
//! constraint search guarantees this by construction; MIP results are
//! re-evaluated here and rejected with a `SolverBackendFailure` when the
//! backend and the evaluator disagree.
//!
//! ```rust
//! use landing_cp::branching::strategy::SearchStrategy;
//! use landing_model::{index::{AircraftIndex, ClassIndex}, model::ModelBuilder};
//! use landing_search::{budget::SearchBudget, result::SolveStatus};
//! use landing_solver::solve::solve_cp;
//!
//! let mut builder = ModelBuilder::<i64>::new(1, 2, 1);
//! builder
//!     .set_landing_window(AircraftIndex::new(0), 0, 10, 20)
//!     .set_landing_window(AircraftIndex::new(1), 0, 10, 20)
//!     .set_separation(ClassIndex::new(0), ClassIndex::new(0), 5);
//! let model = builder.build().unwrap();
//!
//! let result = solve_cp(&model, SearchStrategy::default(), SearchBudget::unlimited());
//! assert_eq!(result.status, SolveStatus::Optimal);
//! assert_eq!(result.objective, Some(5));
//! ```

use crate::error::SolverBackendFailure;
use landing_cp::{
    branching::strategy::SearchStrategy,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor,
        no_op::NoOperationMonitor, node_limit::NodeLimitMonitor, time_limit::TimeLimitMonitor,
        tree_search_monitor::TreeSearchMonitor,
    },
    solver::CpSolver,
};
use landing_mip::{
    backend::{BackendError, GoodLpBackend, MipBackend},
    extract::MipSchedule,
    formulation::MipModel,
};
use landing_model::{evaluate::SolutionEvaluator, model::Model, schedule::Schedule};
use landing_search::{
    budget::SearchBudget,
    num::SolverNumeric,
    result::{SolveResult, SolveStatistics, SolveStatisticsBuilder, TerminationReason},
};
use log::{debug, info, warn};
use std::time::Instant;

/// Relative tolerance when comparing a backend objective with the evaluator's.
const OBJECTIVE_TOLERANCE: f64 = 1e-6;
/// Absolute slack on top of `OBJECTIVE_TOLERANCE` for rounding of landing times.
const OBJECTIVE_SLACK: f64 = 1e-3;

/// Runs the constraint search with the monitors implied by `budget`.
pub fn solve_cp<T>(
    model: &Model<T>,
    strategy: SearchStrategy,
    budget: SearchBudget,
) -> SolveResult<T>
where
    T: SolverNumeric,
{
    run_cp(model, strategy, budget, NoOperationMonitor::new(), None)
}

/// Like `solve_cp`, with an additional caller-supplied monitor such as a
/// `LogMonitor`.
pub fn solve_cp_with_monitor<T, M>(
    model: &Model<T>,
    strategy: SearchStrategy,
    budget: SearchBudget,
    monitor: M,
) -> SolveResult<T>
where
    T: SolverNumeric,
    M: TreeSearchMonitor<T>,
{
    run_cp(model, strategy, budget, monitor, None)
}

/// Like `solve_cp`, but warm-started from `initial`.
///
/// A feasible `initial` becomes the first incumbent, so the search only
/// explores subtrees whose bound beats it and a budget that runs out early
/// still reports at least that schedule. An infeasible `initial` is logged
/// and ignored. To steer the search towards target times without a full
/// schedule, use `ValueRule::TargetClosest` with
/// `LandingTimeRule::TargetClosest` instead.
pub fn solve_cp_with_incumbent<T>(
    model: &Model<T>,
    strategy: SearchStrategy,
    budget: SearchBudget,
    initial: &Schedule<T>,
) -> SolveResult<T>
where
    T: SolverNumeric,
{
    run_cp(model, strategy, budget, NoOperationMonitor::new(), Some(initial))
}

fn run_cp<T, M>(
    model: &Model<T>,
    strategy: SearchStrategy,
    budget: SearchBudget,
    mut monitor: M,
    initial: Option<&Schedule<T>>,
) -> SolveResult<T>
where
    T: SolverNumeric,
    M: TreeSearchMonitor<T>,
{
    info!(
        "Starting constraint search: {} aircraft, {} runways, strategy {}",
        model.num_aircraft(),
        model.num_runways(),
        strategy
    );

    let mut monitors = budget_monitors::<T>(&budget);
    monitors.add_monitor(&mut monitor);

    let mut solver = CpSolver::preallocated(model.num_runways(), model.num_aircraft());
    let outcome = match initial {
        Some(initial) => {
            let evaluation = SolutionEvaluator::new(model).evaluate(initial);
            if evaluation.is_feasible() {
                debug!("Warm start with objective {}", evaluation.objective());
            } else {
                warn!(
                    "Ignoring infeasible warm start with {} violations",
                    evaluation.violations().len()
                );
            }
            solver.solve_with_incumbent(model, strategy, monitors, initial)
        }
        None => solver.solve(model, strategy, monitors),
    };
    debug!("{}", outcome.statistics());

    let result = outcome.into_solve_result();
    info!(
        "Constraint search finished: {} ({}) after {} nodes in {:.3}s",
        result.status,
        result.termination_reason,
        result.statistics.nodes_explored,
        result.statistics.elapsed.as_secs_f64()
    );
    result
}

fn budget_monitors<'a, T>(budget: &SearchBudget) -> CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    let mut monitors = CompositeTreeSearchMonitor::with_capacity(4);
    if let Some(time_limit) = budget.time_limit {
        // Read the clock on every poll so a slow step cannot overrun the limit.
        monitors.add_monitor(TimeLimitMonitor::with_clock_check_mask(time_limit, 0));
    }
    if let Some(node_limit) = budget.node_limit {
        monitors.add_monitor(NodeLimitMonitor::new(node_limit));
    }
    if let Some(token) = &budget.cancellation {
        monitors.add_monitor(InterruptMonitor::new(token.clone()));
    }
    monitors
}

/// Solves the MIP formulation with `GoodLpBackend`.
///
/// # Errors
///
/// Returns a `SolverBackendFailure` if the backend fails or its schedule is
/// rejected by the `SolutionEvaluator`.
pub fn solve_mip<T>(
    model: &Model<T>,
    budget: SearchBudget,
) -> Result<SolveResult<T>, SolverBackendFailure<T>>
where
    T: SolverNumeric,
{
    solve_mip_with_backend(model, &GoodLpBackend::new(), budget)
}

/// Solves the MIP formulation with any `MipBackend`.
///
/// Only the time limit and the cancellation token of `budget` apply; the
/// token is checked once before the backend starts.
///
/// # Errors
///
/// Returns a `SolverBackendFailure` if the backend fails or its schedule is
/// rejected by the `SolutionEvaluator`.
pub fn solve_mip_with_backend<T, B>(
    model: &Model<T>,
    backend: &B,
    budget: SearchBudget,
) -> Result<SolveResult<T>, SolverBackendFailure<T>>
where
    T: SolverNumeric,
    B: MipBackend + ?Sized,
{
    let start_time = Instant::now();
    info!(
        "Starting MIP solve: {} aircraft, {} runways, backend {}",
        model.num_aircraft(),
        model.num_runways(),
        backend.name()
    );

    let mip = MipModel::build(model);
    debug!(
        "MIP formulation has {} variables and {} constraints",
        mip.num_variables(),
        mip.num_constraints()
    );
    if budget.node_limit.is_some() {
        debug!("Node limit does not apply to the MIP backend and is ignored");
    }

    let statistics = |iterations: u64, best_bound: Option<T>| -> SolveStatistics<T> {
        SolveStatisticsBuilder::new()
            .backend_iterations(iterations)
            .best_bound(best_bound)
            .num_variables(mip.num_variables())
            .num_constraints(mip.num_constraints())
            .elapsed(start_time.elapsed())
            .build()
    };

    if budget.is_cancelled() {
        return Ok(SolveResult::timed_out(
            None,
            TerminationReason::BudgetExhausted("Interrupt signal received".to_string()),
            statistics(0, None),
        ));
    }
    if model.num_aircraft() == 0 {
        return Ok(SolveResult::optimal(
            Schedule::new(Vec::new(), Vec::new()),
            T::zero(),
            statistics(0, Some(T::zero())),
        ));
    }

    let solution = match backend.solve(&mip, budget.time_limit) {
        Ok(solution) => solution,
        Err(BackendError::Infeasible) => {
            info!("MIP solve finished: Infeasible");
            return Ok(SolveResult::infeasible(statistics(0, None)));
        }
        Err(BackendError::TimeLimit) => {
            info!("MIP solve finished: TimedOut");
            return Ok(SolveResult::timed_out(
                None,
                TerminationReason::BudgetExhausted("Time limit exceeded".to_string()),
                statistics(0, None),
            ));
        }
        Err(error) => {
            warn!("Rejecting MIP result: {}", error);
            return Err(error.into());
        }
    };

    let extracted = MipSchedule::extract(model, &mip, &solution).map_err(|error| {
        warn!("Rejecting MIP result: {}", error);
        SolverBackendFailure::from(error)
    })?;

    let evaluation = SolutionEvaluator::new(model).evaluate(extracted.schedule());
    if !evaluation.is_feasible() {
        warn!(
            "Rejecting MIP result: schedule has {} violation(s)",
            evaluation.violations().len()
        );
        return Err(SolverBackendFailure::InvalidSchedule(
            evaluation.into_violations(),
        ));
    }

    let evaluated = evaluation.objective();
    let backend_objective = extracted.backend_objective();
    let evaluated_f64 = evaluated.to_f64().unwrap_or(f64::NAN);
    let tolerance = OBJECTIVE_TOLERANCE * evaluated_f64.abs().max(1.0) + OBJECTIVE_SLACK;
    // Written so that a NaN on either side is rejected.
    if !((backend_objective - evaluated_f64).abs() <= tolerance) {
        warn!(
            "Rejecting MIP result: backend objective {} but evaluated objective {}",
            backend_objective, evaluated
        );
        return Err(SolverBackendFailure::ObjectiveMismatch {
            backend: backend_objective,
            evaluated,
        });
    }

    let result = if solution.is_proven_optimal() {
        SolveResult::optimal(
            extracted.into_schedule(),
            evaluated,
            statistics(solution.iterations(), Some(evaluated)),
        )
    } else {
        SolveResult::feasible(
            extracted.into_schedule(),
            evaluated,
            TerminationReason::Aborted("Backend stopped without an optimality proof".to_string()),
            statistics(solution.iterations(), None),
        )
    };
    info!(
        "MIP solve finished: {} with objective {} in {:.3}s",
        result.status,
        evaluated,
        result.statistics.elapsed.as_secs_f64()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landing_cp::{
        branching::strategy::{BranchingRule, ValueRule},
        monitor::solution_limit::SolutionLimitMonitor,
    };
    use landing_mip::backend::BackendSolution;
    use landing_model::{
        index::{AircraftIndex, ClassIndex, RunwayIndex},
        model::ModelBuilder,
    };
    use landing_search::{budget::CancellationToken, result::SolveStatus};
    use std::time::Duration;

    type IntegerType = i64;

    fn ai(i: usize) -> AircraftIndex {
        AircraftIndex::new(i)
    }

    fn uniform_model(
        num_runways: usize,
        windows: &[(IntegerType, IntegerType, IntegerType)],
        separation: IntegerType,
    ) -> Model<IntegerType> {
        let mut builder = ModelBuilder::<IntegerType>::new(num_runways, windows.len(), 1);
        for (i, &(e, t, l)) in windows.iter().enumerate() {
            builder.set_landing_window(ai(i), e, t, l);
        }
        builder.set_separation(ClassIndex::new(0), ClassIndex::new(0), separation);
        builder.build().unwrap()
    }

    /// Two classes with asymmetric separations and mixed penalties.
    fn mixed_model(num_runways: usize) -> Model<IntegerType> {
        let windows = [(0, 4, 12), (2, 5, 14), (1, 6, 15), (3, 7, 16), (0, 3, 18)];
        let penalties = [(2, 3), (1, 4), (3, 1), (2, 2), (1, 1)];
        let mut builder = ModelBuilder::<IntegerType>::new(num_runways, windows.len(), 2);
        for (i, (&(e, t, l), &(alpha, beta))) in windows.iter().zip(penalties.iter()).enumerate() {
            builder
                .set_landing_window(ai(i), e, t, l)
                .set_penalties(ai(i), alpha, beta)
                .set_aircraft_class(ai(i), ClassIndex::new(i % 2));
        }
        let (heavy, light) = (ClassIndex::new(0), ClassIndex::new(1));
        builder
            .set_separation(heavy, heavy, 3)
            .set_separation(heavy, light, 4)
            .set_separation(light, heavy, 2)
            .set_separation(light, light, 2);
        builder.build().unwrap()
    }

    /// Returns fixed values regardless of the formulation.
    struct FixedBackend(Result<BackendSolution, BackendError>);

    impl MipBackend for FixedBackend {
        fn name(&self) -> &str {
            "FixedBackend"
        }

        fn solve(
            &self,
            _mip: &MipModel,
            _time_limit: Option<Duration>,
        ) -> Result<BackendSolution, BackendError> {
            self.0.clone()
        }
    }

    /// Backend values that encode `times` on runway 0 of a single-runway model.
    fn values_for_times(model: &Model<IntegerType>, times: &[IntegerType]) -> Vec<f64> {
        let mip = MipModel::build(model);
        let mut values = vec![0.0; mip.num_variables()];
        for a in model.aircraft() {
            let time = times[a.get()];
            let target = model.target_landing_time(a);
            values[mip.landing_time_var(a).get()] = time as f64;
            values[mip.earliness_var(a).get()] = (target - time).max(0) as f64;
            values[mip.lateness_var(a).get()] = (time - target).max(0) as f64;
        }
        values
    }

    #[test]
    fn test_two_aircraft_objective_five_on_both_engines() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);

        let cp = solve_cp(&model, SearchStrategy::default(), SearchBudget::unlimited());
        assert_eq!(cp.status, SolveStatus::Optimal);
        assert_eq!(cp.objective, Some(5));

        let mip = solve_mip(&model, SearchBudget::unlimited()).unwrap();
        assert_eq!(mip.status, SolveStatus::Optimal);
        assert_eq!(mip.objective, Some(5));
        assert_eq!(mip.statistics.num_variables, 8);
        assert_eq!(mip.statistics.num_constraints, 7);

        let evaluator = SolutionEvaluator::new(&model);
        for result in [&cp, &mip] {
            let evaluation = evaluator.evaluate(result.schedule.as_ref().unwrap());
            assert!(evaluation.is_feasible());
            assert_eq!(Some(evaluation.objective()), result.objective);
        }
    }

    #[test]
    fn test_three_aircraft_infeasible_on_both_engines() {
        let model = uniform_model(1, &[(0, 5, 10), (0, 5, 10), (0, 5, 10)], 6);

        let cp = solve_cp(&model, SearchStrategy::default(), SearchBudget::unlimited());
        assert_eq!(cp.status, SolveStatus::Infeasible);
        assert!(!cp.has_schedule());

        let mip = solve_mip(&model, SearchBudget::unlimited()).unwrap();
        assert_eq!(mip.status, SolveStatus::Infeasible);
        assert_eq!(mip.objective, None);
    }

    #[test]
    fn test_engines_agree_on_mixed_instances() {
        for num_runways in 1..=2 {
            let model = mixed_model(num_runways);
            let mip = solve_mip(&model, SearchBudget::unlimited()).unwrap();
            assert_eq!(mip.status, SolveStatus::Optimal);

            for branching in [BranchingRule::MostConstrained, BranchingRule::EarliestDeadline] {
                for value in [ValueRule::EarliestFeasible, ValueRule::TargetClosest] {
                    let strategy = SearchStrategy::new(branching, value);
                    let cp = solve_cp(&model, strategy, SearchBudget::unlimited());
                    assert_eq!(cp.status, SolveStatus::Optimal, "strategy {}", strategy);
                    assert_eq!(cp.objective, mip.objective, "strategy {}", strategy);
                }
            }
        }
    }

    #[test]
    fn test_tiny_budget_times_out_on_both_engines() {
        let model = mixed_model(2);
        let budget = SearchBudget::unlimited().with_time_limit(Duration::ZERO);

        let cp = solve_cp(&model, SearchStrategy::default(), budget.clone());
        assert_eq!(cp.status, SolveStatus::TimedOut);
        assert!(matches!(
            cp.termination_reason,
            TerminationReason::BudgetExhausted(_)
        ));

        let mip = solve_mip(&model, budget).unwrap();
        assert_eq!(mip.status, SolveStatus::TimedOut);
        assert!(!mip.has_schedule());
    }

    /// A long stream of arrivals over three classes, built without randomness.
    fn stream_model(num_aircraft: usize) -> Model<IntegerType> {
        let mut builder = ModelBuilder::<IntegerType>::new(2, num_aircraft, 3);
        for i in 0..num_aircraft {
            let k = i as IntegerType;
            let earliest = k * 6 + (k * 7) % 6;
            let target = earliest + 2 + k % 8;
            let latest = target + 10 + (k * 3) % 20;
            builder
                .set_landing_window(ai(i), earliest, target, latest)
                .set_penalties(ai(i), 1 + k % 3, 1 + k % 4)
                .set_aircraft_class(ai(i), ClassIndex::new(i % 3));
        }
        for leading in 0..3 {
            for following in 0..3 {
                let separation = 2 + ((leading * 2 + following) % 4) as IntegerType;
                builder.set_separation(
                    ClassIndex::new(leading),
                    ClassIndex::new(following),
                    separation,
                );
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_time_limit_holds_on_large_instance() {
        let model = stream_model(100);
        let budget = SearchBudget::unlimited().with_time_limit(Duration::from_millis(20));

        let start = Instant::now();
        let result = solve_cp(&model, SearchStrategy::default(), budget);
        let elapsed = start.elapsed();

        assert!(
            matches!(result.status, SolveStatus::TimedOut | SolveStatus::Optimal),
            "unexpected status {}",
            result.status
        );
        assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
    }

    #[test]
    fn test_warm_start_matches_cold_objective() {
        let model = mixed_model(2);
        let cold = solve_cp(&model, SearchStrategy::default(), SearchBudget::unlimited());
        let schedule = cold.schedule.clone().unwrap();

        let warm = solve_cp_with_incumbent(
            &model,
            SearchStrategy::default(),
            SearchBudget::unlimited(),
            &schedule,
        );
        assert_eq!(warm.status, SolveStatus::Optimal);
        assert_eq!(warm.objective, cold.objective);
        assert!(warm.statistics.nodes_explored <= cold.statistics.nodes_explored);
    }

    #[test]
    fn test_warm_start_is_kept_when_budget_is_spent() {
        let model = uniform_model(1, &[(0, 10, 40); 3], 5);
        let spread = Schedule::new(vec![RunwayIndex::new(0); 3], vec![10, 20, 30]);
        let budget = SearchBudget::unlimited().with_node_limit(0);

        let result = solve_cp_with_incumbent(&model, SearchStrategy::default(), budget, &spread);
        assert_eq!(result.status, SolveStatus::TimedOut);
        assert_eq!(result.objective, Some(30));
        assert!(result.has_schedule());
    }

    #[test]
    fn test_node_limit_stops_constraint_search() {
        let model = mixed_model(2);
        let budget = SearchBudget::unlimited().with_node_limit(1);
        let result = solve_cp(&model, SearchStrategy::default(), budget);
        assert_eq!(result.status, SolveStatus::TimedOut);
        assert!(result.statistics.nodes_explored <= 2);
    }

    #[test]
    fn test_cancelled_token_stops_both_engines() {
        let model = mixed_model(1);
        let token = CancellationToken::new();
        token.cancel();
        let budget = SearchBudget::unlimited().with_cancellation(token);

        let cp = solve_cp(&model, SearchStrategy::default(), budget.clone());
        assert_eq!(cp.status, SolveStatus::TimedOut);

        let mip = solve_mip(&model, budget).unwrap();
        assert_eq!(mip.status, SolveStatus::TimedOut);
    }

    #[test]
    fn test_extra_monitor_participates() {
        let model = uniform_model(1, &[(0, 10, 40); 4], 5);
        let result = solve_cp_with_monitor(
            &model,
            SearchStrategy::default(),
            SearchBudget::unlimited(),
            SolutionLimitMonitor::new(1),
        );
        assert_eq!(result.status, SolveStatus::Feasible);
        assert!(result.has_schedule());
    }

    #[test]
    fn test_empty_instance_is_optimal_for_mip() {
        let model = uniform_model(1, &[], 0);
        let result = solve_mip(&model, SearchBudget::unlimited()).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.objective, Some(0));
    }

    #[test]
    fn test_invalid_backend_schedule_is_rejected() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);
        let values = values_for_times(&model, &[10, 12]);
        let backend = FixedBackend(Ok(BackendSolution::new(values, true, 3)));
        let failure =
            solve_mip_with_backend(&model, &backend, SearchBudget::unlimited()).unwrap_err();
        assert!(matches!(failure, SolverBackendFailure::InvalidSchedule(ref v) if !v.is_empty()));
    }

    #[test]
    fn test_objective_mismatch_is_rejected() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);
        let mut values = values_for_times(&model, &[10, 15]);
        let mip = MipModel::build(&model);
        values[mip.lateness_var(ai(1)).get()] = 1.0;
        let backend = FixedBackend(Ok(BackendSolution::new(values, true, 0)));
        let failure =
            solve_mip_with_backend(&model, &backend, SearchBudget::unlimited()).unwrap_err();
        assert_eq!(
            failure,
            SolverBackendFailure::ObjectiveMismatch {
                backend: 1.0,
                evaluated: 5
            }
        );
    }

    #[test]
    fn test_backend_errors_are_surfaced() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);
        let backend = FixedBackend(Err(BackendError::NumericalFailure("singular".to_string())));
        let failure =
            solve_mip_with_backend(&model, &backend, SearchBudget::unlimited()).unwrap_err();
        assert_eq!(
            failure,
            SolverBackendFailure::Backend(BackendError::NumericalFailure("singular".to_string()))
        );
    }

    #[test]
    fn test_unproven_backend_result_is_feasible() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);
        let values = values_for_times(&model, &[10, 16]);
        let backend = FixedBackend(Ok(BackendSolution::new(values, false, 42)));
        let result = solve_mip_with_backend(&model, &backend, SearchBudget::unlimited()).unwrap();
        assert_eq!(result.status, SolveStatus::Feasible);
        assert_eq!(result.objective, Some(6));
        assert_eq!(result.statistics.backend_iterations, 42);
        assert_eq!(result.statistics.best_bound, None);
    }
}
