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

//! Solver backends for `MipModel`.
//!
//! A backend receives the declarative formulation and returns one value per
//! variable. It knows nothing about aircraft; translating values back into a
//! schedule is `extract`'s job.

use crate::formulation::{ConstraintSense, MipModel, VariableIndex, VariableKind};
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, constraint,
    solvers::microlp::microlp, variable,
};
use log::warn;
use std::{
    sync::mpsc::{self, RecvTimeoutError},
    time::Duration,
};

/// Variable values returned by a backend, indexed by `VariableIndex`.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendSolution {
    values: Vec<f64>,
    is_proven_optimal: bool,
    iterations: u64,
}

impl BackendSolution {
    #[inline]
    pub fn new(values: Vec<f64>, is_proven_optimal: bool, iterations: u64) -> Self {
        Self {
            values,
            is_proven_optimal,
            iterations,
        }
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the value of `variable`, or `None` if the backend reported
    /// fewer values.
    #[inline]
    pub fn value(&self, variable: VariableIndex) -> Option<f64> {
        self.values.get(variable.get()).copied()
    }

    #[inline]
    pub fn is_proven_optimal(&self) -> bool {
        self.is_proven_optimal
    }

    /// Simplex or branching iterations, `0` when the backend does not report them.
    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

/// Why a backend returned no solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    Infeasible,
    Unbounded,
    TimeLimit,
    NumericalFailure(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Infeasible => write!(f, "The formulation is infeasible"),
            BackendError::Unbounded => write!(f, "The formulation is unbounded"),
            BackendError::TimeLimit => write!(f, "The backend exceeded its time limit"),
            BackendError::NumericalFailure(message) => {
                write!(f, "The backend failed: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

impl From<ResolutionError> for BackendError {
    fn from(error: ResolutionError) -> Self {
        match error {
            ResolutionError::Infeasible => BackendError::Infeasible,
            ResolutionError::Unbounded => BackendError::Unbounded,
            other => BackendError::NumericalFailure(other.to_string()),
        }
    }
}

/// A MIP solver behind a uniform boundary.
pub trait MipBackend {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Solves `mip` to optimality, giving up after `time_limit` if one is set.
    fn solve(
        &self,
        mip: &MipModel,
        time_limit: Option<Duration>,
    ) -> Result<BackendSolution, BackendError>;
}

impl<B> MipBackend for &B
where
    B: MipBackend + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(
        &self,
        mip: &MipModel,
        time_limit: Option<Duration>,
    ) -> Result<BackendSolution, BackendError> {
        (**self).solve(mip, time_limit)
    }
}

/// `good_lp` with its pure-Rust `microlp` solver.
///
/// With a time limit the solve runs on a worker thread and the caller waits
/// at most that long. A worker that misses the deadline is detached and its
/// result is dropped.
///
/// `microlp` cannot be interrupted, so a detached worker keeps its thread and
/// its copy of the `MipModel` until the solve finishes on its own. Repeated
/// timeouts on hard instances therefore accumulate busy threads; callers that
/// retry in a loop should bound the retries or run without a time limit.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoodLpBackend;

impl GoodLpBackend {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl MipBackend for GoodLpBackend {
    fn name(&self) -> &str {
        "GoodLpBackend(microlp)"
    }

    fn solve(
        &self,
        mip: &MipModel,
        time_limit: Option<Duration>,
    ) -> Result<BackendSolution, BackendError> {
        let Some(time_limit) = time_limit else {
            return solve_with_microlp(mip);
        };
        if time_limit.is_zero() {
            return Err(BackendError::TimeLimit);
        }

        let (sender, receiver) = mpsc::channel();
        let owned = mip.clone();
        std::thread::Builder::new()
            .name("landing-mip-backend".to_string())
            .spawn(move || {
                // The receiver is gone once the deadline has passed.
                let _ = sender.send(solve_with_microlp(&owned));
            })
            .map_err(|e| {
                BackendError::NumericalFailure(format!("failed to start backend worker: {}", e))
            })?;

        match receiver.recv_timeout(time_limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "MIP backend missed its {:.3}s deadline; detaching the worker \
                     ({} variables, {} constraints) until it finishes",
                    time_limit.as_secs_f64(),
                    mip.num_variables(),
                    mip.num_constraints()
                );
                Err(BackendError::TimeLimit)
            }
            Err(RecvTimeoutError::Disconnected) => Err(BackendError::NumericalFailure(
                "backend worker stopped without a result".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for GoodLpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn solve_with_microlp(mip: &MipModel) -> Result<BackendSolution, BackendError> {
    let mut problem_variables = ProblemVariables::new();
    let variables: Vec<good_lp::Variable> = mip
        .variables()
        .iter()
        .map(|v| {
            let definition = match v.kind() {
                VariableKind::Binary => variable().binary(),
                VariableKind::Continuous => variable().min(v.lower()).max(v.upper()),
            };
            problem_variables.add(definition.name(v.name()))
        })
        .collect();

    let mut objective = Expression::with_capacity(mip.objective().len());
    for &(var, coefficient) in mip.objective() {
        objective.add_mul(coefficient, variables[var.get()]);
    }

    let mut problem = problem_variables.minimise(objective).using(microlp);
    for c in mip.constraints() {
        let mut lhs = Expression::with_capacity(c.terms.len());
        for &(var, coefficient) in &c.terms {
            lhs.add_mul(coefficient, variables[var.get()]);
        }
        let translated = match c.sense {
            ConstraintSense::LessEqual => constraint::leq(lhs, c.rhs),
            ConstraintSense::GreaterEqual => constraint::geq(lhs, c.rhs),
            ConstraintSense::Equal => constraint::eq(lhs, c.rhs),
        };
        problem = problem.with(translated);
    }

    let solution = problem.solve()?;
    let values = variables.iter().map(|&v| solution.value(v)).collect();
    // microlp reports neither iterations nor a gap; a returned solution is optimal.
    Ok(BackendSolution::new(values, true, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use landing_model::{
        index::{AircraftIndex, ClassIndex},
        model::{Model, ModelBuilder},
    };

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

    #[test]
    fn test_solves_two_aircraft_instance() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);
        let mip = MipModel::build(&model);
        let solution = GoodLpBackend::new().solve(&mip, None).unwrap();

        assert_eq!(solution.values().len(), mip.num_variables());
        assert!(solution.is_proven_optimal());
        assert!((mip.objective_value(solution.values()) - 5.0).abs() < 1e-6);

        let x0 = solution.value(mip.landing_time_var(ai(0))).unwrap();
        let x1 = solution.value(mip.landing_time_var(ai(1))).unwrap();
        assert!(((x0 - x1).abs() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_solves_on_worker_with_time_limit() {
        let model = uniform_model(2, &[(0, 10, 30); 4], 5);
        let mip = MipModel::build(&model);
        let solution = GoodLpBackend::new()
            .solve(&mip, Some(Duration::from_secs(60)))
            .unwrap();
        assert!((mip.objective_value(solution.values()) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_reports_infeasible_formulation() {
        let model = uniform_model(1, &[(0, 5, 10), (0, 5, 10), (0, 5, 10)], 6);
        let mip = MipModel::build(&model);
        assert_eq!(
            GoodLpBackend::new().solve(&mip, None),
            Err(BackendError::Infeasible)
        );
    }

    #[test]
    fn test_zero_time_limit_gives_up_immediately() {
        let model = uniform_model(1, &[(0, 10, 20), (0, 10, 20)], 5);
        let mip = MipModel::build(&model);
        assert_eq!(
            GoodLpBackend::new().solve(&mip, Some(Duration::ZERO)),
            Err(BackendError::TimeLimit)
        );
    }

    #[test]
    fn test_missed_deadline_detaches_worker() {
        let windows: Vec<_> = (0..8).map(|i| (i, i + 10, i + 60)).collect();
        let model = uniform_model(2, &windows, 4);
        let mip = MipModel::build(&model);
        let backend = GoodLpBackend::new();

        assert_eq!(
            backend.solve(&mip, Some(Duration::from_nanos(1))),
            Err(BackendError::TimeLimit)
        );
        // The detached worker does not hold the backend.
        assert!(backend.solve(&mip, None).is_ok());
    }

    #[test]
    fn test_reference_forwards_to_backend() {
        fn backend_name<B: MipBackend>(backend: B) -> String {
            backend.name().to_string()
        }

        let backend = GoodLpBackend::new();
        let as_dyn: &dyn MipBackend = &backend;
        assert_eq!(backend_name(as_dyn), "GoodLpBackend(microlp)");
        assert_eq!(format!("{}", backend), "GoodLpBackend(microlp)");
    }

    #[test]
    fn test_backend_error_display() {
        assert_eq!(
            format!("{}", BackendError::NumericalFailure("singular basis".to_string())),
            "The backend failed: singular basis"
        );
        assert_eq!(
            format!("{}", BackendError::TimeLimit),
            "The backend exceeded its time limit"
        );
    }

    #[test]
    fn test_solution_value_out_of_range_is_none() {
        let solution = BackendSolution::new(vec![1.0, 2.0], false, 7);
        assert_eq!(solution.value(VariableIndex::new(1)), Some(2.0));
        assert_eq!(solution.value(VariableIndex::new(2)), None);
        assert_eq!(solution.iterations(), 7);
        assert!(!solution.is_proven_optimal());
    }
}
