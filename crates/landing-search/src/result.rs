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

//! # Solve Results
//!
//! The engine-independent outcome of a solve. Both the constraint search and
//! the mixed-integer path report through `SolveResult`, so callers can
//! compare them field by field.

use landing_model::schedule::Schedule;
use num_traits::{PrimInt, Signed};
use std::time::Duration;

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// A schedule was found and proven optimal.
    Optimal,
    /// A schedule was found, but the search stopped before proving optimality.
    Feasible,
    /// No feasible schedule exists.
    Infeasible,
    /// A budget ran out. The result carries the incumbent if there is one.
    TimedOut,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::TimedOut => write!(f, "Timed Out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The solver found and proved optimality of a solution.
    OptimalityProven,
    /// The solver proved that the problem is infeasible.
    InfeasibilityProven,
    /// A time, node or cancellation budget ended the search.
    BudgetExhausted(String),
    /// The search was stopped on request before it completed.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::BudgetExhausted(reason) => write!(f, "Budget Exhausted: {}", reason),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Engine-independent statistics of a solve.
///
/// The constraint search fills `nodes_explored` and `best_bound`; the
/// mixed-integer path fills `backend_iterations`, `num_variables` and
/// `num_constraints`. Fields an engine does not track stay at their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStatistics<T> {
    pub nodes_explored: u64,
    pub backend_iterations: u64,
    /// The best proven lower bound on the objective, if known.
    pub best_bound: Option<T>,
    pub num_variables: usize,
    pub num_constraints: usize,
    pub elapsed: Duration,
}

impl<T> Default for SolveStatistics<T> {
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            backend_iterations: 0,
            best_bound: None,
            num_variables: 0,
            num_constraints: 0,
            elapsed: Duration::ZERO,
        }
    }
}

impl<T> std::fmt::Display for SolveStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solve Statistics:")?;
        writeln!(f, "  Nodes Explored: {}", self.nodes_explored)?;
        writeln!(f, "  Backend Iterations: {}", self.backend_iterations)?;
        match &self.best_bound {
            Some(bound) => writeln!(f, "  Best Bound: {}", bound)?,
            None => writeln!(f, "  Best Bound: -")?,
        }
        writeln!(f, "  Variables: {}", self.num_variables)?;
        writeln!(f, "  Constraints: {}", self.num_constraints)?;
        writeln!(f, "  Elapsed (secs): {:.3}", self.elapsed.as_secs_f64())
    }
}

/// Builder for `SolveStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStatisticsBuilder<T> {
    statistics: SolveStatistics<T>,
}

impl<T> Default for SolveStatisticsBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SolveStatisticsBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            statistics: SolveStatistics::default(),
        }
    }

    #[inline]
    pub fn nodes_explored(mut self, nodes_explored: u64) -> Self {
        self.statistics.nodes_explored = nodes_explored;
        self
    }

    #[inline]
    pub fn backend_iterations(mut self, backend_iterations: u64) -> Self {
        self.statistics.backend_iterations = backend_iterations;
        self
    }

    #[inline]
    pub fn best_bound(mut self, best_bound: Option<T>) -> Self {
        self.statistics.best_bound = best_bound;
        self
    }

    #[inline]
    pub fn num_variables(mut self, num_variables: usize) -> Self {
        self.statistics.num_variables = num_variables;
        self
    }

    #[inline]
    pub fn num_constraints(mut self, num_constraints: usize) -> Self {
        self.statistics.num_constraints = num_constraints;
        self
    }

    #[inline]
    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.statistics.elapsed = elapsed;
        self
    }

    #[inline]
    pub fn build(self) -> SolveStatistics<T> {
        self.statistics
    }
}

/// The result of `solve_cp` or `solve_mip`.
///
/// `schedule` and `objective` are either both present or both absent; the
/// schedule has always passed the `SolutionEvaluator` and `objective` is the
/// evaluator's value for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult<T>
where
    T: PrimInt + Signed,
{
    pub status: SolveStatus,
    pub schedule: Option<Schedule<T>>,
    pub objective: Option<T>,
    pub termination_reason: TerminationReason,
    pub statistics: SolveStatistics<T>,
}

impl<T> SolveResult<T>
where
    T: PrimInt + Signed,
{
    /// A proven optimal schedule.
    #[inline]
    pub fn optimal(schedule: Schedule<T>, objective: T, statistics: SolveStatistics<T>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            schedule: Some(schedule),
            objective: Some(objective),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    /// A proof that no feasible schedule exists.
    #[inline]
    pub fn infeasible(statistics: SolveStatistics<T>) -> Self {
        Self {
            status: SolveStatus::Infeasible,
            schedule: None,
            objective: None,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// A feasible schedule without an optimality proof.
    #[inline]
    pub fn feasible(
        schedule: Schedule<T>,
        objective: T,
        termination_reason: TerminationReason,
        statistics: SolveStatistics<T>,
    ) -> Self {
        Self {
            status: SolveStatus::Feasible,
            schedule: Some(schedule),
            objective: Some(objective),
            termination_reason,
            statistics,
        }
    }

    /// A budget ran out; `incumbent` is the best schedule found before that.
    #[inline]
    pub fn timed_out(
        incumbent: Option<(Schedule<T>, T)>,
        termination_reason: TerminationReason,
        statistics: SolveStatistics<T>,
    ) -> Self {
        let (schedule, objective) = match incumbent {
            Some((schedule, objective)) => (Some(schedule), Some(objective)),
            None => (None, None),
        };
        Self {
            status: SolveStatus::TimedOut,
            schedule,
            objective,
            termination_reason,
            statistics,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        self.status == SolveStatus::Infeasible
    }

    #[inline]
    pub fn has_schedule(&self) -> bool {
        self.schedule.is_some()
    }
}

impl<T> std::fmt::Display for SolveResult<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solve Result")?;
        writeln!(f, "   Status:          {}", self.status)?;
        writeln!(f, "   Termination:     {}", self.termination_reason)?;
        match self.objective {
            Some(objective) => writeln!(f, "   Objective Value: {}", objective)?,
            None => writeln!(f, "   Objective Value: -")?,
        }
        writeln!(f)?;
        write!(f, "{}", self.statistics)?;
        if let Some(schedule) = &self.schedule {
            writeln!(f)?;
            write!(f, "{}", schedule)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landing_model::index::RunwayIndex;

    fn schedule() -> Schedule<i64> {
        Schedule::new(vec![RunwayIndex::new(0)], vec![10])
    }

    #[test]
    fn test_constructors_set_status_and_reason() {
        let optimal = SolveResult::optimal(schedule(), 3, SolveStatistics::default());
        assert!(optimal.is_optimal());
        assert_eq!(optimal.termination_reason, TerminationReason::OptimalityProven);
        assert_eq!(optimal.objective, Some(3));

        let infeasible = SolveResult::<i64>::infeasible(SolveStatistics::default());
        assert!(infeasible.is_infeasible());
        assert!(!infeasible.has_schedule());
        assert_eq!(infeasible.objective, None);

        let feasible = SolveResult::feasible(
            schedule(),
            7,
            TerminationReason::Aborted("Solution limit reached".into()),
            SolveStatistics::default(),
        );
        assert_eq!(feasible.status, SolveStatus::Feasible);
    }

    #[test]
    fn test_timed_out_with_and_without_incumbent() {
        let reason = TerminationReason::BudgetExhausted("Time limit exceeded".into());

        let with = SolveResult::timed_out(
            Some((schedule(), 4)),
            reason.clone(),
            SolveStatistics::default(),
        );
        assert_eq!(with.status, SolveStatus::TimedOut);
        assert_eq!(with.objective, Some(4));
        assert!(with.has_schedule());

        let without = SolveResult::<i64>::timed_out(None, reason, SolveStatistics::default());
        assert_eq!(without.status, SolveStatus::TimedOut);
        assert!(!without.has_schedule());
        assert_eq!(without.objective, None);
    }

    #[test]
    fn test_statistics_builder() {
        let statistics = SolveStatisticsBuilder::<i64>::new()
            .nodes_explored(12)
            .backend_iterations(3)
            .best_bound(Some(5))
            .num_variables(20)
            .num_constraints(30)
            .elapsed(Duration::from_millis(250))
            .build();

        assert_eq!(statistics.nodes_explored, 12);
        assert_eq!(statistics.best_bound, Some(5));
        let text = format!("{}", statistics);
        assert!(text.contains("Nodes Explored: 12"));
        assert!(text.contains("Best Bound: 5"));
        assert!(text.contains("Elapsed (secs): 0.250"));
    }

    #[test]
    fn test_display_contains_status_and_schedule() {
        let result = SolveResult::optimal(schedule(), 0, SolveStatistics::default());
        let text = format!("{}", result);
        assert!(text.starts_with("Solve Result\n"));
        assert!(text.contains("Status:          Optimal"));
        assert!(text.contains("Termination:     Optimality Proven"));
        assert!(text.contains("Schedule Summary"));
    }
}
