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

use crate::stats::CpSearchStatistics;
use landing_model::schedule::Schedule;
use landing_search::result::{
    SolveResult, SolveStatisticsBuilder, SolveStatus, TerminationReason,
};
use num_traits::{PrimInt, Signed};

/// What the constraint search returns: the incumbent, why the search
/// stopped, and its statistics.
#[derive(Debug, Clone)]
pub struct CpSolverOutcome<T> {
    incumbent: Option<(Schedule<T>, T)>,
    termination_reason: TerminationReason,
    statistics: CpSearchStatistics<T>,
}

impl<T> CpSolverOutcome<T> {
    #[inline]
    pub fn optimal(schedule: Schedule<T>, objective: T, statistics: CpSearchStatistics<T>) -> Self {
        Self {
            incumbent: Some((schedule, objective)),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: CpSearchStatistics<T>) -> Self {
        Self {
            incumbent: None,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// A budget monitor stopped the search.
    #[inline]
    pub fn budget_exhausted<R>(
        incumbent: Option<(Schedule<T>, T)>,
        reason: R,
        statistics: CpSearchStatistics<T>,
    ) -> Self
    where
        R: Into<String>,
    {
        Self {
            incumbent,
            termination_reason: TerminationReason::BudgetExhausted(reason.into()),
            statistics,
        }
    }

    /// A monitor terminated the search deliberately.
    #[inline]
    pub fn aborted<R>(
        incumbent: Option<(Schedule<T>, T)>,
        reason: R,
        statistics: CpSearchStatistics<T>,
    ) -> Self
    where
        R: Into<String>,
    {
        Self {
            incumbent,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the best schedule found and its objective.
    #[inline]
    pub fn incumbent(&self) -> Option<(&Schedule<T>, &T)> {
        self.incumbent.as_ref().map(|(schedule, objective)| (schedule, objective))
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &CpSearchStatistics<T> {
        &self.statistics
    }

    /// Maps the termination reason to a status.
    ///
    /// A budget stop is `TimedOut` even with an incumbent; a deliberate stop
    /// with an incumbent is `Feasible`.
    pub fn status(&self) -> SolveStatus {
        match self.termination_reason {
            TerminationReason::OptimalityProven => SolveStatus::Optimal,
            TerminationReason::InfeasibilityProven => SolveStatus::Infeasible,
            TerminationReason::BudgetExhausted(_) => SolveStatus::TimedOut,
            TerminationReason::Aborted(_) => {
                if self.incumbent.is_some() {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::TimedOut
                }
            }
        }
    }
}

impl<T> CpSolverOutcome<T>
where
    T: PrimInt + Signed,
{
    /// Converts into the engine-independent `SolveResult`.
    ///
    /// The best bound is the objective itself once optimality is proven, and
    /// the root lower bound otherwise.
    pub fn into_solve_result(self) -> SolveResult<T> {
        let status = self.status();
        let best_bound = match status {
            SolveStatus::Optimal => self.incumbent.as_ref().map(|&(_, objective)| objective),
            SolveStatus::Infeasible => None,
            SolveStatus::Feasible | SolveStatus::TimedOut => Some(self.statistics.root_lower_bound),
        };
        let statistics = SolveStatisticsBuilder::new()
            .nodes_explored(self.statistics.nodes_explored)
            .best_bound(best_bound)
            .elapsed(self.statistics.time_total)
            .build();

        match (status, self.incumbent) {
            (SolveStatus::Optimal, Some((schedule, objective))) => {
                SolveResult::optimal(schedule, objective, statistics)
            }
            (SolveStatus::Feasible, Some((schedule, objective))) => {
                SolveResult::feasible(schedule, objective, self.termination_reason, statistics)
            }
            (SolveStatus::Infeasible, _) => SolveResult::infeasible(statistics),
            (_, incumbent) => {
                SolveResult::timed_out(incumbent, self.termination_reason, statistics)
            }
        }
    }
}

impl<T> std::fmt::Display for CpSolverOutcome<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Search Outcome:")?;
        writeln!(f, "  Termination: {}", self.termination_reason)?;
        match &self.incumbent {
            Some((_, objective)) => writeln!(f, "  Objective:   {}", objective)?,
            None => writeln!(f, "  Objective:   none")?,
        }
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landing_model::index::RunwayIndex;

    fn schedule() -> Schedule<i64> {
        Schedule::new(vec![RunwayIndex::new(0)], vec![10])
    }

    fn stats(root_lower_bound: i64) -> CpSearchStatistics<i64> {
        CpSearchStatistics {
            nodes_explored: 4,
            root_lower_bound,
            ..Default::default()
        }
    }

    #[test]
    fn test_optimal_reports_objective_as_bound() {
        let result = CpSolverOutcome::optimal(schedule(), 7, stats(2)).into_solve_result();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.objective, Some(7));
        assert_eq!(result.statistics.best_bound, Some(7));
        assert_eq!(result.statistics.nodes_explored, 4);
    }

    #[test]
    fn test_budget_with_incumbent_is_timed_out() {
        let outcome = CpSolverOutcome::budget_exhausted(
            Some((schedule(), 7)),
            "Time limit exceeded",
            stats(2),
        );
        assert_eq!(outcome.status(), SolveStatus::TimedOut);
        let result = outcome.into_solve_result();
        assert!(result.has_schedule());
        assert_eq!(result.statistics.best_bound, Some(2));
        assert_eq!(
            result.termination_reason,
            TerminationReason::BudgetExhausted("Time limit exceeded".to_string())
        );
    }

    #[test]
    fn test_aborted_status_depends_on_incumbent() {
        let with =
            CpSolverOutcome::aborted(Some((schedule(), 7)), "Solution limit reached", stats(0));
        assert_eq!(with.status(), SolveStatus::Feasible);
        let without = CpSolverOutcome::<i64>::aborted(None, "Solution limit reached", stats(0));
        assert_eq!(without.status(), SolveStatus::TimedOut);
        assert!(!without.into_solve_result().has_schedule());
    }

    #[test]
    fn test_infeasible_has_no_bound() {
        let result = CpSolverOutcome::<i64>::infeasible(stats(0)).into_solve_result();
        assert!(result.is_infeasible());
        assert_eq!(result.statistics.best_bound, None);
    }
}
