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

use crate::{branching::decision::Decision, state::SearchState, stats::CpSearchStatistics};
use landing_model::{model::Model, schedule::Schedule};
use landing_search::command::SearchCommand;
use num_traits::{PrimInt, Signed};

/// Reasons for closing a search node without branching.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// Propagation proved the node infeasible.
    Infeasible,
    /// The node's lower bound cannot beat the incumbent.
    BoundDominated,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
        }
    }
}

/// Observes and controls the constraint search.
///
/// Every hook except `name` has an empty default, so a monitor only
/// implements the events it cares about.
pub trait TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once before the root node is built.
    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &CpSearchStatistics<T>) {}

    /// Called once after the search loop ends.
    fn on_exit_search(&mut self, _statistics: &CpSearchStatistics<T>) {}

    /// Polled at every step and after every propagation fixpoint.
    /// Anything other than `Continue` stops the search.
    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &CpSearchStatistics<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    /// Called at every iteration of the search loop.
    fn on_step(&mut self, _state: &SearchState<T>, _statistics: &CpSearchStatistics<T>) {}

    /// Called when the lower bound of a propagated node is known.
    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        _lower_bound: T,
        _statistics: &CpSearchStatistics<T>,
    ) {
    }

    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _reason: PruneReason,
        _statistics: &CpSearchStatistics<T>,
    ) {
    }

    /// Called after the alternatives of a node have been pushed.
    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState<T>,
        _count: usize,
        _statistics: &CpSearchStatistics<T>,
    ) {
    }

    /// Called before `decision` is applied to `state`.
    fn on_descend(
        &mut self,
        _state: &SearchState<T>,
        _decision: Decision<T>,
        _statistics: &CpSearchStatistics<T>,
    ) {
    }

    /// Called after a level has been undone.
    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &CpSearchStatistics<T>) {}

    /// Called when a new incumbent with the given objective is accepted.
    fn on_solution_found(
        &mut self,
        _schedule: &Schedule<T>,
        _objective: T,
        _statistics: &CpSearchStatistics<T>,
    ) {
    }
}

impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: PrimInt + Signed,
    M: TreeSearchMonitor<T> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, model: &Model<T>, statistics: &CpSearchStatistics<T>) {
        (**self).on_enter_search(model, statistics)
    }

    fn on_exit_search(&mut self, statistics: &CpSearchStatistics<T>) {
        (**self).on_exit_search(statistics)
    }

    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &CpSearchStatistics<T>,
    ) -> SearchCommand {
        (**self).search_command(state, statistics)
    }

    fn on_step(&mut self, state: &SearchState<T>, statistics: &CpSearchStatistics<T>) {
        (**self).on_step(state, statistics)
    }

    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        statistics: &CpSearchStatistics<T>,
    ) {
        (**self).on_lower_bound_computed(state, lower_bound, statistics)
    }

    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &CpSearchStatistics<T>,
    ) {
        (**self).on_prune(state, reason, statistics)
    }

    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &CpSearchStatistics<T>,
    ) {
        (**self).on_decisions_enqueued(state, count, statistics)
    }

    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        decision: Decision<T>,
        statistics: &CpSearchStatistics<T>,
    ) {
        (**self).on_descend(state, decision, statistics)
    }

    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &CpSearchStatistics<T>) {
        (**self).on_backtrack(state, statistics)
    }

    fn on_solution_found(
        &mut self,
        schedule: &Schedule<T>,
        objective: T,
        statistics: &CpSearchStatistics<T>,
    ) {
        (**self).on_solution_found(schedule, objective, statistics)
    }
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
