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

use num_traits::Zero;
use std::time::Duration;

/// Counters collected while the constraint search runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpSearchStatistics<T> {
    /// Iterations of the search loop.
    pub steps: u64,
    /// Nodes entered, the root included.
    pub nodes_explored: u64,
    pub backtracks: u64,
    /// Alternatives pushed onto the decision stack.
    pub decisions_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Nodes closed because propagation emptied a domain or found no feasible order.
    pub prunings_infeasible: u64,
    /// Nodes closed because their lower bound could not beat the incumbent.
    pub prunings_bound: u64,
    pub propagation_failures: u64,
    pub solutions_found: u64,
    /// The lower bound after root propagation.
    pub root_lower_bound: T,
    pub time_total: Duration,
}

impl<T> Default for CpSearchStatistics<T>
where
    T: Zero,
{
    fn default() -> Self {
        Self {
            steps: 0,
            nodes_explored: 0,
            backtracks: 0,
            decisions_generated: 0,
            max_depth: 0,
            prunings_infeasible: 0,
            prunings_bound: 0,
            propagation_failures: 0,
            solutions_found: 0,
            root_lower_bound: T::zero(),
            time_total: Duration::ZERO,
        }
    }
}

impl<T> CpSearchStatistics<T> {
    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_decisions_generated(&mut self, count: usize) {
        self.decisions_generated = self.decisions_generated.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_propagation_failure(&mut self) {
        self.propagation_failures = self.propagation_failures.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: T) {
        self.root_lower_bound = bound;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl<T> std::fmt::Display for CpSearchStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Search Statistics:")?;
        writeln!(f, "  Steps:                  {}", self.steps)?;
        writeln!(f, "  Nodes explored:         {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:             {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:      {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:    {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (infeasible):  {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):       {}", self.prunings_bound)?;
        writeln!(f, "  Propagation failures:   {}", self.propagation_failures)?;
        writeln!(f, "  Solutions found:        {}", self.solutions_found)?;
        writeln!(f, "  Root lower bound:       {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:             {:.2?}", self.time_total)?;
        Ok(())
    }
}
