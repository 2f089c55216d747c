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

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState,
    stats::CpSearchStatistics,
};
use landing_model::{model::Model, schedule::Schedule};
use num_traits::{PrimInt, Signed};
use std::time::{Duration, Instant};

/// Prints a progress table to stdout while the search runs.
#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<T>,
    lower_bound: Option<T>,
}

impl<T> LogMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    /// Creates a monitor printing at most once per `log_interval`; the clock is
    /// read on steps where `steps & clock_check_mask == 0`.
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_objective: None,
            lower_bound: None,
        }
    }

    fn print_header(&self) {
        println!(
            "{:<9} | {:<12} | {:<6} | {:<14} | {:<12} | {:<10} | {:<10}",
            "Elapsed", "Nodes", "Depth", "Best Solution", "Lower Bound", "Backtracks", "Pruned"
        );
        println!("{}", "-".repeat(93));
    }

    fn log_line(&mut self, statistics: &CpSearchStatistics<T>) {
        let now = Instant::now();
        let elapsed = format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32());
        let best = self
            .best_objective
            .map_or_else(|| "Inf".to_string(), |objective| objective.to_string());
        let bound = self
            .lower_bound
            .map_or_else(|| "-".to_string(), |bound| bound.to_string());
        let pruned = statistics
            .prunings_bound
            .saturating_add(statistics.prunings_infeasible);

        println!(
            "{:<9} | {:<12} | {:<6} | {:<14} | {:<12} | {:<10} | {:<10}",
            elapsed,
            statistics.nodes_explored,
            statistics.max_depth,
            best,
            bound,
            statistics.backtracks,
            pruned
        );
        self.last_log_time = now;
    }
}

impl<T> Default for LogMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 0xFFF)
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &CpSearchStatistics<T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        self.lower_bound = None;
        self.print_header();
    }

    fn on_step(&mut self, _state: &SearchState<T>, statistics: &CpSearchStatistics<T>) {
        if (statistics.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(statistics);
        }
    }

    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        lower_bound: T,
        statistics: &CpSearchStatistics<T>,
    ) {
        // Only the root bound is global.
        if statistics.nodes_explored <= 1 {
            self.lower_bound = Some(lower_bound);
        }
    }

    fn on_solution_found(
        &mut self,
        _schedule: &Schedule<T>,
        objective: T,
        _statistics: &CpSearchStatistics<T>,
    ) {
        self.best_objective = Some(objective);
    }

    fn on_exit_search(&mut self, statistics: &CpSearchStatistics<T>) {
        self.log_line(statistics);
        println!("{}", "-".repeat(93));
        println!("Search finished.");
    }
}
