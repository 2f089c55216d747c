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

//! Wall-clock budget for the constraint search.
//!
//! The clock restarts when the search starts and is read only on steps
//! whose count has no bits in common with the check mask, so throughput
//! is barely affected.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState,
    stats::CpSearchStatistics,
};
use landing_model::model::Model;
use landing_search::command::SearchCommand;
use num_traits::{PrimInt, Signed};
use std::time::{Duration, Instant};

/// Stops the search once the time limit has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor<T> {
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Checks the clock every 16384 steps.
    pub const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_STEP_CLOCK_CHECK_MASK)
    }

    /// Creates a monitor reading the clock on steps where `steps & mask == 0`.
    pub fn with_clock_check_mask(time_limit: Duration, mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask: mask,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor<T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &CpSearchStatistics<T>) {
        self.start_time = Instant::now();
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        statistics: &CpSearchStatistics<T>,
    ) -> SearchCommand {
        if (statistics.steps & self.clock_check_mask) == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::BudgetExhausted("Time limit exceeded".to_string());
        }
        SearchCommand::Continue
    }
}

impl<T> std::fmt::Display for TimeLimitMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimeLimitMonitor(time_limit: {:.3}s, clock_check_mask: {:#x})",
            self.time_limit.as_secs_f64(),
            self.clock_check_mask
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landing_model::model::ModelBuilder;

    #[test]
    fn test_zero_limit_stops_on_masked_step() {
        let model = ModelBuilder::<i64>::new(1, 0, 0).build().unwrap();
        let state = SearchState::from_model(&model);
        let mut monitor = TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::ZERO, 0x3);
        let mut stats = CpSearchStatistics::default();
        monitor.on_enter_search(&model, &stats);

        stats.steps = 1;
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);

        stats.steps = 4;
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::BudgetExhausted(_)
        ));
    }

    #[test]
    fn test_zero_mask_reads_clock_on_every_step() {
        let model = ModelBuilder::<i64>::new(1, 0, 0).build().unwrap();
        let state = SearchState::from_model(&model);
        let mut monitor = TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::ZERO, 0);
        let mut stats = CpSearchStatistics::default();
        monitor.on_enter_search(&model, &stats);

        for steps in [1, 7, 12345] {
            stats.steps = steps;
            assert!(matches!(
                monitor.search_command(&state, &stats),
                SearchCommand::BudgetExhausted(_)
            ));
        }
    }

    #[test]
    fn test_generous_limit_continues() {
        let model = ModelBuilder::<i64>::new(1, 0, 0).build().unwrap();
        let state = SearchState::from_model(&model);
        let mut monitor = TimeLimitMonitor::<i64>::new(Duration::from_secs(3600));
        let stats = CpSearchStatistics::default();
        monitor.on_enter_search(&model, &stats);
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
    }

    #[test]
    fn test_display() {
        let monitor =
            TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::from_millis(1500), 0xFF);
        assert_eq!(
            format!("{}", monitor),
            "TimeLimitMonitor(time_limit: 1.500s, clock_check_mask: 0xff)"
        );
    }
}
