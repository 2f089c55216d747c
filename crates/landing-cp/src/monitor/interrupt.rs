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
use landing_search::{budget::CancellationToken, command::SearchCommand};
use num_traits::{PrimInt, Signed};

/// Stops the search once its `CancellationToken` has been cancelled,
/// typically from another thread.
#[derive(Debug, Clone)]
pub struct InterruptMonitor<T> {
    token: CancellationToken,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> InterruptMonitor<T> {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl<T> TreeSearchMonitor<T> for InterruptMonitor<T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &CpSearchStatistics<T>,
    ) -> SearchCommand {
        if self.token.is_cancelled() {
            SearchCommand::BudgetExhausted("Interrupt signal received".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landing_model::model::ModelBuilder;

    #[test]
    fn test_cancel_from_other_thread() {
        let model = ModelBuilder::<i64>::new(1, 0, 0).build().unwrap();
        let state = SearchState::from_model(&model);
        let token = CancellationToken::new();
        let mut monitor = InterruptMonitor::<i64>::new(token.clone());
        let stats = CpSearchStatistics::default();

        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);

        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();

        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::BudgetExhausted("Interrupt signal received".to_string())
        );
    }
}
