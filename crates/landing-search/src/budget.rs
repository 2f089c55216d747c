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

//! # Search Budgets
//!
//! Caller-supplied limits for a single solve. A budget bounds the wall-clock
//! time, the number of explored nodes, or both, and may carry a
//! `CancellationToken` that another thread can trigger at any time.
//! Exhausting a budget is never an error: the engines report it through the
//! `TimedOut` status and hand back their best schedule, if any.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

/// A shareable cooperative cancellation flag.
///
/// Clones share the same flag, so a clone can be moved to another thread
/// and cancelled there while the solve polls the original.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a new token that is not cancelled.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every solve polling this token.
    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns the underlying flag.
    #[inline]
    pub fn as_atomic(&self) -> &AtomicBool {
        &self.flag
    }
}

impl std::fmt::Display for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CancellationToken(cancelled: {})", self.is_cancelled())
    }
}

/// Limits for a single solve. The default budget is unlimited.
///
/// # Examples
///
/// ```rust
/// # use landing_search::budget::SearchBudget;
/// # use std::time::Duration;
///
/// let budget = SearchBudget::unlimited()
///     .with_time_limit(Duration::from_secs(30))
///     .with_node_limit(1_000_000);
/// assert_eq!(budget.time_limit, Some(Duration::from_secs(30)));
/// assert_eq!(budget.node_limit, Some(1_000_000));
/// assert!(budget.cancellation.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
    pub cancellation: Option<CancellationToken>,
}

impl SearchBudget {
    #[inline]
    pub fn unlimited() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    #[inline]
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }

    #[inline]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns `true` if no limit of any kind is set.
    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.time_limit.is_none() && self.node_limit.is_none() && self.cancellation.is_none()
    }

    /// Returns `true` if the budget carries a token that has been cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl std::fmt::Display for SearchBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchBudget(time_limit: ")?;
        match self.time_limit {
            Some(limit) => write!(f, "{:.3}s", limit.as_secs_f64())?,
            None => write!(f, "none")?,
        }
        write!(f, ", node_limit: ")?;
        match self.node_limit {
            Some(limit) => write!(f, "{}", limit)?,
            None => write!(f, "none")?,
        }
        write!(f, ", cancellable: {})", self.cancellation.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_unlimited() {
        let budget = SearchBudget::default();
        assert!(budget.is_unlimited());
        assert!(!budget.is_cancelled());
        assert_eq!(
            format!("{}", budget),
            "SearchBudget(time_limit: none, node_limit: none, cancellable: false)"
        );
    }

    #[test]
    fn test_builders_set_limits() {
        let budget = SearchBudget::unlimited()
            .with_time_limit(Duration::from_millis(1500))
            .with_node_limit(42);
        assert!(!budget.is_unlimited());
        assert_eq!(
            format!("{}", budget),
            "SearchBudget(time_limit: 1.500s, node_limit: 42, cancellable: false)"
        );
    }

    #[test]
    fn test_cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let budget = SearchBudget::unlimited().with_cancellation(token.clone());
        assert!(!budget.is_cancelled());

        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();

        assert!(token.is_cancelled());
        assert!(budget.is_cancelled());
        assert!(budget.clone().is_cancelled());
    }
}
