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

//! Turning a fully sequenced node into a `Schedule`.
//!
//! Once every aircraft has a runway and every co-runway pair is ordered,
//! the propagated lower bounds already form a feasible schedule. The
//! target-closest rule instead fixes aircraft one at a time at the point of
//! their interval nearest to the target, re-propagating after each.

use crate::{propagate::propagate, state::SearchState, trail::SearchTrail};
use landing_model::{index::AircraftIndex, model::Model, schedule::Schedule};
use num_traits::{PrimInt, Signed};

/// How landing times are chosen once a node is fully sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LandingTimeRule {
    /// Every aircraft lands at the lower end of its interval.
    #[default]
    Earliest,
    /// Aircraft are fixed in order of their lower bounds, each as close to
    /// its target as the interval allows.
    TargetClosest,
}

impl std::fmt::Display for LandingTimeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandingTimeRule::Earliest => write!(f, "earliest"),
            LandingTimeRule::TargetClosest => write!(f, "target-closest"),
        }
    }
}

/// Reusable scratch space for building completions.
#[derive(Debug)]
pub struct CompletionBuilder<T> {
    scratch: Option<SearchState<T>>,
    trail: SearchTrail<T>,
}

impl<T> Default for CompletionBuilder<T> {
    fn default() -> Self {
        Self {
            scratch: None,
            trail: SearchTrail::new(),
        }
    }
}

impl<T> CompletionBuilder<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the completion of `state` under `rule`.
    ///
    /// Returns `None` if some aircraft has no runway yet. The caller must
    /// ensure every co-runway pair is ordered and `state` is propagated.
    pub fn build(
        &mut self,
        model: &Model<T>,
        state: &SearchState<T>,
        rule: LandingTimeRule,
    ) -> Option<Schedule<T>> {
        let runways = state.runway_assignment()?;
        match rule {
            LandingTimeRule::Earliest => {
                Some(Schedule::new(runways, state.lower_bounds().to_vec()))
            }
            LandingTimeRule::TargetClosest => {
                let times = self
                    .target_closest_times(model, state)
                    .unwrap_or_else(|| state.lower_bounds().to_vec());
                Some(Schedule::new(runways, times))
            }
        }
    }

    fn target_closest_times(&mut self, model: &Model<T>, state: &SearchState<T>) -> Option<Vec<T>> {
        let scratch = match &mut self.scratch {
            Some(scratch) => {
                scratch.clone_from(state);
                scratch
            }
            slot => slot.insert(state.clone()),
        };
        self.trail.reset();
        self.trail.push_frame();

        let mut order: Vec<AircraftIndex> =
            (0..state.num_aircraft()).map(AircraftIndex::new).collect();
        order.sort_unstable_by_key(|&a| (state.lower_bound(a), a.get()));

        let mut feasible = true;
        for a in order {
            let time = model
                .target_landing_time(a)
                .max(scratch.lower_bound(a))
                .min(scratch.upper_bound(a));
            self.trail.tighten_lower(scratch, a, time);
            self.trail.tighten_upper(scratch, a, time);
            if propagate(model, scratch, &mut self.trail).is_err() {
                feasible = false;
                break;
            }
        }

        let times = feasible.then(|| scratch.lower_bounds().to_vec());
        self.trail.reset();
        times
    }
}
