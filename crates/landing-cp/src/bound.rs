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

//! Optimistic lower bound of a search node.
//!
//! Each aircraft contributes the cheapest deviation cost over its current
//! interval. Separations are ignored, so the sum never exceeds the cost of
//! any completion of the node.

use crate::state::SearchState;
use landing_model::{index::AircraftIndex, model::Model};
use num_traits::{PrimInt, Signed};

/// Returns the saturating sum of every aircraft's minimum cost over its interval.
///
/// # Panics
///
/// In debug builds, panics if the state and model sizes differ.
#[inline]
pub fn lower_bound<T>(model: &Model<T>, state: &SearchState<T>) -> T
where
    T: PrimInt + Signed,
{
    debug_assert_eq!(
        model.num_aircraft(),
        state.num_aircraft(),
        "called `lower_bound` with a state of a different model"
    );

    (0..state.num_aircraft())
        .map(AircraftIndex::new)
        .fold(T::zero(), |sum, a| {
            sum.saturating_add(model.min_landing_cost(
                a,
                state.lower_bound(a),
                state.upper_bound(a),
            ))
        })
}

/// Returns how much the aircraft's completion cost at `time` exceeds its interval minimum.
#[inline]
pub fn excess_cost<T>(
    model: &Model<T>,
    state: &SearchState<T>,
    aircraft: AircraftIndex,
    time: T,
) -> T
where
    T: PrimInt + Signed,
{
    let minimum = model.min_landing_cost(
        aircraft,
        state.lower_bound(aircraft),
        state.upper_bound(aircraft),
    );
    model.landing_cost(aircraft, time).saturating_sub(minimum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::SearchTrail;
    use landing_model::{index::ClassIndex, model::ModelBuilder};

    fn model() -> Model<i64> {
        let mut b = ModelBuilder::<i64>::new(1, 2, 1);
        b.set_landing_window(AircraftIndex::new(0), 0, 10, 20)
            .set_penalties(AircraftIndex::new(0), 2, 3)
            .set_landing_window(AircraftIndex::new(1), 0, 10, 20)
            .set_penalties(AircraftIndex::new(1), 1, 4)
            .set_separation(ClassIndex::new(0), ClassIndex::new(0), 5);
        b.build().unwrap()
    }

    #[test]
    fn test_root_bound_is_zero_when_targets_are_inside() {
        let model = model();
        let state = SearchState::from_model(&model);
        assert_eq!(lower_bound(&model, &state), 0);
    }

    #[test]
    fn test_bound_follows_tightened_intervals() {
        let model = model();
        let mut state = SearchState::from_model(&model);
        let mut trail = SearchTrail::new();
        trail.push_frame();
        trail.tighten_lower(&mut state, AircraftIndex::new(0), 12);
        trail.tighten_upper(&mut state, AircraftIndex::new(1), 7);
        // 3 * 2 for the first, 1 * 3 for the second.
        assert_eq!(lower_bound(&model, &state), 9);
    }

    #[test]
    fn test_excess_cost_is_relative_to_interval_minimum() {
        let model = model();
        let mut state = SearchState::from_model(&model);
        let mut trail = SearchTrail::new();
        trail.push_frame();
        trail.tighten_lower(&mut state, AircraftIndex::new(0), 12);
        assert_eq!(excess_cost(&model, &state, AircraftIndex::new(0), 12), 0);
        assert_eq!(excess_cost(&model, &state, AircraftIndex::new(0), 15), 9);
    }
}
