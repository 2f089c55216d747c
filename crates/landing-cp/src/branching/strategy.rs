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

//! Branching-variable and value selection.
//!
//! A `SearchStrategy` is a plain value combining a `BranchingRule`, which
//! picks what to branch on, with a `ValueRule`, which orders the
//! alternatives. Every function here is a pure function of the model and the
//! current `SearchState`; the randomized value rule derives its generator
//! from the seed and the decision itself, so equal inputs give equal orders.

use crate::{completion::LandingTimeRule, state::SearchState};
use landing_model::{
    index::{AircraftIndex, RunwayIndex},
    model::Model,
    schedule::Schedule,
};
use landing_search::num::SolverNumeric;
use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use std::cmp::{Ordering, Reverse};

use super::decision::Decision;

/// Alternatives of one branching decision, in trial order.
pub type Alternatives<T> = SmallVec<[Decision<T>; 4]>;

/// Which aircraft or pair the search branches on next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BranchingRule {
    /// Smallest current landing-time interval first.
    #[default]
    MostConstrained,
    /// Smallest latest landing time first.
    EarliestDeadline,
    /// Largest penalty rate `max(alpha, beta)` first.
    HighestPenaltyImpact,
}

impl std::fmt::Display for BranchingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchingRule::MostConstrained => write!(f, "most-constrained"),
            BranchingRule::EarliestDeadline => write!(f, "earliest-deadline"),
            BranchingRule::HighestPenaltyImpact => write!(f, "highest-penalty-impact"),
        }
    }
}

/// In which order the alternatives of a decision are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueRule {
    /// Earlier landing times and "before" orders first.
    #[default]
    EarliestFeasible,
    /// Alternatives with the smallest immediate penalty first.
    TargetClosest,
    /// A seeded pseudo-random permutation.
    Randomized,
}

impl std::fmt::Display for ValueRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueRule::EarliestFeasible => write!(f, "earliest-feasible"),
            ValueRule::TargetClosest => write!(f, "target-closest"),
            ValueRule::Randomized => write!(f, "randomized"),
        }
    }
}

/// The heuristics steering the constraint search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SearchStrategy {
    pub branching: BranchingRule,
    pub value: ValueRule,
    pub landing_time: LandingTimeRule,
    /// Seed of the randomized value rule; ignored by the other rules.
    pub seed: u64,
}

impl SearchStrategy {
    #[inline]
    pub fn new(branching: BranchingRule, value: ValueRule) -> Self {
        Self {
            branching,
            value,
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_branching(mut self, branching: BranchingRule) -> Self {
        self.branching = branching;
        self
    }

    #[inline]
    pub fn with_value(mut self, value: ValueRule) -> Self {
        self.value = value;
        self
    }

    #[inline]
    pub fn with_landing_time(mut self, landing_time: LandingTimeRule) -> Self {
        self.landing_time = landing_time;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Selects the unassigned aircraft to give a runway next.
    pub fn select_unassigned_aircraft<T>(
        &self,
        model: &Model<T>,
        state: &SearchState<T>,
    ) -> Option<AircraftIndex>
    where
        T: SolverNumeric,
    {
        (0..state.num_aircraft())
            .map(AircraftIndex::new)
            .filter(|&a| !state.is_assigned(a))
            .min_by(|&a, &b| self.compare_aircraft(model, state, a, b))
    }

    /// Selects the unordered pair of aircraft sharing a runway to sequence next.
    ///
    /// The returned pair is in index order.
    pub fn select_unordered_pair<T>(
        &self,
        model: &Model<T>,
        state: &SearchState<T>,
    ) -> Option<(AircraftIndex, AircraftIndex)>
    where
        T: SolverNumeric,
    {
        let num_aircraft = state.num_aircraft();
        let mut best: Option<(AircraftIndex, AircraftIndex)> = None;
        for i in 0..num_aircraft {
            let a = AircraftIndex::new(i);
            if !state.is_assigned(a) {
                continue;
            }
            for j in (i + 1)..num_aircraft {
                let b = AircraftIndex::new(j);
                if !state.share_runway(a, b) || state.is_ordered(a, b) {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some(current) => {
                        self.compare_pairs(model, state, (a, b), current) == Ordering::Less
                    }
                };
                if better {
                    best = Some((a, b));
                }
            }
        }
        best
    }

    fn compare_aircraft<T>(
        &self,
        model: &Model<T>,
        state: &SearchState<T>,
        a: AircraftIndex,
        b: AircraftIndex,
    ) -> Ordering
    where
        T: SolverNumeric,
    {
        let primary = match self.branching {
            BranchingRule::MostConstrained => (
                state.domain_width(a),
                model.num_eligible_runways(a),
            )
                .cmp(&(state.domain_width(b), model.num_eligible_runways(b))),
            BranchingRule::EarliestDeadline => model
                .latest_landing_time(a)
                .cmp(&model.latest_landing_time(b)),
            BranchingRule::HighestPenaltyImpact => {
                Reverse(model.max_penalty(a)).cmp(&Reverse(model.max_penalty(b)))
            }
        };
        primary.then_with(|| a.get().cmp(&b.get()))
    }

    fn compare_pairs<T>(
        &self,
        model: &Model<T>,
        state: &SearchState<T>,
        (a1, b1): (AircraftIndex, AircraftIndex),
        (a2, b2): (AircraftIndex, AircraftIndex),
    ) -> Ordering
    where
        T: SolverNumeric,
    {
        let primary = match self.branching {
            BranchingRule::MostConstrained => {
                let key = |x: AircraftIndex, y: AircraftIndex| {
                    let (wx, wy) = (state.domain_width(x), state.domain_width(y));
                    (wx.min(wy), wx.saturating_add(wy))
                };
                key(a1, b1).cmp(&key(a2, b2))
            }
            BranchingRule::EarliestDeadline => {
                let key = |x: AircraftIndex, y: AircraftIndex| {
                    let (lx, ly) = (model.latest_landing_time(x), model.latest_landing_time(y));
                    (lx.min(ly), lx.max(ly))
                };
                key(a1, b1).cmp(&key(a2, b2))
            }
            BranchingRule::HighestPenaltyImpact => {
                let key = |x: AircraftIndex, y: AircraftIndex| {
                    let (px, py) = (model.max_penalty(x), model.max_penalty(y));
                    Reverse((px.max(py), px.saturating_add(py)))
                };
                key(a1, b1).cmp(&key(a2, b2))
            }
        };
        primary.then_with(|| (a1.get(), b1.get()).cmp(&(a2.get(), b2.get())))
    }

    /// Returns the runway alternatives of `aircraft` in trial order.
    ///
    /// Without runway restrictions the runways are interchangeable, so only
    /// the occupied runways and the lowest empty one are offered.
    pub fn runway_alternatives<T>(
        &self,
        model: &Model<T>,
        state: &SearchState<T>,
        aircraft: AircraftIndex,
        depth: usize,
    ) -> Alternatives<T>
    where
        T: SolverNumeric,
    {
        let mut runways: SmallVec<[RunwayIndex; 4]> = SmallVec::new();
        if model.has_runway_restrictions() {
            runways.extend(model.eligible_runways(aircraft));
        } else {
            let mut offered_empty = false;
            for runway in model.runways() {
                if state.runway_load(runway) > 0 {
                    runways.push(runway);
                } else if !offered_empty {
                    runways.push(runway);
                    offered_empty = true;
                }
            }
        }

        match self.value {
            ValueRule::EarliestFeasible => {
                runways
                    .sort_by_cached_key(|&r| (earliest_slot(model, state, aircraft, r), r.get()));
            }
            ValueRule::TargetClosest => {
                runways.sort_by_cached_key(|&r| {
                    let slot = earliest_slot(model, state, aircraft, r);
                    let upper = state.upper_bound(aircraft);
                    let cost = if slot > upper {
                        T::max_value()
                    } else {
                        model.min_landing_cost(aircraft, slot, upper)
                    };
                    (cost, slot, r.get())
                });
            }
            ValueRule::Randomized => {
                let identity = [1, aircraft.get() as u64];
                runways.shuffle(&mut self.rng(&identity, depth));
            }
        }

        runways
            .into_iter()
            .map(|runway| Decision::assign_runway(aircraft, runway))
            .collect()
    }

    /// Returns the two orders of the pair `(a, b)` in trial order.
    pub fn sequence_alternatives<T>(
        &self,
        model: &Model<T>,
        state: &SearchState<T>,
        a: AircraftIndex,
        b: AircraftIndex,
        depth: usize,
    ) -> Alternatives<T>
    where
        T: SolverNumeric,
    {
        let forward = Decision::sequence(a, b);
        let backward = Decision::sequence(b, a);
        let mut alternatives: Alternatives<T> = SmallVec::new();

        let forward_first = match self.value {
            ValueRule::EarliestFeasible => state.lower_bound(b) >= state.lower_bound(a),
            ValueRule::TargetClosest => {
                order_cost_increase(model, state, a, b) <= order_cost_increase(model, state, b, a)
            }
            ValueRule::Randomized => {
                alternatives.push(forward);
                alternatives.push(backward);
                let identity = [2, a.get() as u64, b.get() as u64];
                alternatives.shuffle(&mut self.rng(&identity, depth));
                return alternatives;
            }
        };

        if forward_first {
            alternatives.push(forward);
            alternatives.push(backward);
        } else {
            alternatives.push(backward);
            alternatives.push(forward);
        }
        alternatives
    }

    /// Returns the alternatives splitting the interval of `aircraft`, in trial order.
    ///
    /// If the target lies in the interval, the parts are the target itself
    /// and the non-empty ranges on either side of it; otherwise the interval
    /// is bisected. The parts cover every time of the interval exactly once.
    pub fn restrict_alternatives<T>(
        &self,
        model: &Model<T>,
        state: &SearchState<T>,
        aircraft: AircraftIndex,
        depth: usize,
    ) -> Alternatives<T>
    where
        T: SolverNumeric,
    {
        let lower = state.lower_bound(aircraft);
        let upper = state.upper_bound(aircraft);
        let target = model.target_landing_time(aircraft);
        let one = T::one();

        // (lower, upper, is_target)
        let mut parts: SmallVec<[(T, T, bool); 4]> = SmallVec::new();
        if lower <= target && target <= upper {
            parts.push((target, target, true));
            if target > lower {
                parts.push((lower, target - one, false));
            }
            if target < upper {
                parts.push((target + one, upper, false));
            }
        } else if lower < upper {
            let two = one + one;
            let middle = match upper.checked_sub(&lower) {
                Some(width) => lower + width / two,
                // Opposite signs, so the sum stays in range.
                None => (lower + upper) / two,
            };
            parts.push((lower, middle, false));
            parts.push((middle + one, upper, false));
        } else {
            parts.push((lower, upper, false));
        }

        match self.value {
            ValueRule::EarliestFeasible => {
                parts.sort_unstable_by_key(|&(lo, _, _)| lo);
            }
            ValueRule::TargetClosest => {
                parts.sort_by_cached_key(|&(lo, hi, is_target)| {
                    (!is_target, model.min_landing_cost(aircraft, lo, hi), lo)
                });
            }
            ValueRule::Randomized => {
                let identity = [
                    3,
                    aircraft.get() as u64,
                    lower.to_i64().unwrap_or_default() as u64,
                    upper.to_i64().unwrap_or_default() as u64,
                ];
                parts.shuffle(&mut self.rng(&identity, depth));
            }
        }

        parts
            .into_iter()
            .map(|(lo, hi, _)| Decision::restrict(aircraft, lo, hi))
            .collect()
    }

    fn rng(&self, identity: &[u64], depth: usize) -> ChaCha8Rng {
        let decision = identity
            .iter()
            .fold(0u64, |hash, &word| splitmix64(hash ^ word));
        ChaCha8Rng::seed_from_u64(splitmix64(self.seed ^ splitmix64(decision) ^ depth as u64))
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.branching, self.value)?;
        if self.value == ValueRule::Randomized {
            write!(f, "({})", self.seed)?;
        }
        if self.landing_time != LandingTimeRule::Earliest {
            write!(f, "+{}-times", self.landing_time)?;
        }
        Ok(())
    }
}

#[inline]
fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Returns the earliest time `aircraft` could land on `runway` given the
/// aircraft already placed there.
///
/// Aircraft on the runway are scanned by lower bound; each one that could
/// land no later than the current candidate pushes it back by its separation.
pub fn earliest_slot<T>(
    model: &Model<T>,
    state: &SearchState<T>,
    aircraft: AircraftIndex,
    runway: RunwayIndex,
) -> T
where
    T: SolverNumeric,
{
    let mut occupants: SmallVec<[AircraftIndex; 16]> = state.aircraft_on_runway(runway).collect();
    occupants.sort_unstable_by_key(|&b| (state.lower_bound(b), b.get()));

    let mut slot = state.lower_bound(aircraft);
    for b in occupants {
        let lower = state.lower_bound(b);
        if lower <= slot {
            slot = slot.max(lower.saturating_add(model.separation(b, aircraft)));
        }
    }
    slot
}

/// Returns how much the combined interval minimum of the two aircraft grows
/// if `leading` is sequenced before `trailing`, or `T::max_value()` if that
/// order empties a domain.
fn order_cost_increase<T>(
    model: &Model<T>,
    state: &SearchState<T>,
    leading: AircraftIndex,
    trailing: AircraftIndex,
) -> T
where
    T: SolverNumeric,
{
    let separation = model.separation(leading, trailing);
    let (lead_lo, lead_hi) = (state.lower_bound(leading), state.upper_bound(leading));
    let (trail_lo, trail_hi) = (state.lower_bound(trailing), state.upper_bound(trailing));

    let new_trail_lo = trail_lo.max(lead_lo.saturating_add(separation));
    let new_lead_hi = lead_hi.min(trail_hi.saturating_sub(separation));
    if new_trail_lo > trail_hi || new_lead_hi < lead_lo {
        return T::max_value();
    }

    let before = model
        .min_landing_cost(leading, lead_lo, lead_hi)
        .saturating_add(model.min_landing_cost(trailing, trail_lo, trail_hi));
    let after = model
        .min_landing_cost(leading, lead_lo, new_lead_hi)
        .saturating_add(model.min_landing_cost(trailing, new_trail_lo, trail_hi));
    after.saturating_sub(before)
}

/// Returns the aircraft whose landing in `schedule` exceeds its interval
/// minimum the most, or `None` if every aircraft lands at its minimum.
///
/// Ties go to the lowest index.
pub fn select_split_aircraft<T>(
    model: &Model<T>,
    state: &SearchState<T>,
    schedule: &Schedule<T>,
) -> Option<AircraftIndex>
where
    T: SolverNumeric,
{
    let mut best: Option<(AircraftIndex, T)> = None;
    for (index, &time) in schedule.landing_times().iter().enumerate() {
        let aircraft = AircraftIndex::new(index);
        let excess = crate::bound::excess_cost(model, state, aircraft, time);
        if excess <= T::zero() {
            continue;
        }
        match best {
            Some((_, current)) if current >= excess => {}
            _ => best = Some((aircraft, excess)),
        }
    }
    best.map(|(aircraft, _)| aircraft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::SearchTrail;
    use landing_model::{index::ClassIndex, model::ModelBuilder};

    fn ai(i: usize) -> AircraftIndex {
        AircraftIndex::new(i)
    }

    fn ri(i: usize) -> RunwayIndex {
        RunwayIndex::new(i)
    }

    // Windows (E, T, L) and penalties (alpha, beta) per aircraft, one class, separation 5.
    fn build_model(num_runways: usize, aircraft: &[(i64, i64, i64, i64, i64)]) -> Model<i64> {
        let mut b = ModelBuilder::<i64>::new(num_runways, aircraft.len(), 1);
        for (i, &(e, t, l, alpha, beta)) in aircraft.iter().enumerate() {
            b.set_landing_window(ai(i), e, t, l).set_penalties(ai(i), alpha, beta);
        }
        b.set_separation(ClassIndex::new(0), ClassIndex::new(0), 5);
        b.build().unwrap()
    }

    #[test]
    fn test_default_strategy_and_display() {
        let strategy = SearchStrategy::default();
        assert_eq!(strategy.branching, BranchingRule::MostConstrained);
        assert_eq!(strategy.value, ValueRule::EarliestFeasible);
        assert_eq!(strategy.landing_time, LandingTimeRule::Earliest);
        assert_eq!(format!("{}", strategy), "most-constrained/earliest-feasible");

        let randomized = strategy
            .with_branching(BranchingRule::EarliestDeadline)
            .with_value(ValueRule::Randomized)
            .with_seed(7);
        assert_eq!(format!("{}", randomized), "earliest-deadline/randomized(7)");
    }

    #[test]
    fn test_branching_rules_pick_different_aircraft() {
        let model = build_model(
            2,
            &[(0, 10, 100, 1, 1), (0, 10, 20, 1, 1), (0, 10, 50, 9, 1)],
        );
        let state = SearchState::from_model(&model);

        let pick = |rule| {
            SearchStrategy::default()
                .with_branching(rule)
                .select_unassigned_aircraft(&model, &state)
        };
        assert_eq!(pick(BranchingRule::MostConstrained), Some(ai(1)));
        assert_eq!(pick(BranchingRule::EarliestDeadline), Some(ai(1)));
        assert_eq!(pick(BranchingRule::HighestPenaltyImpact), Some(ai(2)));
    }

    #[test]
    fn test_ties_break_on_lowest_index() {
        let model = build_model(2, &[(0, 10, 20, 1, 1), (0, 10, 20, 1, 1)]);
        let state = SearchState::from_model(&model);
        for rule in [
            BranchingRule::MostConstrained,
            BranchingRule::EarliestDeadline,
            BranchingRule::HighestPenaltyImpact,
        ] {
            let strategy = SearchStrategy::default().with_branching(rule);
            assert_eq!(strategy.select_unassigned_aircraft(&model, &state), Some(ai(0)));
        }
    }

    #[test]
    fn test_symmetric_runways_offer_one_empty_runway() {
        let model = build_model(3, &[(0, 10, 20, 1, 1), (0, 10, 20, 1, 1)]);
        let mut state = SearchState::from_model(&model);
        let strategy = SearchStrategy::default();

        let alternatives = strategy.runway_alternatives(&model, &state, ai(0), 0);
        assert_eq!(alternatives.as_slice(), &[Decision::assign_runway(ai(0), ri(0))]);

        let mut trail = SearchTrail::new();
        trail.push_frame();
        trail.assign_runway(&mut state, ai(0), ri(0));
        let alternatives = strategy.runway_alternatives(&model, &state, ai(1), 1);
        // The empty runway allows landing at 0, the occupied one only at 5.
        assert_eq!(
            alternatives.as_slice(),
            &[
                Decision::assign_runway(ai(1), ri(1)),
                Decision::assign_runway(ai(1), ri(0)),
            ]
        );
    }

    #[test]
    fn test_restricted_runways_offer_eligible_runways() {
        let mut b = ModelBuilder::<i64>::new(3, 1, 1);
        b.set_landing_window(ai(0), 0, 10, 20)
            .set_separation(ClassIndex::new(0), ClassIndex::new(0), 5)
            .set_eligible_runways(ai(0), [ri(2), ri(1)]);
        let model = b.build().unwrap();
        let state = SearchState::from_model(&model);

        let alternatives = SearchStrategy::default().runway_alternatives(&model, &state, ai(0), 0);
        assert_eq!(
            alternatives.as_slice(),
            &[
                Decision::assign_runway(ai(0), ri(1)),
                Decision::assign_runway(ai(0), ri(2)),
            ]
        );
    }

    #[test]
    fn test_earliest_slot_respects_occupants() {
        let model = build_model(1, &[(0, 10, 20, 1, 1), (3, 10, 20, 1, 1), (0, 10, 20, 1, 1)]);
        let mut state = SearchState::from_model(&model);
        let mut trail = SearchTrail::new();
        trail.push_frame();
        trail.assign_runway(&mut state, ai(0), ri(0));
        trail.assign_runway(&mut state, ai(1), ri(0));
        // 0 pushes the slot to 5, then 1 (lower bound 3) pushes it to 8.
        assert_eq!(earliest_slot(&model, &state, ai(2), ri(0)), 8);
    }

    #[test]
    fn test_sequence_orders() {
        let model = build_model(1, &[(4, 20, 40, 1, 1), (0, 5, 40, 1, 1)]);
        let state = SearchState::from_model(&model);

        let earliest =
            SearchStrategy::default().sequence_alternatives(&model, &state, ai(0), ai(1), 0);
        assert_eq!(earliest[0], Decision::sequence(ai(1), ai(0)));

        let closest = SearchStrategy::default()
            .with_value(ValueRule::TargetClosest)
            .sequence_alternatives(&model, &state, ai(0), ai(1), 0);
        // 0 first would delay 1 to at least 9, 1 first costs nothing.
        assert_eq!(closest[0], Decision::sequence(ai(1), ai(0)));
        assert_eq!(closest.len(), 2);
    }

    #[test]
    fn test_restrict_splits_around_target() {
        let model = build_model(1, &[(0, 10, 20, 1, 1)]);
        let state = SearchState::from_model(&model);

        let earliest = SearchStrategy::default().restrict_alternatives(&model, &state, ai(0), 0);
        assert_eq!(
            earliest.as_slice(),
            &[
                Decision::restrict(ai(0), 0, 9),
                Decision::restrict(ai(0), 10, 10),
                Decision::restrict(ai(0), 11, 20),
            ]
        );

        let closest = SearchStrategy::default()
            .with_value(ValueRule::TargetClosest)
            .restrict_alternatives(&model, &state, ai(0), 0);
        assert_eq!(closest[0], Decision::restrict(ai(0), 10, 10));
    }

    #[test]
    fn test_restrict_bisects_without_target() {
        let model = build_model(1, &[(0, 0, 21, 1, 1)]);
        let mut state = SearchState::from_model(&model);
        let mut trail = SearchTrail::new();
        trail.push_frame();
        trail.tighten_lower(&mut state, ai(0), 11);

        let parts = SearchStrategy::default().restrict_alternatives(&model, &state, ai(0), 0);
        assert_eq!(
            parts.as_slice(),
            &[Decision::restrict(ai(0), 11, 16), Decision::restrict(ai(0), 17, 21)]
        );
    }

    #[test]
    fn test_restrict_bisects_full_i32_range() {
        let mut b = ModelBuilder::<i32>::new(1, 1, 1);
        b.set_landing_window(ai(0), i32::MIN, i32::MIN, i32::MAX)
            .set_separation(ClassIndex::new(0), ClassIndex::new(0), 0);
        let model = b.build().unwrap();
        let mut state = SearchState::from_model(&model);
        let mut trail = SearchTrail::new();
        trail.push_frame();
        trail.tighten_lower(&mut state, ai(0), i32::MIN + 1);

        let parts = SearchStrategy::default().restrict_alternatives(&model, &state, ai(0), 0);
        assert_eq!(
            parts.as_slice(),
            &[
                Decision::restrict(ai(0), i32::MIN + 1, 0),
                Decision::restrict(ai(0), 1, i32::MAX)
            ]
        );
    }

    #[test]
    fn test_randomized_order_is_reproducible() {
        let model = build_model(1, &[(0, 10, 20, 1, 1)]);
        let state = SearchState::from_model(&model);
        let strategy = SearchStrategy::default()
            .with_value(ValueRule::Randomized)
            .with_seed(42);

        let first = strategy.restrict_alternatives(&model, &state, ai(0), 3);
        let second = strategy.restrict_alternatives(&model, &state, ai(0), 3);
        assert_eq!(first, second);

        let mut sorted = first.to_vec();
        sorted.sort_unstable_by_key(|d| match d {
            Decision::Restrict { lower, .. } => *lower,
            _ => unreachable!(),
        });
        assert_eq!(
            sorted,
            vec![
                Decision::restrict(ai(0), 0, 9),
                Decision::restrict(ai(0), 10, 10),
                Decision::restrict(ai(0), 11, 20),
            ]
        );
    }

    #[test]
    fn test_split_aircraft_has_largest_excess() {
        let model = build_model(1, &[(0, 10, 20, 1, 1), (0, 10, 20, 3, 3)]);
        let state = SearchState::from_model(&model);
        let schedule = Schedule::new(vec![ri(0), ri(0)], vec![8, 12]);
        assert_eq!(select_split_aircraft(&model, &state, &schedule), Some(ai(1)));

        let at_targets = Schedule::new(vec![ri(0), ri(0)], vec![10, 10]);
        assert_eq!(select_split_aircraft(&model, &state, &at_targets), None);
    }
}
