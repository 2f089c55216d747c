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

//! The mutable state of one search node.
//!
//! `SearchState` holds, per aircraft, the interval `[lower, upper]` of
//! landing times that are still possible, the runway assignment made so far
//! and the precedences decided between aircraft sharing a runway. It is only
//! ever mutated through the `SearchTrail`, which records every change so the
//! state can be restored exactly on backtrack.

use fixedbitset::FixedBitSet;
use landing_model::{
    index::{AircraftIndex, RunwayIndex},
    model::Model,
};
use num_traits::{PrimInt, Signed};

#[inline(always)]
fn flatten_index(num_aircraft: usize, leading: AircraftIndex, trailing: AircraftIndex) -> usize {
    leading.get() * num_aircraft + trailing.get()
}

/// The domains, runway assignments and precedences of a search node.
#[derive(Debug)]
pub struct SearchState<T> {
    lower_bounds: Vec<T>,            // len = num_aircraft
    upper_bounds: Vec<T>,            // len = num_aircraft
    runways: Vec<RunwayIndex>,       // len = num_aircraft, valid where `assigned` is set
    assigned: FixedBitSet,           // len = num_aircraft
    precedences: FixedBitSet,        // len = num_aircraft * num_aircraft
    runway_loads: Vec<usize>,        // len = num_runways
    num_assigned: usize,
}

impl<T> Clone for SearchState<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            lower_bounds: self.lower_bounds.clone(),
            upper_bounds: self.upper_bounds.clone(),
            runways: self.runways.clone(),
            assigned: self.assigned.clone(),
            precedences: self.precedences.clone(),
            runway_loads: self.runway_loads.clone(),
            num_assigned: self.num_assigned,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.lower_bounds.clone_from(&source.lower_bounds);
        self.upper_bounds.clone_from(&source.upper_bounds);
        self.runways.clone_from(&source.runways);
        self.assigned.clone_from(&source.assigned);
        self.precedences.clone_from(&source.precedences);
        self.runway_loads.clone_from(&source.runway_loads);
        self.num_assigned = source.num_assigned;
    }
}

impl<T> SearchState<T>
where
    T: PrimInt + Signed,
{
    /// Creates the root state of `model`: every domain is the aircraft's
    /// landing window, no runway is assigned and no pair is ordered.
    pub fn from_model(model: &Model<T>) -> Self {
        let num_aircraft = model.num_aircraft();
        Self {
            lower_bounds: model.earliest_landing_times().to_vec(),
            upper_bounds: model.latest_landing_times().to_vec(),
            runways: vec![RunwayIndex::new(0); num_aircraft],
            assigned: FixedBitSet::with_capacity(num_aircraft),
            precedences: FixedBitSet::with_capacity(num_aircraft * num_aircraft),
            runway_loads: vec![0; model.num_runways()],
            num_assigned: 0,
        }
    }

    #[inline]
    pub fn num_aircraft(&self) -> usize {
        self.lower_bounds.len()
    }

    #[inline]
    pub fn num_runways(&self) -> usize {
        self.runway_loads.len()
    }

    /// Returns the smallest landing time still possible for the aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn lower_bound(&self, aircraft_index: AircraftIndex) -> T {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `SearchState::lower_bound` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.lower_bounds[index]
    }

    /// Returns the largest landing time still possible for the aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn upper_bound(&self, aircraft_index: AircraftIndex) -> T {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `SearchState::upper_bound` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.upper_bounds[index]
    }

    /// Returns `upper - lower`, i.e. one less than the number of landing times left.
    #[inline]
    pub fn domain_width(&self, aircraft_index: AircraftIndex) -> T {
        self.upper_bound(aircraft_index)
            .saturating_sub(self.lower_bound(aircraft_index))
    }

    /// Returns `true` if only one landing time is left for the aircraft.
    #[inline]
    pub fn is_fixed(&self, aircraft_index: AircraftIndex) -> bool {
        self.lower_bound(aircraft_index) == self.upper_bound(aircraft_index)
    }

    #[inline]
    pub fn lower_bounds(&self) -> &[T] {
        &self.lower_bounds
    }

    #[inline]
    pub fn upper_bounds(&self) -> &[T] {
        &self.upper_bounds
    }

    #[inline]
    pub fn is_assigned(&self, aircraft_index: AircraftIndex) -> bool {
        self.assigned.contains(aircraft_index.get())
    }

    /// Returns the runway of the aircraft, or `None` while it is unassigned.
    #[inline]
    pub fn runway(&self, aircraft_index: AircraftIndex) -> Option<RunwayIndex> {
        if self.is_assigned(aircraft_index) {
            Some(self.runways[aircraft_index.get()])
        } else {
            None
        }
    }

    /// Returns `true` if both aircraft are assigned to the same runway.
    #[inline]
    pub fn share_runway(&self, a: AircraftIndex, b: AircraftIndex) -> bool {
        self.is_assigned(a) && self.is_assigned(b) && self.runways[a.get()] == self.runways[b.get()]
    }

    #[inline]
    pub fn num_assigned_aircraft(&self) -> usize {
        self.num_assigned
    }

    #[inline]
    pub fn all_assigned(&self) -> bool {
        self.num_assigned == self.num_aircraft()
    }

    /// Returns the number of aircraft currently assigned to the runway.
    #[inline]
    pub fn runway_load(&self, runway_index: RunwayIndex) -> usize {
        let index = runway_index.get();
        debug_assert!(
            index < self.num_runways(),
            "called `SearchState::runway_load` with runway index out of bounds: the len is {} but the index is {}",
            self.num_runways(),
            index
        );

        self.runway_loads[index]
    }

    /// Returns the aircraft assigned to the runway, in index order.
    pub fn aircraft_on_runway(
        &self,
        runway_index: RunwayIndex,
    ) -> impl Iterator<Item = AircraftIndex> + '_ {
        self.assigned
            .ones()
            .filter(move |&i| self.runways[i] == runway_index)
            .map(AircraftIndex::new)
    }

    /// Returns `true` if `leading` has been decided to land before `trailing`.
    #[inline]
    pub fn precedes(&self, leading: AircraftIndex, trailing: AircraftIndex) -> bool {
        self.precedences
            .contains(flatten_index(self.num_aircraft(), leading, trailing))
    }

    /// Returns `true` if an order has been decided between the two aircraft.
    #[inline]
    pub fn is_ordered(&self, a: AircraftIndex, b: AircraftIndex) -> bool {
        self.precedes(a, b) || self.precedes(b, a)
    }

    /// Returns the runways of all aircraft, or `None` if one is still unassigned.
    pub fn runway_assignment(&self) -> Option<Vec<RunwayIndex>> {
        if !self.all_assigned() {
            return None;
        }
        Some(self.runways.clone())
    }

    #[inline]
    pub(crate) fn set_lower_bound(&mut self, aircraft_index: AircraftIndex, value: T) {
        self.lower_bounds[aircraft_index.get()] = value;
    }

    #[inline]
    pub(crate) fn set_upper_bound(&mut self, aircraft_index: AircraftIndex, value: T) {
        self.upper_bounds[aircraft_index.get()] = value;
    }

    #[inline]
    pub(crate) fn assign_runway(
        &mut self,
        aircraft_index: AircraftIndex,
        runway_index: RunwayIndex,
    ) {
        debug_assert!(
            !self.is_assigned(aircraft_index),
            "called `SearchState::assign_runway` with aircraft {} which is already assigned",
            aircraft_index.get()
        );

        self.runways[aircraft_index.get()] = runway_index;
        self.assigned.insert(aircraft_index.get());
        self.runway_loads[runway_index.get()] += 1;
        self.num_assigned += 1;
    }

    #[inline]
    pub(crate) fn unassign_runway(&mut self, aircraft_index: AircraftIndex) {
        debug_assert!(
            self.is_assigned(aircraft_index),
            "called `SearchState::unassign_runway` with aircraft {} which is not assigned",
            aircraft_index.get()
        );

        let runway = self.runways[aircraft_index.get()];
        self.assigned.set(aircraft_index.get(), false);
        self.runway_loads[runway.get()] -= 1;
        self.num_assigned -= 1;
    }

    #[inline]
    pub(crate) fn set_precedence(
        &mut self,
        leading: AircraftIndex,
        trailing: AircraftIndex,
        value: bool,
    ) {
        let n = self.num_aircraft();
        self.precedences.set(flatten_index(n, leading, trailing), value);
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(num_aircraft: {}, assigned: {}, ordered pairs: {})",
            self.num_aircraft(),
            self.num_assigned,
            self.precedences.count_ones(..)
        )
    }
}
