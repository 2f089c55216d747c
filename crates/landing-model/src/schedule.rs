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

use crate::index::{AircraftIndex, RunwayIndex};
use num_traits::{PrimInt, Signed};

/// A single landing: which aircraft lands on which runway at what time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LandingAssignment<T> {
    pub aircraft: AircraftIndex,
    pub runway: RunwayIndex,
    pub time: T,
}

impl<T> LandingAssignment<T> {
    #[inline]
    pub fn new(aircraft: AircraftIndex, runway: RunwayIndex, time: T) -> Self {
        Self {
            aircraft,
            runway,
            time,
        }
    }
}

impl<T> std::fmt::Display for LandingAssignment<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Aircraft {} on runway {} at {}",
            self.aircraft.get(),
            self.runway.get(),
            self.time
        )
    }
}

/// A complete landing schedule.
///
/// This struct uses a Structure of Arrays (SoA) layout.
/// Data is indexed directly by `AircraftIndex` (i.e., index `i` corresponds to aircraft `i`),
/// so every aircraft appears exactly once by construction. Whether the
/// schedule is feasible is decided by the `SolutionEvaluator`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule<T> {
    /// `runways[a]` is the runway assigned to aircraft `a`.
    runways: Vec<RunwayIndex>,

    /// `landing_times[a]` is the landing time of aircraft `a`.
    landing_times: Vec<T>,
}

impl<T> Schedule<T>
where
    T: PrimInt + Signed,
{
    /// Constructs a new `Schedule`.
    ///
    /// # Panics
    ///
    /// Panics if `runways` and `landing_times` have different lengths.
    pub fn new(runways: Vec<RunwayIndex>, landing_times: Vec<T>) -> Self {
        assert_eq!(
            runways.len(),
            landing_times.len(),
            "called `Schedule::new` with inconsistent vector lengths: runways.len() = {}, landing_times.len() = {}",
            runways.len(),
            landing_times.len()
        );

        Self {
            runways,
            landing_times,
        }
    }

    /// Returns the runway assigned to a specific aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is out of bounds.
    #[inline]
    pub fn runway_for_aircraft(&self, aircraft_index: AircraftIndex) -> RunwayIndex {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Schedule::runway_for_aircraft` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.runways[index]
    }

    /// Returns the landing time of a specific aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is out of bounds.
    #[inline]
    pub fn landing_time_for_aircraft(&self, aircraft_index: AircraftIndex) -> T {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Schedule::landing_time_for_aircraft` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.landing_times[index]
    }

    #[inline]
    pub fn num_aircraft(&self) -> usize {
        self.runways.len()
    }

    #[inline]
    pub fn runways(&self) -> &[RunwayIndex] {
        &self.runways
    }

    #[inline]
    pub fn landing_times(&self) -> &[T] {
        &self.landing_times
    }

    /// Returns an iterator over all landings in aircraft order.
    pub fn assignments(&self) -> impl ExactSizeIterator<Item = LandingAssignment<T>> + '_ {
        self.runways
            .iter()
            .zip(self.landing_times.iter())
            .enumerate()
            .map(|(i, (&runway, &time))| {
                LandingAssignment::new(AircraftIndex::new(i), runway, time)
            })
    }

    /// Returns the aircraft landing on `runway_index`, ordered by landing
    /// time and then by aircraft index.
    pub fn landing_sequence(&self, runway_index: RunwayIndex) -> Vec<AircraftIndex> {
        let mut sequence: Vec<AircraftIndex> = (0..self.num_aircraft())
            .filter(|&i| self.runways[i] == runway_index)
            .map(AircraftIndex::new)
            .collect();
        sequence.sort_by_key(|a| (self.landing_times[a.get()], a.get()));
        sequence
    }
}

impl<T> std::fmt::Display for Schedule<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Schedule Summary")?;
        writeln!(f)?;

        if self.num_aircraft() == 0 {
            writeln!(f, "   (No aircraft scheduled)")?;
            return Ok(());
        }

        writeln!(
            f,
            "   {:<10} | {:<10} | {:<12}",
            "Aircraft", "Runway", "Landing Time"
        )?;
        writeln!(f, "   {:-<10}-+-{:-<10}-+-{:-<12}", "", "", "")?;
        for i in 0..self.num_aircraft() {
            writeln!(
                f,
                "   {:<10} | {:<10} | {:<12}",
                i,
                self.runways[i].get(),
                self.landing_times[i]
            )?;
        }

        Ok(())
    }
}
