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

//! The immutable problem model and its builder.
//!
//! `Model` stores every per-aircraft attribute in its own vector (structure
//! of arrays) and the class-pair separation table as one flattened row-major
//! vector, so that the hot loops of the search engines touch contiguous
//! memory. A `Model` can only be obtained through `ModelBuilder::build` or
//! `Model::load`, both of which validate the instance eagerly; the engines
//! therefore never see an aircraft with an inverted window or a class pair
//! without a separation.

use crate::{
    error::InvalidInstance,
    index::{AircraftIndex, ClassIndex, RunwayIndex},
};
use fixedbitset::FixedBitSet;
use num_traits::{PrimInt, Signed};

#[inline(always)]
fn flatten_index(num_classes: usize, leading: ClassIndex, trailing: ClassIndex) -> usize {
    leading.get() * num_classes + trailing.get()
}

/// Multiplies a non-negative penalty rate with a non-negative deviation,
/// clamping to `T::max_value()` instead of overflowing.
#[inline(always)]
fn weighted_deviation<T>(rate: T, deviation: T) -> T
where
    T: PrimInt + Signed,
{
    rate.checked_mul(&deviation).unwrap_or_else(T::max_value)
}

/// The immutable data model describing aircraft, runways and separations.
///
/// This struct holds all pre-validated, queryable data:
/// - `earliest_times[a] <= target_times[a] <= latest_times[a]` for every aircraft `a`.
/// - `earliness_penalties[a]` and `lateness_penalties[a]`: non-negative cost rates
///   per time unit before and after the target.
/// - `aircraft_classes[a]`: the separation class of `a`.
/// - `class_separations[leading * num_classes + trailing]`: the non-negative
///   minimum gap when an aircraft of class `leading` lands before one of class `trailing`.
/// - `eligible_runways[a]`: a bitset over runways; all bits set unless the
///   instance restricts the aircraft.
///
/// Construction:
/// - Use `ModelBuilder` and call `ModelBuilder::build`, or `Model::load` on raw
///   instance data.
#[derive(Clone)]
pub struct Model<T>
where
    T: PrimInt + Signed,
{
    aircraft_ids: Vec<String>,            // len = num_aircraft
    earliest_times: Vec<T>,               // len = num_aircraft
    target_times: Vec<T>,                 // len = num_aircraft
    latest_times: Vec<T>,                 // len = num_aircraft
    earliness_penalties: Vec<T>,          // len = num_aircraft
    lateness_penalties: Vec<T>,           // len = num_aircraft
    aircraft_classes: Vec<ClassIndex>,    // len = num_aircraft
    eligible_runways: Vec<FixedBitSet>,   // len = num_aircraft
    class_separations: Vec<T>,            // len = num_classes * num_classes
    num_classes: usize,
    num_runways: usize,
    max_separation: T,
    has_runway_restrictions: bool,
}

impl<T> Model<T>
where
    T: PrimInt + Signed,
{
    /// Returns the number of aircraft in the model.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use landing_model::index::ClassIndex;
    /// # use landing_model::model::ModelBuilder;
    ///
    /// let mut builder = ModelBuilder::<i64>::new(1, 3, 1);
    /// builder.set_separation(ClassIndex::new(0), ClassIndex::new(0), 2);
    /// let model = builder.build().unwrap();
    /// assert_eq!(model.num_aircraft(), 3);
    /// ```
    #[inline]
    pub fn num_aircraft(&self) -> usize {
        self.earliest_times.len()
    }

    /// Returns the number of runways in the model.
    #[inline]
    pub fn num_runways(&self) -> usize {
        self.num_runways
    }

    /// Returns the number of separation classes in the model.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns an iterator over all aircraft indices in ascending order.
    #[inline]
    pub fn aircraft(&self) -> impl ExactSizeIterator<Item = AircraftIndex> + use<T> {
        (0..self.num_aircraft()).map(AircraftIndex::new)
    }

    /// Returns an iterator over all runway indices in ascending order.
    #[inline]
    pub fn runways(&self) -> impl ExactSizeIterator<Item = RunwayIndex> + use<T> {
        (0..self.num_runways).map(RunwayIndex::new)
    }

    /// Returns the identifier of the specified aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn aircraft_id(&self, aircraft_index: AircraftIndex) -> &str {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Model::aircraft_id` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        &self.aircraft_ids[index]
    }

    /// Returns the earliest landing time `E` of the specified aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use landing_model::index::{AircraftIndex, ClassIndex};
    /// # use landing_model::model::ModelBuilder;
    ///
    /// let mut builder = ModelBuilder::<i64>::new(1, 1, 1);
    /// builder
    ///     .set_landing_window(AircraftIndex::new(0), 10, 15, 40)
    ///     .set_separation(ClassIndex::new(0), ClassIndex::new(0), 0);
    /// let model = builder.build().unwrap();
    /// assert_eq!(model.earliest_landing_time(AircraftIndex::new(0)), 10);
    /// assert_eq!(model.target_landing_time(AircraftIndex::new(0)), 15);
    /// assert_eq!(model.latest_landing_time(AircraftIndex::new(0)), 40);
    /// ```
    #[inline]
    pub fn earliest_landing_time(&self, aircraft_index: AircraftIndex) -> T {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Model::earliest_landing_time` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.earliest_times[index]
    }

    /// Returns the target landing time `T` of the specified aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn target_landing_time(&self, aircraft_index: AircraftIndex) -> T {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Model::target_landing_time` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.target_times[index]
    }

    /// Returns the latest landing time `L` of the specified aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn latest_landing_time(&self, aircraft_index: AircraftIndex) -> T {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Model::latest_landing_time` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.latest_times[index]
    }

    /// Returns the cost per time unit of landing before the target.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn earliness_penalty(&self, aircraft_index: AircraftIndex) -> T {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Model::earliness_penalty` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.earliness_penalties[index]
    }

    /// Returns the cost per time unit of landing after the target.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn lateness_penalty(&self, aircraft_index: AircraftIndex) -> T {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Model::lateness_penalty` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.lateness_penalties[index]
    }

    /// Returns the larger of the two penalty rates of the specified aircraft.
    #[inline]
    pub fn max_penalty(&self, aircraft_index: AircraftIndex) -> T {
        self.earliness_penalty(aircraft_index)
            .max(self.lateness_penalty(aircraft_index))
    }

    /// Returns the separation class of the specified aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn aircraft_class(&self, aircraft_index: AircraftIndex) -> ClassIndex {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Model::aircraft_class` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.aircraft_classes[index]
    }

    /// Returns the minimum gap required when an aircraft of class `leading`
    /// lands before an aircraft of class `trailing` on the same runway.
    ///
    /// # Panics
    ///
    /// Panics if either class is not in `0..num_classes()`.
    #[inline]
    pub fn class_separation(&self, leading: ClassIndex, trailing: ClassIndex) -> T {
        debug_assert!(
            leading.get() < self.num_classes && trailing.get() < self.num_classes,
            "called `Model::class_separation` with class index out of bounds: the len is {} but the indices are {} and {}",
            self.num_classes,
            leading.get(),
            trailing.get()
        );

        self.class_separations[flatten_index(self.num_classes, leading, trailing)]
    }

    /// Returns `sep(leading, trailing)`: the minimum gap required when
    /// `leading` lands before `trailing` on the same runway.
    ///
    /// The lookup goes through the aircraft classes, so it is asymmetric
    /// whenever the class table is.
    ///
    /// # Panics
    ///
    /// Panics if either index is not in `0..num_aircraft()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use landing_model::index::{AircraftIndex, ClassIndex};
    /// # use landing_model::model::ModelBuilder;
    ///
    /// let (heavy, light) = (ClassIndex::new(0), ClassIndex::new(1));
    /// let mut builder = ModelBuilder::<i64>::new(1, 2, 2);
    /// builder
    ///     .set_aircraft_class(AircraftIndex::new(0), heavy)
    ///     .set_aircraft_class(AircraftIndex::new(1), light)
    ///     .set_separation(heavy, heavy, 96)
    ///     .set_separation(heavy, light, 180)
    ///     .set_separation(light, heavy, 72)
    ///     .set_separation(light, light, 82);
    /// let model = builder.build().unwrap();
    /// assert_eq!(model.separation(AircraftIndex::new(0), AircraftIndex::new(1)), 180);
    /// assert_eq!(model.separation(AircraftIndex::new(1), AircraftIndex::new(0)), 72);
    /// ```
    #[inline]
    pub fn separation(&self, leading: AircraftIndex, trailing: AircraftIndex) -> T {
        self.class_separation(self.aircraft_class(leading), self.aircraft_class(trailing))
    }

    /// Returns the largest entry of the separation table, or zero without classes.
    #[inline]
    pub fn max_separation(&self) -> T {
        self.max_separation
    }

    /// Returns `true` if at least one aircraft may not use every runway.
    #[inline]
    pub fn has_runway_restrictions(&self) -> bool {
        self.has_runway_restrictions
    }

    /// Returns `true` if the aircraft may land on the runway.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn is_runway_eligible(
        &self,
        aircraft_index: AircraftIndex,
        runway_index: RunwayIndex,
    ) -> bool {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `Model::is_runway_eligible` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.eligible_runways[index].contains(runway_index.get())
    }

    /// Returns the runways the aircraft may land on, in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn eligible_runways(
        &self,
        aircraft_index: AircraftIndex,
    ) -> impl Iterator<Item = RunwayIndex> + '_ {
        self.eligible_runways[aircraft_index.get()]
            .ones()
            .map(RunwayIndex::new)
    }

    /// Returns the number of runways the aircraft may land on.
    #[inline]
    pub fn num_eligible_runways(&self, aircraft_index: AircraftIndex) -> usize {
        self.eligible_runways[aircraft_index.get()].count_ones(..)
    }

    /// Returns `true` if the two aircraft have at least one eligible runway in common.
    #[inline]
    pub fn share_eligible_runway(&self, a: AircraftIndex, b: AircraftIndex) -> bool {
        !self.eligible_runways[a.get()].is_disjoint(&self.eligible_runways[b.get()])
    }

    /// Returns the deviation cost of landing the aircraft at `time`:
    /// `alpha * max(0, target - time) + beta * max(0, time - target)`.
    ///
    /// The result saturates at `T::max_value()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use landing_model::index::{AircraftIndex, ClassIndex};
    /// # use landing_model::model::ModelBuilder;
    ///
    /// let a = AircraftIndex::new(0);
    /// let mut builder = ModelBuilder::<i64>::new(1, 1, 1);
    /// builder
    ///     .set_landing_window(a, 0, 10, 30)
    ///     .set_penalties(a, 3, 5)
    ///     .set_separation(ClassIndex::new(0), ClassIndex::new(0), 0);
    /// let model = builder.build().unwrap();
    /// assert_eq!(model.landing_cost(a, 8), 6);
    /// assert_eq!(model.landing_cost(a, 10), 0);
    /// assert_eq!(model.landing_cost(a, 12), 10);
    /// ```
    #[inline]
    pub fn landing_cost(&self, aircraft_index: AircraftIndex, time: T) -> T {
        let target = self.target_landing_time(aircraft_index);
        if time < target {
            weighted_deviation(
                self.earliness_penalty(aircraft_index),
                target.saturating_sub(time),
            )
        } else {
            weighted_deviation(
                self.lateness_penalty(aircraft_index),
                time.saturating_sub(target),
            )
        }
    }

    /// Returns the smallest deviation cost over the closed interval `[lower, upper]`.
    ///
    /// The cost is convex in the landing time with its minimum at the target,
    /// so the minimum is zero when the target lies inside the interval and is
    /// attained at the interval end nearest to the target otherwise.
    #[inline]
    pub fn min_landing_cost(&self, aircraft_index: AircraftIndex, lower: T, upper: T) -> T {
        debug_assert!(
            lower <= upper,
            "called `Model::min_landing_cost` with an empty interval"
        );

        let target = self.target_landing_time(aircraft_index);
        if upper < target {
            self.landing_cost(aircraft_index, upper)
        } else if lower > target {
            self.landing_cost(aircraft_index, lower)
        } else {
            T::zero()
        }
    }

    /// Returns the earliest landing times of all aircraft.
    #[inline]
    pub fn earliest_landing_times(&self) -> &[T] {
        &self.earliest_times
    }

    /// Returns the target landing times of all aircraft.
    #[inline]
    pub fn target_landing_times(&self) -> &[T] {
        &self.target_times
    }

    /// Returns the latest landing times of all aircraft.
    #[inline]
    pub fn latest_landing_times(&self) -> &[T] {
        &self.latest_times
    }
}

impl<T> std::fmt::Debug for Model<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("aircraft_ids", &self.aircraft_ids)
            .field("earliest_times", &self.earliest_times)
            .field("target_times", &self.target_times)
            .field("latest_times", &self.latest_times)
            .field("earliness_penalties", &self.earliness_penalties)
            .field("lateness_penalties", &self.lateness_penalties)
            .field("aircraft_classes", &self.aircraft_classes)
            .field("class_separations", &self.class_separations)
            .field("num_runways", &self.num_runways)
            .finish()
    }
}

impl<T> std::fmt::Display for Model<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(num_aircraft: {}, num_runways: {}, num_classes: {})",
            self.num_aircraft(),
            self.num_runways,
            self.num_classes
        )
    }
}

/// A mutable builder for `Model`.
///
/// # Defaults
///
/// | Field | Default | Semantics |
/// | :--- | :--- | :--- |
/// | `id` | the aircraft index | Used for reporting only. |
/// | window | `[0, 0]`, target `0` | Every aircraft lands at time zero until a window is set. |
/// | penalties | `1` / `1` | Equal cost for earliness and lateness. |
/// | class | `0` | All aircraft share the first class. |
/// | separation | undefined | `build` fails until every class pair is set. |
/// | eligibility | all runways | No restriction. |
#[derive(Clone, Debug)]
pub struct ModelBuilder<T>
where
    T: PrimInt + Signed,
{
    num_runways: usize,
    num_classes: usize,
    aircraft_ids: Vec<String>,
    earliest_times: Vec<T>,
    target_times: Vec<T>,
    latest_times: Vec<T>,
    earliness_penalties: Vec<T>,
    lateness_penalties: Vec<T>,
    aircraft_classes: Vec<ClassIndex>,
    class_separations: Vec<Option<T>>,
    eligible_runways: Vec<Option<Vec<RunwayIndex>>>,
}

impl<T> ModelBuilder<T>
where
    T: PrimInt + Signed,
{
    /// Creates a new builder for `num_aircraft` aircraft over `num_runways`
    /// runways with `num_classes` separation classes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use landing_model::model::ModelBuilder;
    ///
    /// let builder = ModelBuilder::<i64>::new(2, 4, 1);
    /// assert_eq!(builder.num_runways(), 2);
    /// assert_eq!(builder.num_aircraft(), 4);
    /// ```
    pub fn new(num_runways: usize, num_aircraft: usize, num_classes: usize) -> Self {
        Self {
            num_runways,
            num_classes,
            aircraft_ids: (0..num_aircraft).map(|i| i.to_string()).collect(),
            earliest_times: vec![T::zero(); num_aircraft],
            target_times: vec![T::zero(); num_aircraft],
            latest_times: vec![T::zero(); num_aircraft],
            earliness_penalties: vec![T::one(); num_aircraft],
            lateness_penalties: vec![T::one(); num_aircraft],
            aircraft_classes: vec![ClassIndex::new(0); num_aircraft],
            class_separations: vec![None; num_classes * num_classes],
            eligible_runways: vec![None; num_aircraft],
        }
    }

    /// Returns the number of aircraft of the instance under construction.
    #[inline]
    pub fn num_aircraft(&self) -> usize {
        self.earliest_times.len()
    }

    /// Returns the number of runways of the instance under construction.
    #[inline]
    pub fn num_runways(&self) -> usize {
        self.num_runways
    }

    /// Returns the number of separation classes of the instance under construction.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Sets the identifier of the specified aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn set_aircraft_id<S>(&mut self, aircraft_index: AircraftIndex, id: S) -> &mut Self
    where
        S: Into<String>,
    {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `ModelBuilder::set_aircraft_id` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.aircraft_ids[index] = id.into();
        self
    }

    /// Sets the earliest, target and latest landing time of the specified aircraft.
    ///
    /// The order `earliest <= target <= latest` is checked by `build`.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn set_landing_window(
        &mut self,
        aircraft_index: AircraftIndex,
        earliest: T,
        target: T,
        latest: T,
    ) -> &mut Self {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `ModelBuilder::set_landing_window` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.earliest_times[index] = earliest;
        self.target_times[index] = target;
        self.latest_times[index] = latest;
        self
    }

    /// Sets the earliness and lateness penalty rates of the specified aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn set_penalties(
        &mut self,
        aircraft_index: AircraftIndex,
        earliness: T,
        lateness: T,
    ) -> &mut Self {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `ModelBuilder::set_penalties` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.earliness_penalties[index] = earliness;
        self.lateness_penalties[index] = lateness;
        self
    }

    /// Sets the separation class of the specified aircraft.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn set_aircraft_class(
        &mut self,
        aircraft_index: AircraftIndex,
        class_index: ClassIndex,
    ) -> &mut Self {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `ModelBuilder::set_aircraft_class` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.aircraft_classes[index] = class_index;
        self
    }

    /// Sets the minimum gap when class `leading` lands before class `trailing`.
    ///
    /// # Panics
    ///
    /// Panics if either class is not in `0..num_classes()`.
    #[inline]
    pub fn set_separation(
        &mut self,
        leading: ClassIndex,
        trailing: ClassIndex,
        gap: T,
    ) -> &mut Self {
        assert!(
            leading.get() < self.num_classes && trailing.get() < self.num_classes,
            "called `ModelBuilder::set_separation` with class index out of bounds: the len is {} but the indices are {} and {}",
            self.num_classes,
            leading.get(),
            trailing.get()
        );

        self.class_separations[flatten_index(self.num_classes, leading, trailing)] = Some(gap);
        self
    }

    /// Restricts the specified aircraft to the given runways.
    ///
    /// Runway indices are checked by `build`.
    ///
    /// # Panics
    ///
    /// Panics if `aircraft_index` is not in `0..num_aircraft()`.
    #[inline]
    pub fn set_eligible_runways<I>(
        &mut self,
        aircraft_index: AircraftIndex,
        runways: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = RunwayIndex>,
    {
        let index = aircraft_index.get();
        debug_assert!(
            index < self.num_aircraft(),
            "called `ModelBuilder::set_eligible_runways` with aircraft index out of bounds: the len is {} but the index is {}",
            self.num_aircraft(),
            index
        );

        self.eligible_runways[index] = Some(runways.into_iter().collect());
        self
    }

    /// Validates the instance and freezes it into a `Model`.
    ///
    /// # Errors
    ///
    /// Returns the first `InvalidInstance` found, checking runways, then
    /// aircraft in index order, then the separation table in row-major order.
    pub fn build(self) -> Result<Model<T>, InvalidInstance> {
        if self.num_runways == 0 {
            return Err(InvalidInstance::NoRunways);
        }

        let num_aircraft = self.num_aircraft();
        for index in 0..num_aircraft {
            let aircraft = AircraftIndex::new(index);
            let (earliest, target, latest) = (
                self.earliest_times[index],
                self.target_times[index],
                self.latest_times[index],
            );
            if earliest > target || target > latest {
                return Err(InvalidInstance::WindowOrder { aircraft });
            }
            if self.earliness_penalties[index] < T::zero()
                || self.lateness_penalties[index] < T::zero()
            {
                return Err(InvalidInstance::NegativePenalty { aircraft });
            }
            let class = self.aircraft_classes[index];
            if class.get() >= self.num_classes {
                return Err(InvalidInstance::ClassOutOfRange {
                    aircraft,
                    class,
                    num_classes: self.num_classes,
                });
            }
        }

        let mut class_separations = Vec::with_capacity(self.class_separations.len());
        let mut max_separation = T::zero();
        for (flat, entry) in self.class_separations.iter().enumerate() {
            let leading = ClassIndex::new(flat / self.num_classes);
            let trailing = ClassIndex::new(flat % self.num_classes);
            let gap = match entry {
                Some(gap) => *gap,
                None => return Err(InvalidInstance::UndefinedSeparation { leading, trailing }),
            };
            if gap < T::zero() {
                return Err(InvalidInstance::NegativeSeparation { leading, trailing });
            }
            max_separation = max_separation.max(gap);
            class_separations.push(gap);
        }

        let mut eligible_runways = Vec::with_capacity(num_aircraft);
        let mut has_runway_restrictions = false;
        for (index, restriction) in self.eligible_runways.into_iter().enumerate() {
            let aircraft = AircraftIndex::new(index);
            let mut set = FixedBitSet::with_capacity(self.num_runways);
            match restriction {
                None => set.insert_range(..),
                Some(runways) => {
                    for runway in runways {
                        if runway.get() >= self.num_runways {
                            return Err(InvalidInstance::RunwayOutOfRange {
                                aircraft,
                                runway,
                                num_runways: self.num_runways,
                            });
                        }
                        set.insert(runway.get());
                    }
                    if set.is_clear() {
                        return Err(InvalidInstance::EmptyEligibility { aircraft });
                    }
                    if set.count_ones(..) < self.num_runways {
                        has_runway_restrictions = true;
                    }
                }
            }
            eligible_runways.push(set);
        }

        Ok(Model {
            aircraft_ids: self.aircraft_ids,
            earliest_times: self.earliest_times,
            target_times: self.target_times,
            latest_times: self.latest_times,
            earliness_penalties: self.earliness_penalties,
            lateness_penalties: self.lateness_penalties,
            aircraft_classes: self.aircraft_classes,
            eligible_runways,
            class_separations,
            num_classes: self.num_classes,
            num_runways: self.num_runways,
            max_separation,
            has_runway_restrictions,
        })
    }
}
