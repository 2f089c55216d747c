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

use crate::{backend::BackendSolution, formulation::MipModel};
use landing_model::{
    index::{AircraftIndex, RunwayIndex},
    model::Model,
    schedule::Schedule,
};
use num_traits::{FromPrimitive, PrimInt, Signed};

/// Why backend values could not be turned into a schedule.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtractionError {
    /// The backend returned fewer values than the formulation has variables.
    MissingValues { expected: usize, found: usize },
    /// A landing time is not finite or does not fit the time type.
    UnrepresentableTime { aircraft: AircraftIndex, value: f64 },
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::MissingValues { expected, found } => write!(
                f,
                "Backend returned {} values for a formulation with {} variables",
                found, expected
            ),
            ExtractionError::UnrepresentableTime { aircraft, value } => write!(
                f,
                "Landing time {} of aircraft {} cannot be represented",
                value, aircraft
            ),
        }
    }
}

impl std::error::Error for ExtractionError {}

/// A schedule read from backend values, with the backend's objective value.
///
/// Landing times are rounded to the nearest integer. The schedule has not
/// been validated; callers pass it through `SolutionEvaluator`.
#[derive(Clone, Debug, PartialEq)]
pub struct MipSchedule<T> {
    schedule: Schedule<T>,
    backend_objective: f64,
}

impl<T> MipSchedule<T>
where
    T: PrimInt + Signed + FromPrimitive,
{
    /// Reads landing times and runways from `solution`.
    ///
    /// Each aircraft lands on the eligible runway whose assignment variable
    /// is largest, ties going to the lower index. Without runway variables
    /// every aircraft lands on runway `0`.
    ///
    /// # Errors
    ///
    /// Returns an `ExtractionError` if `solution` is too short or a landing
    /// time cannot be represented as `T`.
    pub fn extract(
        model: &Model<T>,
        mip: &MipModel,
        solution: &BackendSolution,
    ) -> Result<Self, ExtractionError> {
        if solution.values().len() < mip.num_variables() {
            return Err(ExtractionError::MissingValues {
                expected: mip.num_variables(),
                found: solution.values().len(),
            });
        }
        let values = solution.values();

        let num_aircraft = model.num_aircraft();
        let mut runways = Vec::with_capacity(num_aircraft);
        let mut landing_times = Vec::with_capacity(num_aircraft);

        for aircraft in model.aircraft() {
            let value = values[mip.landing_time_var(aircraft).get()];
            let time = match T::from_f64(value.round()) {
                Some(time) if value.is_finite() => time,
                _ => return Err(ExtractionError::UnrepresentableTime { aircraft, value }),
            };
            landing_times.push(time);
            runways.push(Self::pick_runway(model, mip, values, aircraft));
        }

        Ok(Self {
            schedule: Schedule::new(runways, landing_times),
            backend_objective: mip.objective_value(values),
        })
    }

    fn pick_runway(
        model: &Model<T>,
        mip: &MipModel,
        values: &[f64],
        aircraft: AircraftIndex,
    ) -> RunwayIndex {
        let mut best: Option<(RunwayIndex, f64)> = None;
        for runway in model.eligible_runways(aircraft) {
            let Some(z) = mip.runway_var(aircraft, runway) else {
                continue;
            };
            let value = values[z.get()];
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((runway, value));
            }
        }
        match best {
            Some((runway, _)) => runway,
            None => model
                .eligible_runways(aircraft)
                .next()
                .unwrap_or(RunwayIndex::new(0)),
        }
    }
}

impl<T> MipSchedule<T> {
    #[inline]
    pub fn schedule(&self) -> &Schedule<T> {
        &self.schedule
    }

    #[inline]
    pub fn into_schedule(self) -> Schedule<T> {
        self.schedule
    }

    /// The objective the backend attained, before rounding.
    #[inline]
    pub fn backend_objective(&self) -> f64 {
        self.backend_objective
    }
}
