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

//! Independent feasibility and objective checks for candidate schedules.
//!
//! The evaluator never trusts the engine that produced a candidate: it
//! re-checks every window and every co-runway pair from scratch and sums the
//! deviation costs itself. Both search engines route their final schedules
//! through it.

use crate::{
    index::{AircraftIndex, RunwayIndex},
    model::Model,
    schedule::{LandingAssignment, Schedule},
};
use num_traits::{PrimInt, Signed};

/// A single reason why a candidate schedule is infeasible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation<T> {
    /// The aircraft has no landing in the candidate.
    MissingAircraft { aircraft: AircraftIndex },
    /// The aircraft lands more than once; only its first landing is evaluated.
    DuplicateAircraft { aircraft: AircraftIndex },
    /// The candidate refers to an aircraft the model does not know.
    UnknownAircraft { aircraft: AircraftIndex },
    UnknownRunway {
        aircraft: AircraftIndex,
        runway: RunwayIndex,
    },
    IneligibleRunway {
        aircraft: AircraftIndex,
        runway: RunwayIndex,
    },
    BeforeEarliest {
        aircraft: AircraftIndex,
        time: T,
        earliest: T,
    },
    AfterLatest {
        aircraft: AircraftIndex,
        time: T,
        latest: T,
    },
    /// `trailing` lands `gap` after `leading` on `runway`, but at least
    /// `required` is needed.
    Separation {
        leading: AircraftIndex,
        trailing: AircraftIndex,
        runway: RunwayIndex,
        gap: T,
        required: T,
    },
}

impl<T> std::fmt::Display for Violation<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::MissingAircraft { aircraft } => {
                write!(f, "Aircraft {} is not scheduled", aircraft.get())
            }
            Violation::DuplicateAircraft { aircraft } => {
                write!(f, "Aircraft {} is scheduled more than once", aircraft.get())
            }
            Violation::UnknownAircraft { aircraft } => {
                write!(f, "Aircraft {} does not exist in the model", aircraft.get())
            }
            Violation::UnknownRunway { aircraft, runway } => write!(
                f,
                "Aircraft {} is assigned to runway {} which does not exist",
                aircraft.get(),
                runway.get()
            ),
            Violation::IneligibleRunway { aircraft, runway } => write!(
                f,
                "Aircraft {} may not land on runway {}",
                aircraft.get(),
                runway.get()
            ),
            Violation::BeforeEarliest {
                aircraft,
                time,
                earliest,
            } => write!(
                f,
                "Aircraft {} lands at {} before its earliest time {}",
                aircraft.get(),
                time,
                earliest
            ),
            Violation::AfterLatest {
                aircraft,
                time,
                latest,
            } => write!(
                f,
                "Aircraft {} lands at {} after its latest time {}",
                aircraft.get(),
                time,
                latest
            ),
            Violation::Separation {
                leading,
                trailing,
                runway,
                gap,
                required,
            } => write!(
                f,
                "Aircraft {} follows aircraft {} on runway {} after {} but needs {}",
                trailing.get(),
                leading.get(),
                runway.get(),
                gap,
                required
            ),
        }
    }
}

/// The verdict of the `SolutionEvaluator` on one candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation<T> {
    objective: T,
    violations: Vec<Violation<T>>,
}

impl<T> Evaluation<T>
where
    T: Copy,
{
    /// Returns `true` if the candidate has no violations.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the total deviation cost over all scheduled aircraft.
    ///
    /// The value is computed for infeasible candidates too; it then only
    /// covers the aircraft that could be evaluated.
    #[inline]
    pub fn objective(&self) -> T {
        self.objective
    }

    #[inline]
    pub fn violations(&self) -> &[Violation<T>] {
        &self.violations
    }

    /// Consumes the evaluation and returns the violations.
    #[inline]
    pub fn into_violations(self) -> Vec<Violation<T>> {
        self.violations
    }
}

impl<T> std::fmt::Display for Evaluation<T>
where
    T: Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Evaluation Summary")?;
        writeln!(
            f,
            "   Feasible:        {}",
            if self.is_feasible() { "yes" } else { "no" }
        )?;
        writeln!(f, "   Objective Value: {}", self.objective)?;
        writeln!(f, "   Violations:      {}", self.violations.len())?;
        for violation in &self.violations {
            writeln!(f, "     - {}", violation)?;
        }
        Ok(())
    }
}

/// Checks candidate schedules against a `Model`.
///
/// The evaluator is side-effect-free: evaluating the same candidate twice
/// yields equal `Evaluation`s.
#[derive(Clone, Copy, Debug)]
pub struct SolutionEvaluator<'a, T>
where
    T: PrimInt + Signed,
{
    model: &'a Model<T>,
}

impl<'a, T> SolutionEvaluator<'a, T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new(model: &'a Model<T>) -> Self {
        Self { model }
    }

    #[inline]
    pub fn model(&self) -> &'a Model<T> {
        self.model
    }

    /// Evaluates a `Schedule`.
    ///
    /// A schedule shorter or longer than the model reports missing or unknown aircraft.
    pub fn evaluate(&self, schedule: &Schedule<T>) -> Evaluation<T> {
        let assignments: Vec<LandingAssignment<T>> = schedule.assignments().collect();
        self.evaluate_assignments(&assignments)
    }

    /// Evaluates a raw list of landings in any order.
    pub fn evaluate_assignments(&self, assignments: &[LandingAssignment<T>]) -> Evaluation<T> {
        let model = self.model;
        let num_aircraft = model.num_aircraft();
        let num_runways = model.num_runways();

        let mut violations = Vec::new();
        let mut objective = T::zero();
        let mut landing: Vec<Option<LandingAssignment<T>>> = vec![None; num_aircraft];

        for assignment in assignments {
            let aircraft = assignment.aircraft;
            if aircraft.get() >= num_aircraft {
                violations.push(Violation::UnknownAircraft { aircraft });
                continue;
            }
            if landing[aircraft.get()].is_some() {
                violations.push(Violation::DuplicateAircraft { aircraft });
                continue;
            }
            landing[aircraft.get()] = Some(*assignment);
        }

        // Per-runway landings of the aircraft that could be placed.
        let mut per_runway: Vec<Vec<(T, AircraftIndex)>> = vec![Vec::new(); num_runways];

        for (index, entry) in landing.iter().enumerate() {
            let aircraft = AircraftIndex::new(index);
            let Some(assignment) = entry else {
                violations.push(Violation::MissingAircraft { aircraft });
                continue;
            };
            let (runway, time) = (assignment.runway, assignment.time);

            if runway.get() >= num_runways {
                violations.push(Violation::UnknownRunway { aircraft, runway });
            } else {
                if !model.is_runway_eligible(aircraft, runway) {
                    violations.push(Violation::IneligibleRunway { aircraft, runway });
                }
                per_runway[runway.get()].push((time, aircraft));
            }

            let earliest = model.earliest_landing_time(aircraft);
            let latest = model.latest_landing_time(aircraft);
            if time < earliest {
                violations.push(Violation::BeforeEarliest {
                    aircraft,
                    time,
                    earliest,
                });
            }
            if time > latest {
                violations.push(Violation::AfterLatest {
                    aircraft,
                    time,
                    latest,
                });
            }

            objective = objective.saturating_add(model.landing_cost(aircraft, time));
        }

        for (runway_index, sequence) in per_runway.iter_mut().enumerate() {
            sequence.sort_unstable_by_key(|&(time, aircraft)| (time, aircraft.get()));
            let runway = RunwayIndex::new(runway_index);

            // Separations need not satisfy the triangle inequality, so every
            // pair is checked rather than only neighbours.
            for (p, &(leading_time, leading)) in sequence.iter().enumerate() {
                for &(trailing_time, trailing) in &sequence[p + 1..] {
                    let gap = trailing_time.saturating_sub(leading_time);
                    let required = model.separation(leading, trailing);
                    if gap >= required {
                        continue;
                    }
                    // Equal times: the reverse order may still be separated.
                    if gap == T::zero() && model.separation(trailing, leading) <= T::zero() {
                        continue;
                    }
                    violations.push(Violation::Separation {
                        leading,
                        trailing,
                        runway,
                        gap,
                        required,
                    });
                }
            }
        }

        Evaluation {
            objective,
            violations,
        }
    }
}
