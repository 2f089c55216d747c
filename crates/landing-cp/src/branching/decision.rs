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

use landing_model::index::{AircraftIndex, RunwayIndex};

/// A single branching choice.
///
/// A search node branches on exactly one decision kind; its children are
/// the alternative values of that decision, tried in the order the
/// `SearchStrategy` ranks them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Decision<T> {
    /// Land `aircraft` on `runway`.
    AssignRunway {
        aircraft: AircraftIndex,
        runway: RunwayIndex,
    },
    /// Land `leading` before `trailing` on their shared runway.
    Sequence {
        leading: AircraftIndex,
        trailing: AircraftIndex,
    },
    /// Restrict the landing time of `aircraft` to `[lower, upper]`.
    Restrict {
        aircraft: AircraftIndex,
        lower: T,
        upper: T,
    },
}

impl<T> Decision<T> {
    #[inline]
    pub fn assign_runway(aircraft: AircraftIndex, runway: RunwayIndex) -> Self {
        Decision::AssignRunway { aircraft, runway }
    }

    #[inline]
    pub fn sequence(leading: AircraftIndex, trailing: AircraftIndex) -> Self {
        Decision::Sequence { leading, trailing }
    }

    #[inline]
    pub fn restrict(aircraft: AircraftIndex, lower: T, upper: T) -> Self {
        Decision::Restrict {
            aircraft,
            lower,
            upper,
        }
    }

    /// Returns the aircraft the decision is about; for sequences, the leading one.
    #[inline]
    pub fn aircraft(&self) -> AircraftIndex {
        match self {
            Decision::AssignRunway { aircraft, .. } => *aircraft,
            Decision::Sequence { leading, .. } => *leading,
            Decision::Restrict { aircraft, .. } => *aircraft,
        }
    }
}

impl<T> std::fmt::Display for Decision<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::AssignRunway { aircraft, runway } => write!(
                f,
                "Decision(aircraft {} on runway {})",
                aircraft.get(),
                runway.get()
            ),
            Decision::Sequence { leading, trailing } => write!(
                f,
                "Decision(aircraft {} before aircraft {})",
                leading.get(),
                trailing.get()
            ),
            Decision::Restrict {
                aircraft,
                lower,
                upper,
            } => write!(
                f,
                "Decision(aircraft {} in [{}, {}])",
                aircraft.get(),
                lower,
                upper
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_and_aircraft() {
        let a = AircraftIndex::new(2);
        let b = AircraftIndex::new(5);

        let d: Decision<i64> = Decision::assign_runway(a, RunwayIndex::new(1));
        assert_eq!(d.aircraft(), a);
        let d: Decision<i64> = Decision::sequence(b, a);
        assert_eq!(d.aircraft(), b);
        let d = Decision::restrict(a, 3i64, 9);
        assert_eq!(
            d,
            Decision::Restrict {
                aircraft: a,
                lower: 3,
                upper: 9
            }
        );
    }

    #[test]
    fn test_display() {
        let a = AircraftIndex::new(0);
        let b = AircraftIndex::new(1);
        assert_eq!(
            format!("{}", Decision::<i64>::assign_runway(a, RunwayIndex::new(2))),
            "Decision(aircraft 0 on runway 2)"
        );
        assert_eq!(
            format!("{}", Decision::<i64>::sequence(b, a)),
            "Decision(aircraft 1 before aircraft 0)"
        );
        assert_eq!(
            format!("{}", Decision::restrict(a, 10i64, 10)),
            "Decision(aircraft 0 in [10, 10])"
        );
    }
}
