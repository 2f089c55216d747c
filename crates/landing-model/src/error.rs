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

//! Errors raised while turning raw instance data into a `Model`.
//!
//! Every variant points at the offending aircraft, class or runway so that a
//! malformed instance can be fixed without re-running a search. Validation is
//! fail-fast: the first problem found is reported.

use crate::index::{AircraftIndex, ClassIndex, RunwayIndex};

/// The error type for rejected problem instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInstance {
    /// The instance declares no runways.
    NoRunways,
    /// An aircraft violates `earliest <= target <= latest`.
    WindowOrder { aircraft: AircraftIndex },
    /// An aircraft has a negative earliness or lateness penalty rate.
    NegativePenalty { aircraft: AircraftIndex },
    /// An aircraft refers to a separation class that does not exist.
    ClassOutOfRange {
        aircraft: AircraftIndex,
        class: ClassIndex,
        num_classes: usize,
    },
    /// A row of the separation table does not have one entry per class.
    MalformedSeparationTable {
        row: ClassIndex,
        len: usize,
        expected: usize,
    },
    /// No separation was defined for an ordered pair of classes.
    UndefinedSeparation {
        leading: ClassIndex,
        trailing: ClassIndex,
    },
    /// A separation entry is negative.
    NegativeSeparation {
        leading: ClassIndex,
        trailing: ClassIndex,
    },
    /// An aircraft is allowed on no runway at all.
    EmptyEligibility { aircraft: AircraftIndex },
    /// An aircraft lists a runway that does not exist.
    RunwayOutOfRange {
        aircraft: AircraftIndex,
        runway: RunwayIndex,
        num_runways: usize,
    },
}

impl std::fmt::Display for InvalidInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRunways => write!(f, "Instance must declare at least one runway"),
            Self::WindowOrder { aircraft } => write!(
                f,
                "Aircraft {} violates earliest <= target <= latest",
                aircraft.get()
            ),
            Self::NegativePenalty { aircraft } => write!(
                f,
                "Aircraft {} has a negative penalty rate",
                aircraft.get()
            ),
            Self::ClassOutOfRange {
                aircraft,
                class,
                num_classes,
            } => write!(
                f,
                "Aircraft {} uses separation class {} but only {} classes exist",
                aircraft.get(),
                class.get(),
                num_classes
            ),
            Self::MalformedSeparationTable { row, len, expected } => write!(
                f,
                "Separation table row {} has {} entries, expected {}",
                row.get(),
                len,
                expected
            ),
            Self::UndefinedSeparation { leading, trailing } => write!(
                f,
                "No separation defined for class {} followed by class {}",
                leading.get(),
                trailing.get()
            ),
            Self::NegativeSeparation { leading, trailing } => write!(
                f,
                "Negative separation for class {} followed by class {}",
                leading.get(),
                trailing.get()
            ),
            Self::EmptyEligibility { aircraft } => write!(
                f,
                "Aircraft {} is not eligible for any runway",
                aircraft.get()
            ),
            Self::RunwayOutOfRange {
                aircraft,
                runway,
                num_runways,
            } => write!(
                f,
                "Aircraft {} lists runway {} but only {} runways exist",
                aircraft.get(),
                runway.get(),
                num_runways
            ),
        }
    }
}

impl std::error::Error for InvalidInstance {}
