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

//! # Landing Model
//!
//! **The Core Domain Model for the Aircraft Landing Scheduling engines.**
//!
//! This crate defines the data structures shared by the constraint search
//! (`landing_cp`) and the mixed-integer formulation (`landing_mip`):
//!
//! * **`index`**: Strongly-typed wrappers (`AircraftIndex`, `RunwayIndex`, `ClassIndex`).
//! * **`instance`**: The raw, serializable instance record and `Model::load`.
//! * **`model`**: The immutable `Model` and its validating `ModelBuilder`.
//! * **`schedule`**: The engine output, one runway and landing time per aircraft.
//! * **`evaluate`**: The `SolutionEvaluator`, which re-checks any candidate from scratch.
//! * **`error`**: `InvalidInstance`, raised eagerly at construction.
//!
//! Data is stored as a Structure of Arrays, and every instance is validated
//! before an engine sees it.

pub mod error;
pub mod evaluate;
pub mod index;
pub mod instance;
pub mod model;
pub mod schedule;
