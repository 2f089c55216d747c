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

//! # Landing MIP
//!
//! Mixed-integer formulation of aircraft landing scheduling.
//!
//! - `formulation`: `MipModel::build` creates landing time, deviation,
//!   order, runway and same-runway variables with per-pair big-M separation
//!   constraints. It is pure and deterministic.
//! - `backend`: the `MipBackend` trait and `GoodLpBackend`, which solves
//!   with `good_lp`'s `microlp` solver under a wall-clock limit.
//! - `extract`: turns backend values into a `Schedule` via `MipSchedule`.
//!
//! Extracted schedules are unvalidated; `landing-solver` checks them with
//! the `SolutionEvaluator` before reporting them.

pub mod backend;
pub mod extract;
pub mod formulation;
