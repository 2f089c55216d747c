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

//! # Landing Solver
//!
//! Entry points for solving a landing instance.
//!
//! ## Modules
//!
//! - `solve`: `solve_cp` and `solve_cp_with_monitor` run the constraint
//!   search under a `SearchBudget`; `solve_mip` and `solve_mip_with_backend`
//!   build the MIP formulation, run a backend and validate its schedule.
//! - `error`: `SolverBackendFailure`, the only error a solve can return.
//!
//! Infeasibility and exhausted budgets are statuses of the `SolveResult`,
//! never errors. Solve-level events go through the `log` facade; no logger
//! is installed here.

pub mod error;
pub mod solve;
