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

//! # Landing CP
//!
//! Constraint-propagation branch-and-bound for aircraft landing scheduling.
//!
//! Core flow
//! - Provide a `landing_model::model::Model<T>`.
//! - Choose a `branching::strategy::SearchStrategy`.
//! - Pass a `monitor::tree_search_monitor::TreeSearchMonitor` to bound or
//!   observe the search; compose several with `CompositeTreeSearchMonitor`.
//! - Run `solver::CpSolver::solve` and inspect the `CpSolverOutcome`.
//!
//! The search mutates one `SearchState` in place and restores it through a
//! trail, so memory stays flat however deep the tree gets. Given the same
//! model, strategy and seed it explores the same nodes in the same order.
//!
//! Module map
//! - `solver`: the engine and its search session.
//! - `state`: interval domains, runway assignments and precedences.
//! - `bound`: the optimistic per-node lower bound.
//! - `completion`: landing times for fully sequenced nodes.
//! - `branching`: decisions and the strategy that ranks them.
//! - `monitor`: tree-search monitors (budgets, logging, composition).
//! - `result`: outcomes with termination reasons.
//! - `stats`: search counters and timing.

pub mod bound;
pub mod branching;
pub mod completion;
pub mod monitor;
mod propagate;
pub mod result;
pub mod solver;
mod stack;
pub mod state;
pub mod stats;
mod trail;
