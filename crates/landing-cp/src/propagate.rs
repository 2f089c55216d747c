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

//! Bounds propagation over co-runway pairs.
//!
//! For every pair of aircraft on the same runway the propagator enforces
//! the decided order, `lower[j] >= lower[i] + sep(i, j)` and
//! `upper[i] <= upper[j] - sep(i, j)` for `i` before `j`, and detects
//! precedences on undecided pairs: if `i` cannot land before `j` without
//! emptying a domain, `j` before `i` is imposed. Sweeps repeat until
//! nothing changes.
//!
//! Without new precedences, bound changes along an acyclic precedence graph
//! settle within `num_aircraft` sweeps, so changes that persist beyond that
//! reveal a positive-length precedence cycle and the node fails.

use crate::{state::SearchState, trail::SearchTrail};
use landing_model::{index::AircraftIndex, model::Model};
use num_traits::{PrimInt, Signed};

/// Why propagation failed at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationFailure {
    /// The domain of the aircraft became empty.
    EmptyDomain(AircraftIndex),
    /// Neither order of the two aircraft is possible on their shared runway.
    NoFeasibleOrder(AircraftIndex, AircraftIndex),
    /// The decided precedences contain a cycle of positive length.
    PrecedenceCycle,
}

impl std::fmt::Display for PropagationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropagationFailure::EmptyDomain(a) => {
                write!(f, "Domain of aircraft {} is empty", a.get())
            }
            PropagationFailure::NoFeasibleOrder(a, b) => write!(
                f,
                "Aircraft {} and {} cannot share their runway in either order",
                a.get(),
                b.get()
            ),
            PropagationFailure::PrecedenceCycle => write!(f, "Precedences form a cycle"),
        }
    }
}

/// Returns `true` if `leading` can still land before `trailing` given the current domains.
#[inline]
pub fn can_precede<T>(
    model: &Model<T>,
    state: &SearchState<T>,
    leading: AircraftIndex,
    trailing: AircraftIndex,
) -> bool
where
    T: PrimInt + Signed,
{
    state
        .lower_bound(leading)
        .saturating_add(model.separation(leading, trailing))
        <= state.upper_bound(trailing)
}

/// Enforces `leading` before `trailing` on the two domains.
///
/// Returns `Ok(true)` if a bound changed.
#[inline]
fn enforce_precedence<T>(
    model: &Model<T>,
    state: &mut SearchState<T>,
    trail: &mut SearchTrail<T>,
    leading: AircraftIndex,
    trailing: AircraftIndex,
) -> Result<bool, PropagationFailure>
where
    T: PrimInt + Signed,
{
    let separation = model.separation(leading, trailing);
    let mut changed = false;

    let earliest_trailing = state.lower_bound(leading).saturating_add(separation);
    if trail.tighten_lower(state, trailing, earliest_trailing) {
        changed = true;
        if state.lower_bound(trailing) > state.upper_bound(trailing) {
            return Err(PropagationFailure::EmptyDomain(trailing));
        }
    }

    let latest_leading = state.upper_bound(trailing).saturating_sub(separation);
    if trail.tighten_upper(state, leading, latest_leading) {
        changed = true;
        if state.lower_bound(leading) > state.upper_bound(leading) {
            return Err(PropagationFailure::EmptyDomain(leading));
        }
    }

    Ok(changed)
}

/// Propagates all co-runway pairs of `state` to a fixpoint.
///
/// Every change goes through `trail`, so a failed propagation is undone by
/// backtracking the current frame.
///
/// # Errors
///
/// Returns the first `PropagationFailure` met; the state is then left partially
/// propagated.
pub fn propagate<T>(
    model: &Model<T>,
    state: &mut SearchState<T>,
    trail: &mut SearchTrail<T>,
) -> Result<(), PropagationFailure>
where
    T: PrimInt + Signed,
{
    let num_aircraft = state.num_aircraft();
    for index in 0..num_aircraft {
        let aircraft = AircraftIndex::new(index);
        if state.lower_bound(aircraft) > state.upper_bound(aircraft) {
            return Err(PropagationFailure::EmptyDomain(aircraft));
        }
    }

    let mut sweeps_without_new_precedence = 0usize;
    loop {
        let mut changed = false;
        let mut new_precedence = false;

        for i in 0..num_aircraft {
            let a = AircraftIndex::new(i);
            if !state.is_assigned(a) {
                continue;
            }
            for j in (i + 1)..num_aircraft {
                let b = AircraftIndex::new(j);
                if !state.share_runway(a, b) {
                    continue;
                }

                let (leading, trailing) = if state.precedes(a, b) {
                    (a, b)
                } else if state.precedes(b, a) {
                    (b, a)
                } else {
                    match (can_precede(model, state, a, b), can_precede(model, state, b, a)) {
                        (true, true) => continue,
                        (false, false) => return Err(PropagationFailure::NoFeasibleOrder(a, b)),
                        (true, false) => {
                            trail.impose_precedence(state, a, b);
                            new_precedence = true;
                            (a, b)
                        }
                        (false, true) => {
                            trail.impose_precedence(state, b, a);
                            new_precedence = true;
                            (b, a)
                        }
                    }
                };

                if enforce_precedence(model, state, trail, leading, trailing)? {
                    changed = true;
                }
            }
        }

        if !changed && !new_precedence {
            return Ok(());
        }

        if new_precedence {
            sweeps_without_new_precedence = 0;
        } else {
            sweeps_without_new_precedence += 1;
            if sweeps_without_new_precedence > num_aircraft {
                return Err(PropagationFailure::PrecedenceCycle);
            }
        }
    }
}
