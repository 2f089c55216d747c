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

use crate::state::SearchState;
use landing_model::index::{AircraftIndex, RunwayIndex};
use num_traits::{PrimInt, Signed};

/// A compact record of a single mutation applied to the search state.
///
/// Each variant carries exactly what is needed to undo it: the previous
/// bound for domain changes, and only the identity for runway assignments and
/// precedences, whose previous value is implied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TrailEntry<T> {
    Lower { aircraft: AircraftIndex, old: T },
    Upper { aircraft: AircraftIndex, old: T },
    Runway { aircraft: AircraftIndex },
    Precedence {
        leading: AircraftIndex,
        trailing: AircraftIndex,
    },
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrailEntry::Lower { aircraft, old } => {
                write!(f, "TrailEntry(lower: aircraft {}, old: {})", aircraft.get(), old)
            }
            TrailEntry::Upper { aircraft, old } => {
                write!(f, "TrailEntry(upper: aircraft {}, old: {})", aircraft.get(), old)
            }
            TrailEntry::Runway { aircraft } => {
                write!(f, "TrailEntry(runway: aircraft {})", aircraft.get())
            }
            TrailEntry::Precedence { leading, trailing } => write!(
                f,
                "TrailEntry(precedence: {} -> {})",
                leading.get(),
                trailing.get()
            ),
        }
    }
}

/// A linear undo log with frame markers for efficient backtracking.
///
/// `SearchTrail` records all mutations applied to `SearchState` along with frame boundaries,
/// enabling O(k) rollback of k mutations when backtracking a frame. Typical usage:
/// 1. Call `push_frame()` before applying a decision,
/// 2. Mutate the state only through the trail (`tighten_lower`, `assign_runway`, ...),
/// 3. On failure or completion, call `backtrack(state)` to restore the state to
///    the start of the frame.
#[derive(Debug, Clone)]
pub struct SearchTrail<T> {
    /// The linear history of all changes made to the state.
    entries: Vec<TrailEntry<T>>,
    /// `frames[i]` stores the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> Default for SearchTrail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTrail<T> {
    /// Creates a new, empty `SearchTrail`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a new `SearchTrail` preallocating space based on the number of aircraft.
    ///
    /// Every aircraft contributes at least a runway entry and a few bound
    /// changes along a root-to-leaf path, so `4 * num_aircraft` entries and
    /// `num_aircraft + 1` frames are reserved.
    #[inline]
    pub fn preallocated(num_aircraft: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_aircraft.saturating_mul(4)),
            frames: Vec::with_capacity(num_aircraft.saturating_add(1)),
        }
    }

    /// Ensures the trail has capacity for the given problem size.
    pub fn ensure_capacity(&mut self, num_aircraft: usize) {
        let entry_capacity = num_aircraft.saturating_mul(4);
        let frame_capacity = num_aircraft.saturating_add(1);
        if self.entries.capacity() < entry_capacity {
            self.entries.reserve(entry_capacity - self.entries.len());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.len());
        }
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Returns the current depth of the search trail (alias for num_frames).
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if there are no frames tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pushes a new frame onto the stack.
    /// This marks the start of a new decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Resets the trail markers without undoing any state changes.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        let entries_size = self.entries.capacity() * std::mem::size_of::<TrailEntry<T>>();
        let frames_size = self.frames.capacity() * std::mem::size_of::<usize>();
        entries_size + frames_size
    }

    /// Returns an iterator over all trail entries.
    #[inline]
    pub fn iter_entries(&self) -> std::slice::Iter<'_, TrailEntry<T>> {
        self.entries.iter()
    }
}

impl<T> SearchTrail<T>
where
    T: PrimInt + Signed,
{
    /// Raises the lower bound of the aircraft to `value` if that tightens it.
    ///
    /// Returns `true` if the state changed.
    #[inline]
    pub fn tighten_lower(
        &mut self,
        state: &mut SearchState<T>,
        aircraft: AircraftIndex,
        value: T,
    ) -> bool {
        let old = state.lower_bound(aircraft);
        if value <= old {
            return false;
        }
        self.entries.push(TrailEntry::Lower { aircraft, old });
        state.set_lower_bound(aircraft, value);
        true
    }

    /// Lowers the upper bound of the aircraft to `value` if that tightens it.
    ///
    /// Returns `true` if the state changed.
    #[inline]
    pub fn tighten_upper(
        &mut self,
        state: &mut SearchState<T>,
        aircraft: AircraftIndex,
        value: T,
    ) -> bool {
        let old = state.upper_bound(aircraft);
        if value >= old {
            return false;
        }
        self.entries.push(TrailEntry::Upper { aircraft, old });
        state.set_upper_bound(aircraft, value);
        true
    }

    /// Assigns the aircraft to the runway.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the aircraft is already assigned.
    #[inline]
    pub fn assign_runway(
        &mut self,
        state: &mut SearchState<T>,
        aircraft: AircraftIndex,
        runway: RunwayIndex,
    ) {
        debug_assert!(
            runway.get() < state.num_runways(),
            "called `SearchTrail::assign_runway` with runway index out of bounds: the len is {} but the index is {}",
            state.num_runways(),
            runway.get()
        );

        self.entries.push(TrailEntry::Runway { aircraft });
        state.assign_runway(aircraft, runway);
    }

    /// Records that `leading` lands before `trailing`.
    ///
    /// Returns `true` if the precedence was new.
    #[inline]
    pub fn impose_precedence(
        &mut self,
        state: &mut SearchState<T>,
        leading: AircraftIndex,
        trailing: AircraftIndex,
    ) -> bool {
        if state.precedes(leading, trailing) {
            return false;
        }
        self.entries.push(TrailEntry::Precedence { leading, trailing });
        state.set_precedence(leading, trailing, true);
        true
    }

    /// Backtracks to the previous frame, undoing all mutations made since then.
    ///
    /// Effectively pops the current frame.
    pub fn backtrack(&mut self, state: &mut SearchState<T>) {
        let start = match self.frames.pop() {
            Some(start) => start,
            None => return,
        };

        while self.entries.len() > start {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            Self::undo_entry(state, entry);
        }
    }

    /// Undoes every recorded mutation across all frames and clears the trail.
    pub fn clear(&mut self, state: &mut SearchState<T>) {
        while let Some(entry) = self.entries.pop() {
            Self::undo_entry(state, entry);
        }
        self.frames.clear();
    }

    #[inline]
    fn undo_entry(state: &mut SearchState<T>, entry: TrailEntry<T>) {
        match entry {
            TrailEntry::Lower { aircraft, old } => state.set_lower_bound(aircraft, old),
            TrailEntry::Upper { aircraft, old } => state.set_upper_bound(aircraft, old),
            TrailEntry::Runway { aircraft } => state.unassign_runway(aircraft),
            TrailEntry::Precedence { leading, trailing } => {
                state.set_precedence(leading, trailing, false)
            }
        }
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}
