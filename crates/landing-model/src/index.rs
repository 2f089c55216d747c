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

//! # Strongly Typed Indices
//!
//! Phantom-tagged wrappers around `usize` that keep the aircraft, runway and
//! separation-class index spaces apart. `TypedIndex<T>` is `#[repr(transparent)]`
//! and compiles down to a plain `usize`.
//!
//! ## Usage
//!
//! ```rust
//! use landing_model::index::{AircraftIndex, RunwayIndex};
//!
//! let aircraft = AircraftIndex::new(3);
//! let runway = RunwayIndex::new(1);
//! assert_eq!(aircraft.get(), 3);
//! assert_eq!(format!("{}", runway), "RunwayIndex(1)");
//! ```

/// A trait to tag typed indices with a name for debugging and display purposes.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A strongly typed index associated with the tag type `T`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new typed index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying `usize`.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline(always)]
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

/// A tag type for aircraft indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AircraftIndexTag;

impl TypedIndexTag for AircraftIndexTag {
    const NAME: &'static str = "AircraftIndex";
}

/// A typed index for aircraft.
pub type AircraftIndex = TypedIndex<AircraftIndexTag>;

/// A tag type for runway indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RunwayIndexTag;

impl TypedIndexTag for RunwayIndexTag {
    const NAME: &'static str = "RunwayIndex";
}

/// A typed index for runways.
pub type RunwayIndex = TypedIndex<RunwayIndexTag>;

/// A tag type for separation class indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClassIndexTag;

impl TypedIndexTag for ClassIndexTag {
    const NAME: &'static str = "ClassIndex";
}

/// A typed index for separation classes.
pub type ClassIndex = TypedIndex<ClassIndexTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_round_trip_through_usize() {
        let idx: AircraftIndex = 42.into();
        assert_eq!(idx.get(), 42);
        let raw: usize = idx.into();
        assert_eq!(raw, 42);
    }

    #[test]
    fn test_display_uses_tag_name() {
        assert_eq!(format!("{}", AircraftIndex::new(7)), "AircraftIndex(7)");
        assert_eq!(format!("{:?}", RunwayIndex::new(0)), "RunwayIndex(0)");
        assert_eq!(format!("{}", ClassIndex::new(2)), "ClassIndex(2)");
    }

    #[test]
    fn test_ordering_follows_raw_index() {
        let mut v = vec![RunwayIndex::new(2), RunwayIndex::new(0), RunwayIndex::new(1)];
        v.sort();
        assert_eq!(v, vec![RunwayIndex::new(0), RunwayIndex::new(1), RunwayIndex::new(2)]);
    }
}
