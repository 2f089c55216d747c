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

//! Raw instance records.
//!
//! `InstanceData` mirrors what an instance file contains, before any
//! validation: one record per aircraft, the class-pair separation table and
//! the runway count. It derives `serde` so callers can move instances around
//! in whatever format they like; turning it into a `Model` goes through
//! `Model::load`, which validates every field.

use crate::{
    error::InvalidInstance,
    index::{AircraftIndex, ClassIndex, RunwayIndex},
    model::{Model, ModelBuilder},
};
use num_traits::{PrimInt, Signed};
use serde::{Deserialize, Serialize};

/// One aircraft as it appears in an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftRecord<T> {
    pub id: String,
    pub earliest: T,
    pub target: T,
    pub latest: T,
    pub earliness_penalty: T,
    pub lateness_penalty: T,
    pub class: usize,
    /// Runways the aircraft may use; `None` means all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible_runways: Option<Vec<usize>>,
}

/// An unvalidated instance.
///
/// `separation[leading][trailing]` is the minimum gap when an aircraft of
/// class `leading` lands before one of class `trailing`; the table must be
/// square with one row per class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceData<T> {
    pub num_runways: usize,
    pub aircraft: Vec<AircraftRecord<T>>,
    pub separation: Vec<Vec<T>>,
}

impl<T> InstanceData<T> {
    /// Builds an instance from a per-aircraft separation matrix, where
    /// `separation[i][j]` is the gap when aircraft `i` lands before `j`.
    ///
    /// Each aircraft is placed in its own class, overwriting the `class`
    /// field of its record.
    pub fn from_pairwise_separation(
        num_runways: usize,
        mut aircraft: Vec<AircraftRecord<T>>,
        separation: Vec<Vec<T>>,
    ) -> Self {
        for (index, record) in aircraft.iter_mut().enumerate() {
            record.class = index;
        }
        Self {
            num_runways,
            aircraft,
            separation,
        }
    }

    /// Returns the number of separation classes, i.e. the row count of the table.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.separation.len()
    }
}

impl<T> Model<T>
where
    T: PrimInt + Signed,
{
    /// Validates raw instance data and builds a model from it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInstance::MalformedSeparationTable` if the separation
    /// table is not square, and otherwise whatever `ModelBuilder::build` reports.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use landing_model::instance::{AircraftRecord, InstanceData};
    /// # use landing_model::model::Model;
    ///
    /// let record = |id: &str, earliest, target, latest| AircraftRecord {
    ///     id: id.to_string(),
    ///     earliest,
    ///     target,
    ///     latest,
    ///     earliness_penalty: 1,
    ///     lateness_penalty: 1,
    ///     class: 0,
    ///     eligible_runways: None,
    /// };
    /// let data = InstanceData {
    ///     num_runways: 1,
    ///     aircraft: vec![record("KL101", 0, 10, 20), record("LH202", 0, 10, 20)],
    ///     separation: vec![vec![5i64]],
    /// };
    /// let model = Model::load(&data).unwrap();
    /// assert_eq!(model.num_aircraft(), 2);
    /// ```
    pub fn load(data: &InstanceData<T>) -> Result<Self, InvalidInstance> {
        let num_classes = data.num_classes();
        for (row, entries) in data.separation.iter().enumerate() {
            if entries.len() != num_classes {
                return Err(InvalidInstance::MalformedSeparationTable {
                    row: ClassIndex::new(row),
                    len: entries.len(),
                    expected: num_classes,
                });
            }
        }

        let mut builder = ModelBuilder::new(data.num_runways, data.aircraft.len(), num_classes);
        for (index, record) in data.aircraft.iter().enumerate() {
            let aircraft = AircraftIndex::new(index);
            builder
                .set_aircraft_id(aircraft, record.id.as_str())
                .set_landing_window(aircraft, record.earliest, record.target, record.latest)
                .set_penalties(aircraft, record.earliness_penalty, record.lateness_penalty)
                .set_aircraft_class(aircraft, ClassIndex::new(record.class));
            if let Some(runways) = &record.eligible_runways {
                builder
                    .set_eligible_runways(aircraft, runways.iter().copied().map(RunwayIndex::new));
            }
        }
        for (leading, entries) in data.separation.iter().enumerate() {
            for (trailing, gap) in entries.iter().enumerate() {
                builder.set_separation(ClassIndex::new(leading), ClassIndex::new(trailing), *gap);
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: &str,
        window: (i64, i64, i64),
        penalties: (i64, i64),
        class: usize,
    ) -> AircraftRecord<i64> {
        AircraftRecord {
            id: id.to_string(),
            earliest: window.0,
            target: window.1,
            latest: window.2,
            earliness_penalty: penalties.0,
            lateness_penalty: penalties.1,
            class,
            eligible_runways: None,
        }
    }

    fn two_class_instance() -> InstanceData<i64> {
        InstanceData {
            num_runways: 2,
            aircraft: vec![
                record("A1", (0, 10, 30), (1, 2), 0),
                record("A2", (5, 12, 40), (3, 1), 1),
            ],
            separation: vec![vec![3, 7], vec![2, 4]],
        }
    }

    #[test]
    fn test_load_maps_every_field() {
        let model = Model::load(&two_class_instance()).unwrap();
        let a1 = AircraftIndex::new(1);

        assert_eq!(model.num_aircraft(), 2);
        assert_eq!(model.num_runways(), 2);
        assert_eq!(model.num_classes(), 2);
        assert_eq!(model.aircraft_id(a1), "A2");
        assert_eq!(model.earliest_landing_time(a1), 5);
        assert_eq!(model.target_landing_time(a1), 12);
        assert_eq!(model.latest_landing_time(a1), 40);
        assert_eq!(model.earliness_penalty(a1), 3);
        assert_eq!(model.lateness_penalty(a1), 1);
        assert_eq!(model.separation(AircraftIndex::new(0), a1), 7);
        assert_eq!(model.separation(a1, AircraftIndex::new(0)), 2);
    }

    #[test]
    fn test_load_respects_eligibility() {
        let mut data = two_class_instance();
        data.aircraft[0].eligible_runways = Some(vec![1]);
        let model = Model::load(&data).unwrap();

        assert!(model.has_runway_restrictions());
        assert!(!model.is_runway_eligible(AircraftIndex::new(0), RunwayIndex::new(0)));
        assert!(model.is_runway_eligible(AircraftIndex::new(0), RunwayIndex::new(1)));
    }

    #[test]
    fn test_load_rejects_ragged_separation_table() {
        let mut data = two_class_instance();
        data.separation[1].pop();
        assert_eq!(
            Model::load(&data).unwrap_err(),
            InvalidInstance::MalformedSeparationTable {
                row: ClassIndex::new(1),
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_load_rejects_invalid_records() {
        let mut data = two_class_instance();
        data.aircraft[1].class = 2;
        assert!(matches!(
            Model::load(&data),
            Err(InvalidInstance::ClassOutOfRange { .. })
        ));

        let mut data = two_class_instance();
        data.num_runways = 0;
        assert_eq!(Model::load(&data).unwrap_err(), InvalidInstance::NoRunways);
    }

    #[test]
    fn test_from_pairwise_separation_assigns_one_class_per_aircraft() {
        let data = InstanceData::from_pairwise_separation(
            1,
            vec![
                record("A", (0, 5, 20), (1, 1), 7),
                record("B", (0, 6, 20), (1, 1), 7),
                record("C", (0, 7, 20), (1, 1), 7),
            ],
            vec![vec![0, 3, 4], vec![5, 0, 6], vec![7, 8, 0]],
        );
        assert_eq!(data.num_classes(), 3);

        let model = Model::load(&data).unwrap();
        let (a, b, c) = (AircraftIndex::new(0), AircraftIndex::new(1), AircraftIndex::new(2));
        assert_eq!(model.separation(a, b), 3);
        assert_eq!(model.separation(b, a), 5);
        assert_eq!(model.separation(c, b), 8);
    }

    #[test]
    fn test_json_round_trip_omits_missing_eligibility() {
        let json = r#"{
            "num_runways": 1,
            "aircraft": [
                { "id": "X", "earliest": 1, "target": 2, "latest": 3,
                  "earliness_penalty": 4, "lateness_penalty": 5, "class": 0 }
            ],
            "separation": [[6]]
        }"#;
        let data: InstanceData<i64> = serde_json::from_str(json).unwrap();
        assert_eq!(data.aircraft[0].eligible_runways, None);
        assert_eq!(data.aircraft[0].lateness_penalty, 5);

        let encoded = serde_json::to_string(&data).unwrap();
        assert!(!encoded.contains("eligible_runways"));
        let decoded: InstanceData<i64> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, data);
    }
}
