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

use landing_mip::{backend::BackendError, extract::ExtractionError};
use landing_model::evaluate::Violation;

/// A MIP backend failed, or produced a result that did not survive validation.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverBackendFailure<T> {
    /// The backend itself reported an error other than infeasibility or a timeout.
    Backend(BackendError),
    /// Backend values could not be read as a schedule.
    Extraction(ExtractionError),
    /// The extracted schedule violates the instance.
    InvalidSchedule(Vec<Violation<T>>),
    /// The backend objective differs from the evaluator's objective.
    ObjectiveMismatch { backend: f64, evaluated: T },
}

impl<T> std::fmt::Display for SolverBackendFailure<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverBackendFailure::Backend(error) => write!(f, "{}", error),
            SolverBackendFailure::Extraction(error) => write!(f, "{}", error),
            SolverBackendFailure::InvalidSchedule(violations) => {
                write!(f, "Backend schedule is infeasible with {} violation(s)", violations.len())?;
                if let Some(first) = violations.first() {
                    write!(f, ", first: {}", first)?;
                }
                Ok(())
            }
            SolverBackendFailure::ObjectiveMismatch { backend, evaluated } => write!(
                f,
                "Backend objective {} disagrees with evaluated objective {}",
                backend, evaluated
            ),
        }
    }
}

impl<T> std::error::Error for SolverBackendFailure<T>
where
    T: std::fmt::Debug + std::fmt::Display,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverBackendFailure::Backend(error) => Some(error),
            SolverBackendFailure::Extraction(error) => Some(error),
            _ => None,
        }
    }
}

impl<T> From<BackendError> for SolverBackendFailure<T> {
    fn from(error: BackendError) -> Self {
        SolverBackendFailure::Backend(error)
    }
}

impl<T> From<ExtractionError> for SolverBackendFailure<T> {
    fn from(error: ExtractionError) -> Self {
        SolverBackendFailure::Extraction(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landing_model::index::AircraftIndex;
    use std::error::Error;

    #[test]
    fn test_display_of_each_variant() {
        let failure: SolverBackendFailure<i64> =
            BackendError::NumericalFailure("cycling".to_string()).into();
        assert_eq!(format!("{}", failure), "The backend failed: cycling");
        assert!(failure.source().is_some());

        let failure = SolverBackendFailure::<i64>::ObjectiveMismatch {
            backend: 4.0,
            evaluated: 5,
        };
        assert_eq!(
            format!("{}", failure),
            "Backend objective 4 disagrees with evaluated objective 5"
        );
        assert!(failure.source().is_none());

        let failure = SolverBackendFailure::<i64>::InvalidSchedule(vec![
            Violation::MissingAircraft {
                aircraft: AircraftIndex::new(2),
            },
        ]);
        assert!(format!("{}", failure)
            .starts_with("Backend schedule is infeasible with 1 violation(s), first: "));
    }

    #[test]
    fn test_extraction_error_converts() {
        let failure: SolverBackendFailure<i64> = ExtractionError::MissingValues {
            expected: 8,
            found: 0,
        }
        .into();
        assert!(matches!(failure, SolverBackendFailure::Extraction(_)));
    }
}
