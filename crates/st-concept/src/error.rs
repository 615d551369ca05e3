// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

/// Rejected concept input. Nothing here is fatal: the caller corrects the
/// offending value and recomputes.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidInputError {
    #[error("magnitude must be non-negative (got {value})")]
    NegativeMagnitude { value: f64 },
    #[error("magnitude is not finite: {value}")]
    NonFiniteMagnitude { value: f64 },
    #[error("phase is not finite: {value}")]
    NonFinitePhase { value: f64 },
    #[error("interference phase shift is not finite: {value}")]
    NonFiniteShift { value: f64 },
    #[error("concept name must not be empty")]
    EmptyName,
    #[error("concept `{0}` is already registered")]
    DuplicateConcept(String),
    #[error("concept `{0}` is not registered")]
    UnknownConcept(String),
    #[error("a composite concept needs at least two members (got {found})")]
    TooFewMembers { found: usize },
    #[error("phase shift targets member {index} but the composite has {len} members")]
    ShiftOutOfRange { index: usize, len: usize },
    #[error("colour `{0}` is not of the form #rrggbb")]
    InvalidColor(String),
}

pub type ConceptResult<T> = Result<T, InvalidInputError>;

/// Validates a raw magnitude.
pub(crate) fn check_magnitude(value: f64) -> ConceptResult<f64> {
    if !value.is_finite() {
        return Err(InvalidInputError::NonFiniteMagnitude { value });
    }
    if value < 0.0 {
        return Err(InvalidInputError::NegativeMagnitude { value });
    }
    Ok(value)
}

/// Validates a raw phase (any finite real is acceptable).
pub(crate) fn check_phase(value: f64) -> ConceptResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidInputError::NonFinitePhase { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_checks_cover_sign_and_finiteness() {
        assert_eq!(check_magnitude(0.0), Ok(0.0));
        assert_eq!(check_magnitude(2.5), Ok(2.5));
        assert_eq!(
            check_magnitude(-1.0),
            Err(InvalidInputError::NegativeMagnitude { value: -1.0 })
        );
        assert!(matches!(
            check_magnitude(f64::INFINITY),
            Err(InvalidInputError::NonFiniteMagnitude { .. })
        ));
        assert!(matches!(
            check_magnitude(f64::NAN),
            Err(InvalidInputError::NonFiniteMagnitude { .. })
        ));
    }

    #[test]
    fn phase_accepts_any_finite_value() {
        assert_eq!(check_phase(-42.0), Ok(-42.0));
        assert!(check_phase(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = InvalidInputError::NegativeMagnitude { value: -1.0 };
        assert_eq!(err.to_string(), "magnitude must be non-negative (got -1)");
        let err = InvalidInputError::ShiftOutOfRange { index: 3, len: 2 };
        assert!(err.to_string().contains("member 3"));
    }
}
