// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::amplitude::{amplitude, normalize_phase, probability};
use crate::error::{check_magnitude, check_phase, ConceptResult, InvalidInputError};
use crate::readout::ConceptReadout;

/// Display colour attached to a concept. Plays no part in the arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = InvalidInputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidInputError::InvalidColor(raw.to_string());
        let hex = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A named concept with magnitude `r ≥ 0` and phase `θ ∈ [0, 2π)`.
///
/// Fields are private so the invariants hold for every live value; the
/// amplitude is always derived, never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Concept {
    name: String,
    magnitude: f64,
    phase: f64,
    color: Option<Color>,
}

impl Concept {
    /// Validates the inputs and wraps the phase into `[0, 2π)`.
    pub fn new(name: impl Into<String>, magnitude: f64, phase: f64) -> ConceptResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(InvalidInputError::EmptyName);
        }
        let magnitude = check_magnitude(magnitude)?;
        let phase = normalize_phase(check_phase(phase)?);
        Ok(Self {
            name,
            magnitude,
            phase,
            color: None,
        })
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Phase in radians, normalised to `[0, 2π)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns a copy with a new magnitude, leaving `self` untouched on error.
    pub fn try_with_magnitude(&self, magnitude: f64) -> ConceptResult<Self> {
        let magnitude = check_magnitude(magnitude)?;
        Ok(Self {
            magnitude,
            ..self.clone()
        })
    }

    /// Returns a copy with a new phase, leaving `self` untouched on error.
    pub fn try_with_phase(&self, phase: f64) -> ConceptResult<Self> {
        let phase = normalize_phase(check_phase(phase)?);
        Ok(Self {
            phase,
            ..self.clone()
        })
    }

    pub(crate) fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn amplitude(&self) -> Complex64 {
        amplitude(self.magnitude, self.phase)
    }

    /// Individual probability `r²`.
    pub fn probability(&self) -> f64 {
        probability(self.amplitude())
    }

    pub fn readout(&self) -> ConceptReadout {
        ConceptReadout::from_parts(self, 0.0)
    }
}
