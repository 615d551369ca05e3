// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Serialisable results handed to whatever draws the complex-plane diagram.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::amplitude::{amplitude, normalize_phase, probability};
use crate::concept::{Color, Concept};

/// Per-concept output: the amplitude vector and its Born probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptReadout {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub magnitude: f64,
    pub phase: f64,
    pub re: f64,
    pub im: f64,
    pub probability: f64,
}

impl ConceptReadout {
    /// `shift` is the extra phase a composite applied to this member; zero for
    /// a standalone concept.
    pub(crate) fn from_parts(concept: &Concept, shift: f64) -> Self {
        let magnitude = concept.magnitude();
        let phase = normalize_phase(concept.phase() + shift);
        let psi = amplitude(magnitude, phase);
        Self {
            name: concept.name().to_string(),
            color: concept.color(),
            magnitude,
            phase,
            re: psi.re,
            im: psi.im,
            probability: probability(psi),
        }
    }

    pub fn amplitude(&self) -> Complex64 {
        Complex64::new(self.re, self.im)
    }
}

/// Extra phase applied to one composite member before summation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseShift {
    pub index: usize,
    pub radians: f64,
}

/// Composite output: member vectors, their sum, and the probability split.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeReadout {
    pub members: Vec<ConceptReadout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<PhaseShift>,
    pub combined_re: f64,
    pub combined_im: f64,
    pub combined_probability: f64,
    pub interference: f64,
    /// Sum of the members' individual probabilities.
    pub classical_probability: f64,
    /// `P_c / (P_c + Σ|ψᵢ|²)`; reported next to, never instead of, the raw value.
    pub normalised_probability: f64,
}

impl CompositeReadout {
    pub fn combined_amplitude(&self) -> Complex64 {
        Complex64::new(self.combined_re, self.combined_im)
    }

    /// Display label such as `Pet Fish`.
    pub fn label(&self) -> String {
        self.members
            .iter()
            .map(|member| member.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
