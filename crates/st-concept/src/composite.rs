// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use num_complex::Complex64;
use tracing::debug;

use crate::amplitude::{
    amplitude, combine, combined_probability, normalised_combined_probability,
    pairwise_interference, probability, total_probability,
};
use crate::concept::Concept;
use crate::error::{ConceptResult, InvalidInputError};
use crate::readout::{CompositeReadout, ConceptReadout, PhaseShift};

/// Ordered combination of two or more concepts, e.g. "Pet" + "Fish".
///
/// An optional [`PhaseShift`] rotates one member's amplitude before the sum,
/// which moves the interference term without touching any individual
/// probability.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeConcept {
    members: Vec<Concept>,
    shift: Option<PhaseShift>,
}

impl CompositeConcept {
    pub fn new(members: Vec<Concept>) -> ConceptResult<Self> {
        if members.len() < 2 {
            return Err(InvalidInputError::TooFewMembers {
                found: members.len(),
            });
        }
        Ok(Self {
            members,
            shift: None,
        })
    }

    /// Applies an extra phase of `radians` to member `index`. Replaces any
    /// previously configured shift.
    pub fn with_phase_shift(mut self, index: usize, radians: f64) -> ConceptResult<Self> {
        if !radians.is_finite() {
            return Err(InvalidInputError::NonFiniteShift { value: radians });
        }
        if index >= self.members.len() {
            return Err(InvalidInputError::ShiftOutOfRange {
                index,
                len: self.members.len(),
            });
        }
        self.shift = Some(PhaseShift { index, radians });
        Ok(self)
    }

    pub fn members(&self) -> &[Concept] {
        &self.members
    }

    pub fn shift(&self) -> Option<PhaseShift> {
        self.shift
    }

    fn shift_for(&self, index: usize) -> f64 {
        match self.shift {
            Some(shift) if shift.index == index => shift.radians,
            _ => 0.0,
        }
    }

    /// Member amplitudes with the phase shift applied.
    pub fn amplitudes(&self) -> Vec<Complex64> {
        self.members
            .iter()
            .enumerate()
            .map(|(idx, concept)| {
                amplitude(concept.magnitude(), concept.phase() + self.shift_for(idx))
            })
            .collect()
    }

    pub fn combined_amplitude(&self) -> Complex64 {
        combine(self.amplitudes())
    }

    /// `|Σψᵢ|²`. Two members use the closed form with the explicit cosine
    /// term; larger composites sum directly. Overflowing magnitudes give `+∞`.
    pub fn combined_probability(&self) -> f64 {
        match self.amplitudes().as_slice() {
            [first, second] => combined_probability(*first, *second),
            amplitudes => probability(combine(amplitudes.iter().copied())),
        }
    }

    /// Total interference over every pair of members.
    pub fn interference_term(&self) -> f64 {
        pairwise_interference(&self.amplitudes())
    }

    /// Classical sum of the members' probabilities.
    pub fn classical_probability(&self) -> f64 {
        total_probability(&self.amplitudes())
    }

    pub fn normalised_probability(&self) -> f64 {
        normalised_combined_probability(&self.amplitudes())
    }

    pub fn evaluate(&self) -> CompositeReadout {
        let amplitudes = self.amplitudes();
        let combined = combine(amplitudes.iter().copied());
        let readout = CompositeReadout {
            members: self
                .members
                .iter()
                .enumerate()
                .map(|(idx, concept)| ConceptReadout::from_parts(concept, self.shift_for(idx)))
                .collect(),
            shift: self.shift,
            combined_re: combined.re,
            combined_im: combined.im,
            combined_probability: self.combined_probability(),
            interference: pairwise_interference(&amplitudes),
            classical_probability: total_probability(&amplitudes),
            normalised_probability: normalised_combined_probability(&amplitudes),
        };
        debug!(
            members = readout.members.len(),
            combined = readout.combined_probability,
            interference = readout.interference,
            "evaluated composite concept"
        );
        readout
    }
}
