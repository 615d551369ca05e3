// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Quantum-inspired concept combination, the "pet fish" problem.
//!
//! Each concept carries a magnitude and a phase. Its amplitude is
//! `r·e^(iθ)` and its probability follows Born's rule. A composite sums the
//! amplitudes before squaring, so the combined probability picks up an
//! interference term `2|ψ₁||ψ₂|cos(θ₁ − θ₂)` that can be constructive,
//! destructive or zero.
//!
//! ```
//! use st_concept::{CompositeConcept, Concept};
//!
//! let pet = Concept::new("Pet", 1.0, 0.0)?;
//! let fish = Concept::new("Fish", 1.0, 0.0)?;
//! let readout = CompositeConcept::new(vec![pet, fish])?.evaluate();
//! assert!((readout.combined_probability - 4.0).abs() < 1e-9);
//! # Ok::<(), st_concept::InvalidInputError>(())
//! ```

pub mod amplitude;
pub mod composite;
pub mod concept;
pub mod error;
pub mod readout;
pub mod registry;

pub use amplitude::{
    amplitude, checked_amplitude, combine, combined_probability, interference_term,
    normalised_combined_probability, normalize_phase, pairwise_interference, probability,
    total_probability,
};
pub use composite::CompositeConcept;
pub use concept::{Color, Concept};
pub use error::{ConceptResult, InvalidInputError};
pub use readout::{CompositeReadout, ConceptReadout, PhaseShift};
pub use registry::ConceptRegistry;

/// The canonical demonstration: "Pet" and "Fish" in phase, with magnitudes
/// `1/√3` and `1/√2`.
pub fn pet_fish() -> ConceptResult<CompositeConcept> {
    let pet = Concept::new("Pet", 1.0 / 3f64.sqrt(), 0.0)?;
    let fish = Concept::new("Fish", 1.0 / 2f64.sqrt(), 0.0)?;
    CompositeConcept::new(vec![pet, fish])
}
