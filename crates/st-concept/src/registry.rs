// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use tracing::debug;

use crate::composite::CompositeConcept;
use crate::concept::{Color, Concept};
use crate::error::{ConceptResult, InvalidInputError};
use crate::readout::{ConceptReadout, PhaseShift};

/// Insertion-ordered set of concepts keyed by name.
///
/// Every edit validates first and only then writes, so a rejected edit leaves
/// the registry exactly as it was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConceptRegistry {
    concepts: Vec<Concept>,
}

impl ConceptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.concepts.iter().map(Concept::name)
    }

    /// Registration-order index of the named concept.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.concepts.iter().position(|c| c.name() == name)
    }

    fn require(&self, name: &str) -> ConceptResult<usize> {
        self.index_of(name)
            .ok_or_else(|| InvalidInputError::UnknownConcept(name.trim().to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Concept> {
        self.index_of(name).map(|idx| &self.concepts[idx])
    }

    /// Adds a new concept; names must be unique.
    pub fn insert(&mut self, concept: Concept) -> ConceptResult<()> {
        if self.index_of(concept.name()).is_some() {
            return Err(InvalidInputError::DuplicateConcept(concept.name().to_string()));
        }
        debug!(name = concept.name(), "registered concept");
        self.concepts.push(concept);
        Ok(())
    }

    /// Replaces the concept with the same name in place, or appends it.
    /// Returns the previous value if one existed.
    pub fn upsert(&mut self, concept: Concept) -> Option<Concept> {
        match self.index_of(concept.name()) {
            Some(idx) => Some(std::mem::replace(&mut self.concepts[idx], concept)),
            None => {
                self.concepts.push(concept);
                None
            }
        }
    }

    pub fn set_magnitude(&mut self, name: &str, magnitude: f64) -> ConceptResult<&Concept> {
        let idx = self.require(name)?;
        let updated = self.concepts[idx].try_with_magnitude(magnitude)?;
        self.concepts[idx] = updated;
        Ok(&self.concepts[idx])
    }

    pub fn set_phase(&mut self, name: &str, phase: f64) -> ConceptResult<&Concept> {
        let idx = self.require(name)?;
        let updated = self.concepts[idx].try_with_phase(phase)?;
        self.concepts[idx] = updated;
        Ok(&self.concepts[idx])
    }

    pub fn set_color(&mut self, name: &str, color: Option<Color>) -> ConceptResult<&Concept> {
        let idx = self.require(name)?;
        self.concepts[idx].set_color(color);
        Ok(&self.concepts[idx])
    }

    pub fn remove(&mut self, name: &str) -> ConceptResult<Concept> {
        let idx = self.require(name)?;
        Ok(self.concepts.remove(idx))
    }

    /// Individual readouts in registration order.
    pub fn readouts(&self) -> Vec<ConceptReadout> {
        self.concepts.iter().map(Concept::readout).collect()
    }

    /// Builds a composite over every registered concept.
    pub fn composite(&self, shift: Option<PhaseShift>) -> ConceptResult<CompositeConcept> {
        let composite = CompositeConcept::new(self.concepts.clone())?;
        match shift {
            Some(PhaseShift { index, radians }) => composite.with_phase_shift(index, radians),
            None => Ok(composite),
        }
    }
}

impl<'a> IntoIterator for &'a ConceptRegistry {
    type Item = &'a Concept;
    type IntoIter = std::slice::Iter<'a, Concept>;

    fn into_iter(self) -> Self::IntoIter {
        self.concepts.iter()
    }
}
