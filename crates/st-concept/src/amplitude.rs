// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Closed-form amplitude algebra for concept combination.
//!
//! A concept with magnitude `r` and phase `θ` is represented by the amplitude
//! `ψ = r·e^(iθ)`. Born's rule gives its probability `|ψ|²`. Combining concepts
//! sums amplitudes *before* squaring, which produces the interference cross
//! term `2|ψ₁||ψ₂|cos(θ₁ − θ₂)` that classical probability lacks.
//!
//! None of the combinators rescale their result; raw magnitudes are user
//! supplied and the combined probability may exceed one.
//!
//! Probabilities are squares of magnitudes, so they overflow to infinity once
//! a magnitude passes roughly `1e154` (`sqrt(f64::MAX)`). The combinators
//! then report `+∞` rather than `NaN`; the normalised figure stays finite
//! because it is scale invariant.

use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::error::{check_magnitude, check_phase, ConceptResult};

/// `r·e^(iθ)`. Defined for every real `θ`; normalising the phase is cosmetic.
pub fn amplitude(magnitude: f64, phase: f64) -> Complex64 {
    Complex64::from_polar(magnitude, phase)
}

/// Validated variant of [`amplitude`]: rejects negative or non-finite
/// magnitudes and non-finite phases.
pub fn checked_amplitude(magnitude: f64, phase: f64) -> ConceptResult<Complex64> {
    let magnitude = check_magnitude(magnitude)?;
    let phase = check_phase(phase)?;
    Ok(amplitude(magnitude, phase))
}

/// Born's rule: `|ψ|² = ψ·conj(ψ)`.
pub fn probability(psi: Complex64) -> f64 {
    psi.norm_sqr()
}

/// Vector sum of the amplitudes. The empty sum is zero.
pub fn combine<I>(amplitudes: I) -> Complex64
where
    I: IntoIterator<Item = Complex64>,
{
    amplitudes
        .into_iter()
        .fold(Complex64::new(0.0, 0.0), |acc, psi| acc + psi)
}

/// Interference cross term `2|ψ₁||ψ₂|cos(θ₁ − θ₂)`.
///
/// Positive for constructive, negative for destructive and zero for
/// orthogonal phases. A zero amplitude contributes nothing regardless of the
/// phase reported by [`Complex64::arg`].
pub fn interference_term(first: Complex64, second: Complex64) -> f64 {
    let (r1, theta1) = first.to_polar();
    let (r2, theta2) = second.to_polar();
    2.0 * r1 * r2 * (theta1 - theta2).cos()
}

/// Two-concept combined probability in closed form:
/// `|ψ₁|² + |ψ₂|² + 2|ψ₁||ψ₂|cos(θ₁ − θ₂)`, algebraically `|ψ₁ + ψ₂|²`.
///
/// When the terms overflow and cancel (`∞ − ∞`) the value is taken from the
/// summed amplitude instead.
pub fn combined_probability(first: Complex64, second: Complex64) -> f64 {
    let closed = probability(first) + probability(second) + interference_term(first, second);
    if closed.is_nan() {
        probability(first + second)
    } else {
        closed
    }
}

/// Classical sum of individual probabilities `Σ|ψᵢ|²`.
pub fn total_probability(amplitudes: &[Complex64]) -> f64 {
    amplitudes.iter().copied().map(probability).sum()
}

/// Sum of [`interference_term`] over every unordered pair.
///
/// `total_probability(ψ) + pairwise_interference(ψ) == probability(combine(ψ))`
/// up to rounding.
pub fn pairwise_interference(amplitudes: &[Complex64]) -> f64 {
    amplitudes
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| amplitudes[i + 1..].iter().map(move |&b| (a, b)))
        .map(|(a, b)| interference_term(a, b))
        .sum()
}

/// Combined probability rescaled against the classical sum:
/// `P_c / (P_c + Σ|ψᵢ|²)` with `P_c = |Σψᵢ|²`, or zero when every amplitude
/// vanishes. Lies in `[0, 1)`.
///
/// The ratio does not depend on the overall scale, so the amplitudes are
/// divided by the largest modulus first and huge magnitudes cannot overflow.
pub fn normalised_combined_probability(amplitudes: &[Complex64]) -> f64 {
    let scale = amplitudes.iter().map(|psi| psi.norm()).fold(0.0, f64::max);
    if scale <= 0.0 || !scale.is_finite() {
        return 0.0;
    }
    let scaled: Vec<Complex64> = amplitudes.iter().map(|psi| *psi / scale).collect();
    let individual = total_probability(&scaled);
    let combined = probability(combine(scaled.iter().copied()));
    combined / (combined + individual)
}

/// Maps any finite angle into `[0, 2π)`.
pub fn normalize_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
