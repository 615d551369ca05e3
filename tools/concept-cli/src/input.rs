//! Parsers for the textual inputs accepted on the command line and in the
//! interactive session.

use std::f64::consts::PI;

use st_concept::{Color, Concept, PhaseShift};

use crate::error::{CliError, CliResult};

/// Parses a real number. Non-finite spellings (`inf`, `NaN`) are accepted
/// here and rejected by concept validation.
pub fn parse_number(raw: &str) -> CliResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CliError::Number(raw.to_string()))
}

/// Parses an angle in radians. Also accepts `<x>deg`, `<x>°`, `pi`, `-pi`,
/// `<k>pi`, `<k>*pi`, `pi/<n>` and `<k>pi/<n>`.
pub fn parse_angle(raw: &str) -> CliResult<f64> {
    let invalid = || CliError::Angle(raw.to_string());
    let text = raw.trim().to_ascii_lowercase().replace('π', "pi");
    if text.is_empty() {
        return Err(invalid());
    }

    if let Some(degrees) = text
        .strip_suffix("deg")
        .or_else(|| text.strip_suffix('°'))
    {
        return parse_number(degrees)
            .map(f64::to_radians)
            .map_err(|_| invalid());
    }

    if !text.contains("pi") {
        return parse_number(&text).map_err(|_| invalid());
    }

    let (numerator, denominator) = match text.split_once('/') {
        Some((num, den)) => (num, Some(den)),
        None => (text.as_str(), None),
    };
    let coefficient = numerator
        .trim()
        .strip_suffix("pi")
        .map(|c| c.trim().trim_end_matches('*').trim())
        .ok_or_else(invalid)?;
    let coefficient = match coefficient {
        "" | "+" => 1.0,
        "-" => -1.0,
        other => parse_number(other).map_err(|_| invalid())?,
    };
    let divisor = match denominator {
        Some(den) => {
            let value = parse_number(den).map_err(|_| invalid())?;
            if value == 0.0 || !value.is_finite() {
                return Err(invalid());
            }
            value
        }
        None => 1.0,
    };
    Ok(coefficient * PI / divisor)
}

/// Parses `name:magnitude:phase[:#rrggbb]` into a validated concept.
pub fn parse_concept(raw: &str) -> CliResult<Concept> {
    let parts: Vec<&str> = raw.split(':').collect();
    let (name, magnitude, phase, color) = match parts.as_slice() {
        [name, magnitude, phase] => (*name, *magnitude, *phase, None),
        [name, magnitude, phase, color] => (*name, *magnitude, *phase, Some(*color)),
        _ => return Err(CliError::ConceptSpec(raw.to_string())),
    };
    let concept = Concept::new(name, parse_number(magnitude)?, parse_angle(phase)?)?;
    match color {
        Some(color) => Ok(concept.with_color(color.parse::<Color>()?)),
        None => Ok(concept),
    }
}

/// Parses `index:angle`; member indices are zero based.
pub fn parse_shift(raw: &str) -> CliResult<PhaseShift> {
    let (index, angle) = raw
        .split_once(':')
        .ok_or_else(|| CliError::ShiftSpec(raw.to_string()))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| CliError::ShiftSpec(raw.to_string()))?;
    let radians = parse_angle(angle)?;
    if !radians.is_finite() {
        return Err(st_concept::InvalidInputError::NonFiniteShift { value: radians }.into());
    }
    Ok(PhaseShift { index, radians })
}
