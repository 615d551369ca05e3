use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use spiral_config::{OutputFormat, ReadoutConfig};
use st_concept::{CompositeReadout, ConceptReadout, ConceptRegistry, ConceptResult, PhaseShift};

use crate::error::CliResult;

/// Everything a plotting front end needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub concepts: Vec<ConceptReadout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<CompositeReadout>,
}

impl Report {
    /// Individual readouts always; the composite once two concepts exist, or
    /// whenever a shift is requested (which then fails on a single concept).
    pub fn from_registry(
        registry: &ConceptRegistry,
        shift: Option<PhaseShift>,
    ) -> ConceptResult<Self> {
        let composite = if registry.len() >= 2 || shift.is_some() {
            Some(registry.composite(shift)?.evaluate())
        } else {
            None
        };
        Ok(Self {
            concepts: registry.readouts(),
            composite,
        })
    }
}

pub fn render(report: &Report, config: &ReadoutConfig) -> CliResult<String> {
    match config.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report, config)?),
    }
}

fn interference_kind(value: f64) -> &'static str {
    const TOLERANCE: f64 = 1e-12;
    if value > TOLERANCE {
        "constructive"
    } else if value < -TOLERANCE {
        "destructive"
    } else {
        "orthogonal"
    }
}

pub fn render_text(report: &Report, config: &ReadoutConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_text(&mut out, report, config)?;
    Ok(out)
}

/// Writes the aligned table for `report` into `out`.
fn write_text<W: Write>(out: &mut W, report: &Report, config: &ReadoutConfig) -> fmt::Result {
    let p = config.precision;
    let width = (p + 6).max(9);
    let name_width = report
        .concepts
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("concept".len());

    if report.concepts.is_empty() {
        return writeln!(out, "no concepts defined");
    }

    writeln!(
        out,
        "{:<name_width$}  {:>width$}  {:>width$}  {:>width$}  {:>width$}  {:>width$}",
        "concept", "magnitude", "phase", "re", "im", "probability"
    )?;
    for c in &report.concepts {
        write!(
            out,
            "{:<name_width$}  {:>width$.p$}  {:>width$.p$}  {:>width$.p$}  {:>width$.p$}  {:>width$.p$}",
            c.name, c.magnitude, c.phase, c.re, c.im, c.probability
        )?;
        if let Some(color) = c.color {
            write!(out, "  {color}")?;
        }
        writeln!(out)?;
    }

    if let Some(composite) = &report.composite {
        writeln!(out, "\ncomposite \"{}\"", composite.label())?;
        writeln!(
            out,
            "  combined amplitude    {:.p$} {} {:.p$}i",
            composite.combined_re,
            if composite.combined_im < 0.0 { '-' } else { '+' },
            composite.combined_im.abs()
        )?;
        writeln!(
            out,
            "  combined probability  {:.p$}",
            composite.combined_probability
        )?;
        writeln!(
            out,
            "  interference          {:.p$} ({})",
            composite.interference,
            interference_kind(composite.interference)
        )?;
        writeln!(
            out,
            "  classical sum         {:.p$}",
            composite.classical_probability
        )?;
        if config.show_normalised {
            writeln!(
                out,
                "  normalised            {:.p$}",
                composite.normalised_probability
            )?;
        }
        if let Some(shift) = composite.shift {
            writeln!(
                out,
                "  phase shift           member {} by {:.p$} rad",
                shift.index, shift.radians
            )?;
        }
    }
    Ok(())
}
