use std::{fmt, io};

use st_concept::InvalidInputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InvalidInputError),
    #[error("invalid angle `{0}` (use radians, <x>deg, pi, <k>pi, pi/<n> or <k>pi/<n>)")]
    Angle(String),
    #[error("invalid number `{0}`")]
    Number(String),
    #[error("malformed concept `{0}` (expected name:magnitude:phase[:#rrggbb])")]
    ConceptSpec(String),
    #[error("malformed shift `{0}` (expected index:angle)")]
    ShiftSpec(String),
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to format readout")]
    Format(#[from] fmt::Error),
}

pub type CliResult<T> = Result<T, CliError>;
