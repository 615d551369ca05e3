use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Upper bound on the number of decimal digits printed in text readouts.
pub const MAX_PRECISION: usize = 12;

const DEFAULT_PRECISION: usize = 4;

/// Rendering target for concept readouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned, human readable table.
    #[default]
    Text,
    /// Machine readable JSON consumed by plotting front ends.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format `{other}` (expected text or json)")),
        }
    }
}

/// How concept and composite readouts are presented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadoutConfig {
    /// Decimal digits printed for every real number in text output.
    pub precision: usize,
    /// Default rendering target.
    pub format: OutputFormat,
    /// Whether text output includes the normalised combined probability.
    pub show_normalised: bool,
}

impl Default for ReadoutConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            format: OutputFormat::Text,
            show_normalised: true,
        }
    }
}

impl ReadoutConfig {
    /// Builds a configuration snapshot from environment variables.
    fn from_env() -> Self {
        let defaults = Self::default();

        let precision = std::env::var("SPIRAL_CONCEPT_PRECISION")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(|p| p.min(MAX_PRECISION))
            .unwrap_or(defaults.precision);

        let format = std::env::var("SPIRAL_CONCEPT_FORMAT")
            .ok()
            .and_then(|v| v.parse::<OutputFormat>().ok())
            .unwrap_or(defaults.format);

        let show_normalised = std::env::var("SPIRAL_CONCEPT_NORMALISED")
            .ok()
            .map(|v| !matches!(v.trim(), "0" | "false" | "False" | "off" | "OFF"))
            .unwrap_or(defaults.show_normalised);

        Self {
            precision,
            format,
            show_normalised,
        }
    }

    /// Returns a copy with the precision replaced, clamped to [`MAX_PRECISION`].
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision.min(MAX_PRECISION);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

static CONFIG: OnceLock<ReadoutConfig> = OnceLock::new();

/// Returns the lazily initialised readout configuration.
pub fn config() -> &'static ReadoutConfig {
    CONFIG.get_or_init(ReadoutConfig::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
    use std::sync::{Mutex, OnceLock};

    fn with_env(vars: &[(&str, Option<&str>)], test: impl FnOnce()) {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        let _lock = GUARD.get_or_init(|| Mutex::new(())).lock().unwrap();

        let snapshot: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(key, value)| {
                let previous = std::env::var(key).ok();
                match value {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
                ((*key).to_string(), previous)
            })
            .collect();

        let result = catch_unwind(AssertUnwindSafe(test));

        for (key, value) in snapshot {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }

        if let Err(err) = result {
            resume_unwind(err);
        }
    }

    #[test]
    fn defaults_apply_without_environment() {
        with_env(
            &[
                ("SPIRAL_CONCEPT_PRECISION", None),
                ("SPIRAL_CONCEPT_FORMAT", None),
                ("SPIRAL_CONCEPT_NORMALISED", None),
            ],
            || {
                let cfg = ReadoutConfig::from_env();
                assert_eq!(cfg, ReadoutConfig::default());
                assert_eq!(cfg.precision, 4);
                assert_eq!(cfg.format, OutputFormat::Text);
                assert!(cfg.show_normalised);
            },
        );
    }

    #[test]
    fn environment_overrides_are_honoured() {
        with_env(
            &[
                ("SPIRAL_CONCEPT_PRECISION", Some("7")),
                ("SPIRAL_CONCEPT_FORMAT", Some("JSON")),
                ("SPIRAL_CONCEPT_NORMALISED", Some("off")),
            ],
            || {
                let cfg = ReadoutConfig::from_env();
                assert_eq!(cfg.precision, 7);
                assert_eq!(cfg.format, OutputFormat::Json);
                assert!(!cfg.show_normalised);
            },
        );
    }

    #[test]
    fn precision_is_clamped_and_garbage_ignored() {
        with_env(
            &[
                ("SPIRAL_CONCEPT_PRECISION", Some("40")),
                ("SPIRAL_CONCEPT_FORMAT", Some("yaml")),
            ],
            || {
                let cfg = ReadoutConfig::from_env();
                assert_eq!(cfg.precision, MAX_PRECISION);
                assert_eq!(cfg.format, OutputFormat::Text);
            },
        );
        with_env(&[("SPIRAL_CONCEPT_PRECISION", Some("many"))], || {
            assert_eq!(ReadoutConfig::from_env().precision, 4);
        });
    }

    #[test]
    fn builder_overrides_clamp_precision() {
        let cfg = ReadoutConfig::default()
            .with_precision(99)
            .with_format(OutputFormat::Json);
        assert_eq!(cfg.precision, MAX_PRECISION);
        assert_eq!(cfg.format, OutputFormat::Json);
    }

    #[test]
    fn output_format_parses_aliases() {
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!(" json ".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
