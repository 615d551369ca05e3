//! Line-oriented interactive session: every accepted edit recomputes and
//! prints the readout, every rejected edit leaves the state untouched.

use std::io::{BufRead, Write};

use spiral_config::{OutputFormat, ReadoutConfig};
use st_concept::{Color, Concept, ConceptRegistry, InvalidInputError, PhaseShift};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};
use crate::input::{parse_angle, parse_number};
use crate::render::{render, Report};

const HELP: &str = "\
commands:
  set <name> <magnitude> <phase> [#rrggbb]   add or replace a concept
  mag <name> <magnitude>                     change a magnitude
  phase <name> <angle>                       change a phase
  color <name> <#rrggbb|none>                change the display colour
  remove <name>                              drop a concept
  shift <index> <angle> | shift off          extra phase on one member
  show                                       print the current readout
  json                                       print the current readout as JSON
  help                                       this text
  quit                                       leave the session
angles: radians, <x>deg, pi, <k>pi, pi/<n>, <k>pi/<n>";

/// Result of one session command.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
    Nothing,
}

#[derive(Debug)]
pub struct Session {
    registry: ConceptRegistry,
    shift: Option<PhaseShift>,
    config: ReadoutConfig,
}

impl Session {
    pub fn new(config: ReadoutConfig) -> Self {
        Self {
            registry: ConceptRegistry::new(),
            shift: None,
            config,
        }
    }

    fn view(&self, format: OutputFormat) -> CliResult<Reply> {
        let report = Report::from_registry(&self.registry, self.shift)?;
        let config = self.config.clone().with_format(format);
        Ok(Reply::Output(render(&report, &config)?))
    }

    fn refresh(&self) -> CliResult<Reply> {
        self.view(self.config.format)
    }

    /// Parses and applies one command line.
    pub fn execute(&mut self, line: &str) -> CliResult<Reply> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(Reply::Nothing);
        };
        debug!(command, args = args.len(), "session command");

        match (command.to_ascii_lowercase().as_str(), args) {
            ("set", [name, magnitude, phase, rest @ ..]) if rest.len() <= 1 => {
                let mut concept =
                    Concept::new(*name, parse_number(magnitude)?, parse_angle(phase)?)?;
                match rest.first() {
                    Some(color) => concept = concept.with_color(color.parse::<Color>()?),
                    None => {
                        if let Some(color) = self.registry.get(name).and_then(Concept::color) {
                            concept = concept.with_color(color);
                        }
                    }
                }
                self.registry.upsert(concept);
                self.refresh()
            }
            ("set", _) => Err(CliError::Usage("set <name> <magnitude> <phase> [#rrggbb]")),
            ("mag", [name, magnitude]) => {
                self.registry.set_magnitude(name, parse_number(magnitude)?)?;
                self.refresh()
            }
            ("mag", _) => Err(CliError::Usage("mag <name> <magnitude>")),
            ("phase", [name, angle]) => {
                self.registry.set_phase(name, parse_angle(angle)?)?;
                self.refresh()
            }
            ("phase", _) => Err(CliError::Usage("phase <name> <angle>")),
            ("color" | "colour", [name, color]) => {
                let color = match *color {
                    "none" | "-" => None,
                    raw => Some(raw.parse::<Color>()?),
                };
                self.registry.set_color(name, color)?;
                self.refresh()
            }
            ("color" | "colour", _) => Err(CliError::Usage("color <name> <#rrggbb|none>")),
            ("remove" | "rm", [name]) => {
                let removed = self
                    .registry
                    .index_of(name)
                    .ok_or_else(|| InvalidInputError::UnknownConcept(name.trim().to_string()))?;
                self.registry.remove(name)?;
                self.shift = match self.shift {
                    Some(shift) if shift.index == removed || self.registry.len() < 2 => {
                        warn!(index = shift.index, "dropping phase shift after removal");
                        None
                    }
                    // later members move up by one; the shift follows its member
                    Some(shift) if shift.index > removed => Some(PhaseShift {
                        index: shift.index - 1,
                        ..shift
                    }),
                    other => other,
                };
                self.refresh()
            }
            ("remove" | "rm", _) => Err(CliError::Usage("remove <name>")),
            ("shift", ["off"]) => {
                self.shift = None;
                self.refresh()
            }
            ("shift", [index, angle]) => {
                let index = index
                    .parse::<usize>()
                    .map_err(|_| CliError::Number((*index).to_string()))?;
                let shift = PhaseShift {
                    index,
                    radians: parse_angle(angle)?,
                };
                // validate against the current members before committing
                self.registry.composite(Some(shift))?;
                self.shift = Some(shift);
                self.refresh()
            }
            ("shift", _) => Err(CliError::Usage("shift <index> <angle> | shift off")),
            ("show", []) => self.refresh(),
            ("json", []) => self.view(OutputFormat::Json),
            ("help" | "?", _) => Ok(Reply::Output(HELP.to_string())),
            ("quit" | "exit", _) => Ok(Reply::Quit),
            (other, _) => Err(CliError::UnknownCommand(other.to_string())),
        }
    }

    /// Drives the session until `quit` or end of input. Command errors are
    /// printed and the session continues; only I/O failures end it early.
    pub fn run<R, W>(&mut self, input: R, mut output: W, prompt: bool) -> CliResult<()>
    where
        R: BufRead,
        W: Write,
    {
        info!("concept session started");
        if prompt {
            writeln!(output, "type `help` for commands")?;
        }
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(output, "> ")?;
                output.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            match self.execute(&line?) {
                Ok(Reply::Output(text)) => writeln!(output, "{}", text.trim_end())?,
                Ok(Reply::Nothing) => {}
                Ok(Reply::Quit) => break,
                Err(err) => {
                    warn!(error = %err, "rejected session command");
                    writeln!(output, "error: {err}")?;
                }
            }
            output.flush()?;
        }
        info!(concepts = self.registry.len(), "concept session finished");
        Ok(())
    }
}

#[cfg(test)]
impl Session {
    pub fn registry(&self) -> &ConceptRegistry {
        &self.registry
    }

    pub fn shift(&self) -> Option<PhaseShift> {
        self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_concept::InvalidInputError;

    fn session() -> Session {
        let mut session = Session::new(ReadoutConfig::default());
        session.execute("set Pet 1 0").unwrap();
        session.execute("set Fish 1 0 #ff0000").unwrap();
        session
    }

    #[test]
    fn edits_recompute_the_readout() {
        let mut session = session();
        match session.execute("show").unwrap() {
            Reply::Output(text) => assert!(text.contains("combined probability  4.0000")),
            other => panic!("unexpected reply {other:?}"),
        }
        match session.execute("phase Fish pi").unwrap() {
            Reply::Output(text) => assert!(text.contains("(destructive)")),
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn rejected_edit_keeps_state() {
        let mut session = session();
        let before = session.registry().clone();
        let err = session.execute("mag Pet -1").unwrap_err();
        assert!(matches!(
            err,
            CliError::Input(InvalidInputError::NegativeMagnitude { .. })
        ));
        assert!(session.execute("set Dog -1 0").is_err());
        assert!(session.execute("phase Fish nan").is_err());
        assert!(session.execute("mag Pet lots").is_err());
        assert_eq!(session.registry(), &before);
    }

    #[test]
    fn set_keeps_existing_colour_unless_given() {
        let mut session = session();
        session.execute("set Fish 0.5 1").unwrap();
        let fish = session.registry().get("Fish").unwrap();
        assert_eq!(fish.color().unwrap().to_string(), "#ff0000");
        session.execute("color Fish none").unwrap();
        assert!(session.registry().get("Fish").unwrap().color().is_none());
    }

    #[test]
    fn shift_is_validated_and_dropped_with_its_member() {
        let mut session = session();
        assert!(session.execute("shift 2 pi").is_err());
        assert!(session.shift().is_none());
        session.execute("shift 1 pi").unwrap();
        assert_eq!(session.shift().unwrap().index, 1);
        session.execute("remove Fish").unwrap();
        assert!(session.shift().is_none());
    }

    #[test]
    fn shift_follows_its_member_when_others_are_removed() {
        let mut session = session();
        session.execute("set Bird 1 0").unwrap();
        session.execute("shift 1 pi").unwrap();

        session.execute("remove Bird").unwrap();
        assert_eq!(session.shift().unwrap().index, 1);

        session.execute("set Bird 1 0").unwrap();
        session.execute("remove Pet").unwrap();
        let shift = session.shift().unwrap();
        assert_eq!(shift.index, 0);
        let readout = session.registry().composite(Some(shift)).unwrap().evaluate();
        assert_eq!(readout.members[0].name, "Fish");
        assert!((readout.members[0].phase - std::f64::consts::PI).abs() < 1e-12);
        assert!((readout.members[1].phase).abs() < 1e-12);
    }

    #[test]
    fn removing_the_shifted_member_drops_the_shift() {
        let mut session = session();
        session.execute("set Bird 1 0").unwrap();
        session.execute("shift 1 pi").unwrap();
        session.execute("remove Fish").unwrap();
        assert!(session.shift().is_none());
        assert_eq!(session.registry().names().collect::<Vec<_>>(), vec!["Pet", "Bird"]);
        match session.execute("show").unwrap() {
            Reply::Output(text) => assert!(text.contains("(constructive)")),
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn usage_and_unknown_commands() {
        let mut session = session();
        assert!(matches!(
            session.execute("mag Pet"),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            session.execute("fly"),
            Err(CliError::UnknownCommand(_))
        ));
        assert_eq!(session.execute("   ").unwrap(), Reply::Nothing);
        assert_eq!(session.execute("quit").unwrap(), Reply::Quit);
    }

    #[test]
    fn run_reports_errors_and_continues() {
        let script = "set Pet 1 0\nmag Pet -1\nset Fish 1 pi\njson\nquit\nset Ignored 1 0\n";
        let mut output = Vec::new();
        let mut session = Session::new(ReadoutConfig::default());
        session.run(script.as_bytes(), &mut output, false).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("error: magnitude must be non-negative (got -1)"));
        assert!(text.contains("\"combined_probability\""));
        assert!(session.registry().get("Ignored").is_none());
        assert_eq!(session.registry().len(), 2);
    }
}
