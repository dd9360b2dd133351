//! Line-oriented command interpreter.
//!
//! # Input Format
//!
//! ```text
//! <count>
//! BOOK <time> <hotel> <client_id> <room_count>
//! CLIENTS <hotel>
//! ROOMS <hotel>
//! ```
//!
//! The first line announces how many command lines follow. `CLIENTS` and
//! `ROOMS` each write one decimal line to the output. The first malformed,
//! unknown or rejected command stops the run.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::registry::StatsRegistry;
use crate::window::{ClientId, RoomCount, StatsError, Time};

/// Errors that abort a command run. Line numbers count command lines from 1.
#[derive(Debug)]
pub enum CommandError {
    /// Input ended or was blank where the command count was expected.
    MissingCount,
    /// Command count is not an unsigned integer.
    InvalidCount(String),
    /// Input ended before all announced commands were read.
    MissingLine { expected: usize, got: usize },
    /// Wrong argument count or type for a known command.
    Syntax { line: usize, command: &'static str },
    UnknownCommand { line: usize, keyword: String },
    /// The registry refused the booking.
    Rejected { line: usize, source: StatsError },
    Io(io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCount => write!(f, "missing command count"),
            Self::InvalidCount(raw) => write!(f, "invalid command count: '{}'", raw),
            Self::MissingLine { expected, got } => write!(
                f,
                "unexpected end of input: expected {} commands, got {}",
                expected, got
            ),
            Self::Syntax { line, command } => {
                write!(f, "line {}: {} query syntax error", line, command)
            }
            Self::UnknownCommand { line, keyword } => {
                write!(f, "line {}: Unknown query {}", line, keyword)
            }
            Self::Rejected { line, source } => write!(f, "line {}: {}", line, source),
            Self::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Book {
        time: Time,
        hotel: &'a str,
        client_id: ClientId,
        rooms: RoomCount,
    },
    Clients {
        hotel: &'a str,
    },
    Rooms {
        hotel: &'a str,
    },
}

impl<'a> Command<'a> {
    /// Parse one command line. Tokens past the expected arguments are ignored.
    pub fn parse(line_no: usize, line: &'a str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or("");

        match keyword {
            "BOOK" => {
                let syntax = || CommandError::Syntax {
                    line: line_no,
                    command: "BOOK",
                };
                let time = parse_token::<Time>(tokens.next()).ok_or_else(syntax)?;
                let hotel = tokens.next().ok_or_else(syntax)?;
                let client_id = parse_token::<ClientId>(tokens.next()).ok_or_else(syntax)?;
                let rooms = parse_token::<RoomCount>(tokens.next()).ok_or_else(syntax)?;
                Ok(Self::Book {
                    time,
                    hotel,
                    client_id,
                    rooms,
                })
            }
            "CLIENTS" => tokens
                .next()
                .map(|hotel| Self::Clients { hotel })
                .ok_or(CommandError::Syntax {
                    line: line_no,
                    command: "CLIENTS",
                }),
            "ROOMS" => tokens
                .next()
                .map(|hotel| Self::Rooms { hotel })
                .ok_or(CommandError::Syntax {
                    line: line_no,
                    command: "ROOMS",
                }),
            other => Err(CommandError::UnknownCommand {
                line: line_no,
                keyword: other.to_owned(),
            }),
        }
    }
}

fn parse_token<T: std::str::FromStr>(token: Option<&str>) -> Option<T> {
    token.and_then(|t| t.parse().ok())
}

/// Counts of what a run executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: usize,
    pub bookings: usize,
    pub queries: usize,
}

/// Drives a [`StatsRegistry`] from a command stream.
pub struct CommandInterpreter<'r, R, W> {
    input: R,
    output: W,
    registry: &'r mut StatsRegistry,
}

impl<'r, R: BufRead, W: Write> CommandInterpreter<'r, R, W> {
    pub fn new(input: R, output: W, registry: &'r mut StatsRegistry) -> Self {
        Self {
            input,
            output,
            registry,
        }
    }

    /// Execute every announced command, then flush the output.
    pub fn run(&mut self) -> Result<RunSummary, CommandError> {
        let count = self.read_count()?;
        let mut summary = RunSummary::default();
        let mut line = String::new();

        for index in 0..count {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                self.output.flush()?;
                return Err(CommandError::MissingLine {
                    expected: count,
                    got: index,
                });
            }

            if let Err(e) = self.execute(index + 1, &line, &mut summary) {
                self.output.flush()?;
                return Err(e);
            }
            summary.commands += 1;
        }

        self.output.flush()?;
        debug!(
            commands = summary.commands,
            bookings = summary.bookings,
            queries = summary.queries,
            hotels = self.registry.entity_count(),
            "command run complete"
        );
        Ok(summary)
    }

    fn read_count(&mut self) -> Result<usize, CommandError> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let raw = line.trim();
        if raw.is_empty() {
            return Err(CommandError::MissingCount);
        }
        raw.parse()
            .map_err(|_| CommandError::InvalidCount(raw.to_owned()))
    }

    fn execute(
        &mut self,
        line_no: usize,
        line: &str,
        summary: &mut RunSummary,
    ) -> Result<(), CommandError> {
        match Command::parse(line_no, line)? {
            Command::Book {
                time,
                hotel,
                client_id,
                rooms,
            } => {
                self.registry
                    .record(time, hotel, client_id, rooms)
                    .map_err(|source| CommandError::Rejected {
                        line: line_no,
                        source,
                    })?;
                summary.bookings += 1;
            }
            Command::Clients { hotel } => {
                let clients = self.registry.distinct_client_count_within_window(hotel);
                writeln!(self.output, "{}", clients)?;
                summary.queries += 1;
            }
            Command::Rooms { hotel } => {
                let rooms = self.registry.booked_volume_within_window(hotel);
                writeln!(self.output, "{}", rooms)?;
                summary.queries += 1;
            }
        }
        Ok(())
    }
}
