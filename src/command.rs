use crate::model::Ms;

/// A parsed front-end command. `None` fields were given as `-`.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Rooms,
    Book {
        room_id: Option<String>,
        start: Option<Ms>,
        end: Option<Ms>,
    },
    Available {
        start: Option<Ms>,
        end: Option<Ms>,
    },
    Free {
        room_id: String,
        start: Option<Ms>,
        end: Option<Ms>,
    },
    Cancel {
        booking_id: Option<String>,
    },
    Bookings {
        room_id: String,
    },
    Show {
        booking_id: Option<String>,
    },
}

/// Parse one line, e.g. `BOOK room-1 1767776400000 1767780000000`.
///
/// Keywords are case-insensitive. A lone `-` marks an absent argument so that
/// the engine's own validation decides what is missing.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Err(CommandError::Empty);
    };
    let args: Vec<&str> = words.collect();
    let keyword = keyword.to_ascii_uppercase();

    match keyword.as_str() {
        "ROOMS" => {
            expect_arity("ROOMS", &args, 0)?;
            Ok(Command::Rooms)
        }
        "BOOK" => {
            expect_arity("BOOK", &args, 3)?;
            Ok(Command::Book {
                room_id: optional(args[0]).map(str::to_string),
                start: parse_ms(args[1])?,
                end: parse_ms(args[2])?,
            })
        }
        "AVAILABLE" => {
            expect_arity("AVAILABLE", &args, 2)?;
            Ok(Command::Available {
                start: parse_ms(args[0])?,
                end: parse_ms(args[1])?,
            })
        }
        "FREE" => {
            expect_arity("FREE", &args, 3)?;
            Ok(Command::Free {
                room_id: required("FREE", args[0])?,
                start: parse_ms(args[1])?,
                end: parse_ms(args[2])?,
            })
        }
        "CANCEL" => {
            expect_arity("CANCEL", &args, 1)?;
            Ok(Command::Cancel {
                booking_id: optional(args[0]).map(str::to_string),
            })
        }
        "BOOKINGS" => {
            expect_arity("BOOKINGS", &args, 1)?;
            Ok(Command::Bookings {
                room_id: required("BOOKINGS", args[0])?,
            })
        }
        "SHOW" => {
            expect_arity("SHOW", &args, 1)?;
            Ok(Command::Show {
                booking_id: optional(args[0]).map(str::to_string),
            })
        }
        _ => Err(CommandError::Unknown(keyword)),
    }
}

fn expect_arity(cmd: &'static str, args: &[&str], expected: usize) -> Result<(), CommandError> {
    if args.len() != expected {
        return Err(CommandError::WrongArity(cmd, expected, args.len()));
    }
    Ok(())
}

fn optional(word: &str) -> Option<&str> {
    (word != "-").then_some(word)
}

fn required(cmd: &'static str, word: &str) -> Result<String, CommandError> {
    optional(word)
        .map(str::to_string)
        .ok_or(CommandError::MissingArgument(cmd))
}

fn parse_ms(word: &str) -> Result<Option<Ms>, CommandError> {
    optional(word)
        .map(|w| {
            w.parse::<Ms>()
                .map_err(|e| CommandError::Parse(format!("bad timestamp {w:?}: {e}")))
        })
        .transpose()
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    WrongArity(&'static str, usize, usize),
    MissingArgument(&'static str),
    Parse(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(k) => write!(f, "unknown command: {k}"),
            CommandError::WrongArity(cmd, expected, got) => {
                write!(f, "{cmd}: expected {expected} arguments, got {got}")
            }
            CommandError::MissingArgument(cmd) => write!(f, "{cmd}: room id is required"),
            CommandError::Parse(s) => write!(f, "parse error: {s}"),
        }
    }
}

impl std::error::Error for CommandError {}
