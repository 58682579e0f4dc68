//! User command parsing.
//!
//! Commands are single lines: a verb followed by an optional argument.
//! Parsing is independent of how the line was read, so the terminal driver
//! and the simulation feed the same parser.

use std::fmt;

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `create`
    Create,
    /// `join [match-id]`
    Join(Option<String>),
    /// `ready`
    Ready,
    /// `start`
    Start,
    /// `move <notation>`
    Move(String),
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Why a line is not a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line.
    Empty,
    /// First word is not a known verb.
    Unknown(String),
    /// Verb needs an argument.
    MissingArgument(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty command"),
            Self::Unknown(verb) => write!(f, "unknown command: {verb} (try help)"),
            Self::MissingArgument(verb) => write!(f, "{verb} needs an argument"),
        }
    }
}

/// Usage text for `help`.
pub const HELP: &str =
    "commands: create | join [match-id] | ready | start | move <R|R'|L|L'|U|U'|D|D'|F|F'|B|B'> | help | quit";

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(ParseError::Empty),
            "create" => Ok(Self::Create),
            "join" => Ok(Self::Join(arg)),
            "ready" => Ok(Self::Ready),
            "start" => Ok(Self::Start),
            "move" | "m" => arg.map(Self::Move).ok_or(ParseError::MissingArgument("move")),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(ParseError::Unknown(verb.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verbs() {
        assert_eq!(Command::parse("create"), Ok(Command::Create));
        assert_eq!(Command::parse("  READY "), Ok(Command::Ready));
        assert_eq!(Command::parse("join"), Ok(Command::Join(None)));
        assert_eq!(Command::parse("join  m1 "), Ok(Command::Join(Some("m1".into()))));
        assert_eq!(Command::parse("move U'"), Ok(Command::Move("U'".into())));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert_eq!(Command::parse("move"), Err(ParseError::MissingArgument("move")));
        assert_eq!(Command::parse("dance now"), Err(ParseError::Unknown("dance".into())));
    }
}
