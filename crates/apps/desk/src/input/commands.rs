//! Command definitions and parsing for the desk prompt

use anyhow::{Context, Result, bail};
use support::TicketId;

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Buy(String),
    Open(TicketId),
    Send(String),
    Close,
    /// Simulate the window losing visibility (polling pauses)
    Hide,
    Show,
    Refresh,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "buy" => Command::Buy(required(rest, "buy <product>")?),
            "open" => {
                let id = required(rest, "open <ticket id>")?;
                let id = id
                    .trim_start_matches('#')
                    .parse::<u64>()
                    .with_context(|| format!("'{}' is not a ticket id", id))?;
                Command::Open(TicketId::new(id))
            }
            "send" => Command::Send(required(rest, "send <message>")?),
            "close" => Command::Close,
            "hide" => Command::Hide,
            "show" => Command::Show,
            "refresh" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("Unknown command '{}', type `help` for a list", other),
        };
        Ok(Some(command))
    }
}

fn required(arg: &str, usage: &str) -> Result<String> {
    if arg.is_empty() {
        bail!("Usage: {}", usage);
    }
    Ok(arg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("buy Desk Lamp").unwrap(),
            Some(Command::Buy("Desk Lamp".to_string()))
        );
        assert_eq!(
            Command::parse("  open #12 ").unwrap(),
            Some(Command::Open(TicketId::new(12)))
        );
        assert_eq!(
            Command::parse("send  is it  dimmable?").unwrap(),
            Some(Command::Send("is it  dimmable?".to_string()))
        );
        assert_eq!(Command::parse("CLOSE").unwrap(), Some(Command::Close));
        assert_eq!(Command::parse("?").unwrap(), Some(Command::Help));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_blank_line_is_ignored() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_missing_argument() {
        let err = Command::parse("send").unwrap_err();
        assert_eq!(err.to_string(), "Usage: send <message>");
    }

    #[test]
    fn test_bad_ticket_id() {
        assert!(Command::parse("open lamp").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::parse("archive 3").unwrap_err();
        assert!(err.to_string().contains("'archive'"));
    }
}
