//! Command parsing
//!
//! Parses REPL input into structured Command enums.
//! Commands use `/` prefix (e.g., `/help`, `/quit`).

use crate::error::{CommandError, CommandResult};

/// Commands that can be entered at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List tables in the public schema
    Tables,

    /// List non-template databases
    Databases,

    /// Show the first rows of a table
    Preview(String),

    /// Show completion candidates with the cursor at the end of the text
    Complete(String),

    /// Show help
    Help,

    /// Quit the application
    Quit,
}

/// Parse a command string into a Command enum
///
/// Leading whitespace is ignored. The argument of `/complete` is kept
/// verbatim, trailing spaces included, since they move the cursor.
pub fn parse_command(input: &str) -> CommandResult<Command> {
    let input = input.trim_start();
    // Strip optional / or : prefix
    let input = input
        .strip_prefix('/')
        .or_else(|| input.strip_prefix(':'))
        .unwrap_or(input);

    let (name, rest) = match input.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest),
        None => (input, ""),
    };

    if name.trim().is_empty() {
        return Err(CommandError::Unknown(String::new()));
    }

    match name {
        "tables" | "dt" => Ok(Command::Tables),
        "databases" | "l" => Ok(Command::Databases),
        "preview" | "p" => match rest.trim() {
            "" => Err(CommandError::MissingArgument(name.to_string())),
            table => Ok(Command::Preview(table.to_string())),
        },
        "complete" | "c" => Ok(Command::Complete(rest.to_string())),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        unknown => Err(CommandError::Unknown(unknown.to_string())),
    }
}

/// Help text listing the commands
pub fn help_text() -> &'static str {
    "Enter SQL to run it, or a command:\n\
     \x20 /tables            list tables in the public schema\n\
     \x20 /databases         list databases\n\
     \x20 /preview <table>   show the first 100 rows of a table\n\
     \x20 /complete <text>   show completions for <text>\n\
     \x20 /help              show this help\n\
     \x20 /quit              exit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tables() {
        assert_eq!(parse_command("/tables").unwrap(), Command::Tables);
        assert_eq!(parse_command("/dt").unwrap(), Command::Tables);
    }

    #[test]
    fn test_parse_databases() {
        assert_eq!(parse_command("/databases").unwrap(), Command::Databases);
        assert_eq!(parse_command("/l").unwrap(), Command::Databases);
    }

    #[test]
    fn test_parse_preview() {
        assert_eq!(
            parse_command("/preview users").unwrap(),
            Command::Preview("users".to_string())
        );
        assert_eq!(
            parse_command("/p  orders  ").unwrap(),
            Command::Preview("orders".to_string())
        );
    }

    #[test]
    fn test_parse_preview_keeps_spaces_in_name() {
        assert_eq!(
            parse_command("/preview Order Items ").unwrap(),
            Command::Preview("Order Items".to_string())
        );
    }

    #[test]
    fn test_parse_preview_missing_table() {
        let result = parse_command("/preview");
        assert!(matches!(result, Err(CommandError::MissingArgument(ref c)) if c == "preview"));
    }

    #[test]
    fn test_parse_complete_keeps_trailing_space() {
        assert_eq!(
            parse_command("/complete SELECT * FROM ").unwrap(),
            Command::Complete("SELECT * FROM ".to_string())
        );
    }

    #[test]
    fn test_parse_complete_empty() {
        assert_eq!(
            parse_command("/complete").unwrap(),
            Command::Complete(String::new())
        );
    }

    #[test]
    fn test_parse_quit_variants() {
        assert_eq!(parse_command("/quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("/q").unwrap(), Command::Quit);
        assert_eq!(parse_command("/exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(parse_command("/help").unwrap(), Command::Help);
        assert_eq!(parse_command("/h").unwrap(), Command::Help);
        assert_eq!(parse_command("/?").unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_unknown_command() {
        let result = parse_command("/foobar");
        assert!(matches!(result, Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_parse_empty_command() {
        assert!(matches!(parse_command("/"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_parse_without_prefix() {
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_colon_prefix_still_works() {
        assert_eq!(parse_command(":quit").unwrap(), Command::Quit);
        assert_eq!(parse_command(":help").unwrap(), Command::Help);
    }
}
