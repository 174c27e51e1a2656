use thiserror::Error;

use std::str::FromStr;

/// Command list printed by `help`
pub const HELP: &str = "\
Valid commands:
    mine: discovers the nonce for a given transaction
    append: appends a new block onto the end of the chain
    remove: removes the last block from the end of the chain
    check: checks that the block chain is valid
    report: reports the balances of Alice and Bob
    export: prints the chain as JSON
    help: prints this list of commands
    quit: quits the program";

/// Errors that can occur while reading user input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (type \"help\" for the list of commands)")]
    UnknownCommand(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

/// A command understood by the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Mine,
    Append,
    Remove,
    Check,
    Report,
    Export,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mine" => Ok(Command::Mine),
            "append" => Ok(Command::Append),
            "remove" => Ok(Command::Remove),
            "check" => Ok(Command::Check),
            "report" => Ok(Command::Report),
            "export" => Ok(Command::Export),
            "help" => Ok(Command::Help),
            "quit" => Ok(Command::Quit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

/// Parses an amount or nonce typed by the user
pub fn parse_number<T: FromStr>(input: &str) -> Result<T, CommandError> {
    let input = input.trim();
    input
        .parse()
        .map_err(|_| CommandError::InvalidNumber(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("mine".parse(), Ok(Command::Mine));
        assert_eq!("  Append \n".parse(), Ok(Command::Append));
        assert_eq!("REMOVE".parse(), Ok(Command::Remove));
        assert_eq!("check".parse(), Ok(Command::Check));
        assert_eq!("report".parse(), Ok(Command::Report));
        assert_eq!("export".parse(), Ok(Command::Export));
        assert_eq!("help".parse(), Ok(Command::Help));
        assert_eq!("quit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            "transfer".parse::<Command>(),
            Err(CommandError::UnknownCommand("transfer".to_string()))
        );
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<i32>(" -50\n"), Ok(-50));
        assert_eq!(parse_number::<u64>("10072502"), Ok(10_072_502));
        assert_eq!(
            parse_number::<u64>("-1"),
            Err(CommandError::InvalidNumber("-1".to_string()))
        );
        assert_eq!(
            parse_number::<i32>("fifty"),
            Err(CommandError::InvalidNumber("fifty".to_string()))
        );
    }
}
