//! Commands of the line-based text protocol the engine speaks.

use anyhow::{bail, Context};

use crate::game::core::Move;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// Handshake, answered with the engine identity.
    Htp,
    IsReady,
    /// Starts a new game, optionally on a board of a different dimension.
    NewGame {
        dimension: Option<u8>,
    },
    SetPosition {
        notation: String,
    },
    Play {
        cell: Move,
    },
    Go,
    SetOption {
        option: EngineOption,
        value: u64,
    },
    /// Prints the board.
    Display,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum EngineOption {
    Simulations,
    Seed,
}

fn parse_newgame(parts: &[&str]) -> anyhow::Result<Command> {
    let dimension = match parts {
        [] => None,
        [dimension] => Some(
            dimension
                .parse::<u8>()
                .with_context(|| format!("newgame: invalid dimension '{dimension}'"))?,
        ),
        _ => bail!("newgame: expected at most one argument, got '{}'", parts.join(" ")),
    };
    Ok(Command::NewGame { dimension })
}

fn parse_setoption(parts: &[&str]) -> anyhow::Result<Command> {
    let [name_token, name, value_token, value] = parts else {
        bail!("setoption: expected `name <option> value <number>`, got '{}'", parts.join(" "));
    };
    if *name_token != "name" || *value_token != "value" {
        bail!("setoption: expected `name <option> value <number>`, got '{}'", parts.join(" "));
    }
    let option = match *name {
        "Simulations" => EngineOption::Simulations,
        "Seed" => EngineOption::Seed,
        _ => bail!("setoption: unsupported option '{name}'"),
    };
    let value = value
        .parse::<u64>()
        .with_context(|| format!("setoption: invalid value '{value}' of {name}"))?;
    Ok(Command::SetOption { option, value })
}

impl Command {
    /// Parses a single input line. Unrecognized commands are not an error and
    /// come back as [`Command::Unknown`], malformed arguments of known ones
    /// are.
    pub(super) fn parse(input: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, arguments)) = parts.split_first() else {
            return Ok(Self::Unknown(input.to_string()));
        };
        let command = match command {
            "htp" => Self::Htp,
            "isready" => Self::IsReady,
            "newgame" => parse_newgame(arguments)?,
            "position" if !arguments.is_empty() => Self::SetPosition {
                notation: arguments.join(""),
            },
            "position" => bail!("position: missing board notation"),
            "play" => match arguments {
                [cell] => Self::Play {
                    cell: Move::try_from(*cell).context("play")?,
                },
                _ => bail!("play: expected a single `<row>,<column>` cell"),
            },
            "go" => Self::Go,
            "setoption" => parse_setoption(arguments)?,
            "d" => Self::Display,
            "quit" => Self::Quit,
            _ => Self::Unknown(input.trim().to_string()),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(Command::parse("htp").unwrap(), Command::Htp);
        assert_eq!(Command::parse("isready\n").unwrap(), Command::IsReady);
        assert_eq!(Command::parse("  go ").unwrap(), Command::Go);
        assert_eq!(Command::parse("d").unwrap(), Command::Display);
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_newgame() {
        assert_eq!(
            Command::parse("newgame").unwrap(),
            Command::NewGame { dimension: None }
        );
        assert_eq!(
            Command::parse("newgame 6").unwrap(),
            Command::NewGame { dimension: Some(6) }
        );
        assert!(Command::parse("newgame six").is_err());
        assert!(Command::parse("newgame 6 7").is_err());
    }

    #[test]
    fn parse_position() {
        assert_eq!(
            Command::parse("position 1.-/.2./-..").unwrap(),
            Command::SetPosition {
                notation: "1.-/.2./-..".to_string()
            }
        );
        assert!(Command::parse("position").is_err());
    }

    #[test]
    fn parse_play() {
        assert_eq!(
            Command::parse("play 3,4").unwrap(),
            Command::Play {
                cell: Move::new(3, 4)
            }
        );
        assert!(Command::parse("play").is_err());
        assert!(Command::parse("play 3").is_err());
        assert!(Command::parse("play 3,4 5,6").is_err());
    }

    #[test]
    fn parse_setoption() {
        assert_eq!(
            Command::parse("setoption name Simulations value 100").unwrap(),
            Command::SetOption {
                option: EngineOption::Simulations,
                value: 100
            }
        );
        assert_eq!(
            Command::parse("setoption name Seed value 42").unwrap(),
            Command::SetOption {
                option: EngineOption::Seed,
                value: 42
            }
        );
        assert!(Command::parse("setoption name Hash value 16").is_err());
        assert!(Command::parse("setoption name Seed value -1").is_err());
        assert!(Command::parse("setoption name Seed").is_err());
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            Command::parse("uci").unwrap(),
            Command::Unknown("uci".to_string())
        );
        assert_eq!(Command::parse("").unwrap(), Command::Unknown(String::new()));
    }
}
