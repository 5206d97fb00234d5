//! The engine puts all pieces together: it keeps the game state, owns one
//! search [`Agent`] per player and talks to the client (a referee, a match
//! runner or a human) over a simple line-based text protocol.
//!
//! [`Engine::protocol_loop`] is the "main loop" of the engine which reads
//! commands from the input stream and writes responses to the output stream.

use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use tracing::{debug, info};

use crate::engine::protocol::{Command, EngineOption};
use crate::environment::{Player, Rules};
use crate::game::core::{Move, MAX_DIMENSION, MIN_DIMENSION};
use crate::game::position::Position;
use crate::game::rules::{Havannah, Win};
use crate::search::{Agent, Config};

mod protocol;

/// Board dimension of a game started without an explicit one.
pub const DEFAULT_DIMENSION: u8 = 6;

/// The Engine connects everything together and handles the commands sent by
/// the client, including I/O.
pub struct Engine<'a, R: BufRead, W: Write> {
    position: Position,
    /// Set once somebody completed a winning structure.
    result: Option<(Player, Win)>,
    config: Config,
    agents: [Agent; 2],
    input: &'a mut R,
    output: &'a mut W,
}

/// Agents of both players get distinct random streams even when seeded.
fn agents(config: &Config) -> [Agent; 2] {
    let second = Config {
        seed: config.seed.map(|seed| seed.wrapping_add(1)),
        ..config.clone()
    };
    [
        Agent::new(Player::One, config.clone()),
        Agent::new(Player::Two, second),
    ]
}

const fn agent_index(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => 1,
    }
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine with an empty board of
    /// [`DEFAULT_DIMENSION`] and provided I/O.
    pub fn new(config: Config, input: &'a mut R, output: &'a mut W) -> anyhow::Result<Self> {
        Ok(Self {
            position: Position::empty(DEFAULT_DIMENSION)?,
            result: None,
            agents: agents(&config),
            config,
            input,
            output,
        })
    }
}

impl<R: BufRead, W: Write> Engine<'_, R, W> {
    /// Continuously reads the input stream and executes the commands until
    /// "quit" is sent or the input is closed.
    ///
    /// Malformed commands are reported with an `info string` line and
    /// skipped, only I/O failures stop the loop with an error.
    pub fn protocol_loop(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            // EOF reached.
            if self
                .input
                .read_line(&mut line)
                .context("failed to read from input")?
                == 0
            {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            debug!(command = line.trim(), "Received");
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(error) => {
                    writeln!(self.output, "info string {error:#}")?;
                    continue;
                },
            };
            match command {
                Command::Htp => self.handle_htp()?,
                Command::IsReady => writeln!(self.output, "readyok")?,
                Command::NewGame { dimension } => self.handle_newgame(dimension)?,
                Command::SetPosition { notation } => self.handle_position(&notation)?,
                Command::Play { cell } => self.handle_play(cell)?,
                Command::Go => self.handle_go()?,
                Command::SetOption { option, value } => self.handle_setoption(&option, value)?,
                Command::Display => write!(self.output, "{:?}", self.position)?,
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(self.output, "info string Unsupported command: {command}")?;
                },
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Responds to the `htp` handshake command by identifying the engine.
    fn handle_htp(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(self.output, "htpok")?;
        Ok(())
    }

    /// Starts a new game. The agents keep their statistics.
    fn handle_newgame(&mut self, dimension: Option<u8>) -> anyhow::Result<()> {
        let dimension = dimension.unwrap_or_else(|| self.position.dimension());
        match Position::empty(dimension) {
            Ok(position) => {
                info!(dimension, "New game");
                self.position = position;
                self.result = None;
            },
            Err(error) => writeln!(
                self.output,
                "info string {error:#} (supported: {MIN_DIMENSION}..={MAX_DIMENSION})"
            )?,
        }
        Ok(())
    }

    /// Replaces the board with the one given in text notation.
    fn handle_position(&mut self, notation: &str) -> anyhow::Result<()> {
        match Position::try_from(notation) {
            Ok(position) => {
                self.position = position;
                self.result = None;
            },
            Err(error) => writeln!(self.output, "info string {error:#}")?,
        }
        Ok(())
    }

    /// The side to move claims the cell.
    fn handle_play(&mut self, cell: Move) -> anyhow::Result<()> {
        if let Err(error) = self.make_move(cell) {
            writeln!(self.output, "info string {error:#}")?;
        }
        Ok(())
    }

    /// Searches for the best move of the side to move, reports and plays it.
    fn handle_go(&mut self) -> anyhow::Result<()> {
        if let Some((winner, win)) = self.result {
            writeln!(
                self.output,
                "info string Game is over: player {winner} won by {win}"
            )?;
            return Ok(());
        }
        let player = self.position.side_to_move();
        let agent = &mut self.agents[agent_index(player)];
        let result = agent.search(&self.position);
        writeln!(
            self.output,
            "info player {player} decision {:?} simulations {} statistics {}",
            result.decision,
            result.simulations,
            agent.statistics().len()
        )?;
        writeln!(self.output, "bestmove {}", result.best_move)?;
        if let Err(error) = self.make_move(result.best_move) {
            writeln!(self.output, "info string {error:#}")?;
        }
        Ok(())
    }

    /// Changes the search parameters. Both agents are recreated, which drops
    /// the statistics they accumulated.
    fn handle_setoption(&mut self, option: &EngineOption, value: u64) -> anyhow::Result<()> {
        match option {
            EngineOption::Simulations => match u32::try_from(value) {
                Ok(simulations) => self.config.simulations = simulations,
                Err(_) => {
                    writeln!(
                        self.output,
                        "info string Simulations should fit into 32 bits, got {value}"
                    )?;
                    return Ok(());
                },
            },
            EngineOption::Seed => self.config.seed = Some(value),
        }
        info!(?option, value, "Search options changed, resetting agents");
        self.agents = agents(&self.config);
        Ok(())
    }

    /// Plays `cell` for the side to move and records the game result.
    fn make_move(&mut self, cell: Move) -> anyhow::Result<()> {
        if let Some((winner, win)) = self.result {
            bail!("game is over: player {winner} won by {win}");
        }
        let player = self.position.side_to_move();
        self.position = Havannah.apply_move(&self.position, cell, player)?;
        if let Some(win) = Havannah.check_win(&self.position, cell, player) {
            info!(%player, %win, "Game over");
            writeln!(self.output, "info string Player {player} wins by {win}")?;
            self.result = Some((player, win));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(config: Config, commands: &str) -> String {
        let mut input = commands.as_bytes();
        let mut output = Vec::new();
        Engine::new(config, &mut input, &mut output)
            .unwrap()
            .protocol_loop()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn handshake() {
        let output = run(Config::default(), "htp\nisready\nquit\nisready\n");
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("id name havannah"));
        assert_eq!(lines[2..], ["htpok", "readyok"]);
    }

    #[test]
    fn malformed_input_is_reported() {
        let output = run(
            Config::default(),
            "uci\nplay x,y\nnewgame 42\nposition 1\nplay 0,0\nplay 0,0\n",
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.starts_with("info string")));
        assert_eq!(lines[0], "info string Unsupported command: uci");
    }

    #[test]
    fn go_plays_the_move() {
        let config = Config::default().with_simulations(20).with_seed(1);
        let output = run(config, "newgame 3\ngo\ngo\nd\n");
        let moves: Vec<Move> = output
            .lines()
            .filter_map(|line| line.strip_prefix("bestmove "))
            .map(|cell| Move::try_from(cell).unwrap())
            .collect();
        assert_eq!(moves.len(), 2);
        assert_ne!(moves[0], moves[1]);
        assert!(output.contains("info player 1 decision"));
        assert!(output.contains("info player 2 decision"));
        assert!(output.contains("Side to move: 1"));
    }

    #[test]
    fn game_over() {
        let output = run(
            Config::default(),
            "newgame 2\nplay 0,0\nplay 0,1\nplay 1,1\nplay 2,1\nplay 0,2\ngo\nplay 1,0\n",
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "info string Player 1 wins by bridge",
                "info string Game is over: player 1 won by bridge",
                "info string game is over: player 1 won by bridge",
            ]
        );
    }

    #[test]
    fn setoption_resets_agents() {
        let commands = concat!(
            "setoption name Simulations value 10\n",
            "setoption name Seed value 3\n",
            "newgame 3\n",
            "go\n",
        );
        let first = run(Config::default(), commands);
        let second = run(Config::default(), commands);
        assert_eq!(first, second);
        assert!(first.contains("simulations 10"));
    }
}
