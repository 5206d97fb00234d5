//! Move selection for a Havannah player: a few tactical checks followed by
//! [Monte Carlo Tree Search] (MCTS) with [RAVE] statistics.
//!
//! The [`Agent`] owns all search state. Its [`Statistics`] survive across
//! moves and games, so each search builds on the experience of the previous
//! ones.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search
//! [RAVE]: https://www.chessprogramming.org/Rapid_Action_Value_Estimation

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::environment::{Player, Rules};
use crate::game::core::Move;
use crate::game::position::Position;
use crate::game::rules::Havannah;

mod config;
mod mcts;
mod policy;
mod state;
mod stats;
mod tactics;

pub use config::Config;
pub use stats::{NodeStats, StatKey, Statistics};

use self::mcts::Mcts;

/// What settled the chosen move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The move wins on the spot.
    ImmediateWin,
    /// The opponent would win with this move next turn.
    Block,
    /// The move completes an opponent's fork triad on a dimension-6 board.
    ForkDefense,
    /// Best average outcome of the Monte Carlo simulations.
    Search,
    /// No legal move was left to choose from.
    Fallback,
}

/// Outcome of [`Agent::search`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    #[allow(missing_docs)]
    pub best_move: Move,
    #[allow(missing_docs)]
    pub decision: Decision,
    /// Number of simulations that were completed and backpropagated.
    pub simulations: u32,
}

/// Plays moves on behalf of a fixed player.
#[derive(Debug)]
pub struct Agent<R: Rules = Havannah> {
    player: Player,
    rules: R,
    config: Config,
    statistics: Statistics,
    rng: StdRng,
}

impl Agent<Havannah> {
    /// Creates an agent playing by the standard Havannah rules.
    #[must_use]
    pub fn new(player: Player, config: Config) -> Self {
        Self::with_rules(player, Havannah, config)
    }
}

impl<R: Rules> Agent<R> {
    /// Creates an agent with custom game rules. The random number generator
    /// is seeded from [`Config::seed`] if present.
    #[must_use]
    pub fn with_rules(player: Player, rules: R, config: Config) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            player,
            rules,
            config,
            statistics: Statistics::new(),
            rng,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn player(&self) -> Player {
        self.player
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Statistics accumulated over all searches of this agent.
    #[must_use]
    pub const fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Returns the move to play in `position`.
    pub fn choose_move(&mut self, position: &Position) -> Move {
        self.search(position).best_move
    }

    /// Picks the move to play in `position` with the agent to move.
    ///
    /// Tactical checks come first: a winning move, then a block of the
    /// opponent's winning move, then the fork triad defense. Only if none of
    /// them applies the Monte Carlo search runs. The result is always a legal
    /// move unless the board is full, in which case the first cell is
    /// returned with [`Decision::Fallback`].
    pub fn search(&mut self, position: &Position) -> SearchResult {
        let moves = self.rules.legal_moves(position);
        if moves.is_empty() {
            warn!(player = %self.player, "No legal moves left");
            return SearchResult {
                best_move: Move::default(),
                decision: Decision::Fallback,
                simulations: 0,
            };
        }
        if let Some((best_move, decision)) =
            tactics::pre_filter(&self.rules, position, &moves, self.player)
        {
            debug!(player = %self.player, %best_move, ?decision, "Tactical move");
            return SearchResult {
                best_move,
                decision,
                simulations: 0,
            };
        }

        let mut mcts = Mcts::new(
            &self.rules,
            &mut self.statistics,
            &self.config,
            &mut self.rng,
            self.player,
        );
        let best_move = mcts.run(position, &moves);
        let simulations = mcts.completed();
        let (best_move, decision) = match best_move {
            Some(best_move) => (best_move, Decision::Search),
            None => {
                warn!(player = %self.player, "Search did not produce a move");
                (moves[0], Decision::Fallback)
            },
        };
        debug!(
            player = %self.player,
            %best_move,
            ?decision,
            simulations,
            known_pairs = self.statistics.len(),
            "Search finished"
        );
        SearchResult {
            best_move,
            decision,
            simulations,
        }
    }
}
