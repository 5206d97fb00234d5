use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{trace, warn};

use crate::environment::{Player, Rules};
use crate::game::core::Move;
use crate::game::position::Position;
use crate::search::config::Config;
use crate::search::state::{ExpansionLedger, Path};
use crate::search::stats::{NodeStats, StatKey, Statistics};
use crate::search::{policy, tactics};

/// Result of a random playout.
#[derive(Debug)]
struct Playout {
    winner: Player,
    /// (position before the move, move) for every move of the playout. Empty
    /// unless the playout ended with a win.
    steps: Vec<StatKey>,
}

/// A single top-level search on behalf of `agent`.
///
/// 1. Selection: descend from the root through positions expanded earlier
///    in this search, picking moves with [`policy::select`].
/// 2. Expansion: play a random move from the first position that was not
///    expanded yet.
/// 3. Simulation: play random moves until somebody wins or the board is full.
/// 4. Backpropagation: credit the in-tree path with the outcome and the
///    playout moves with RAVE visits.
///
/// Statistics are shared with the previous searches of the agent, the
/// expansion ledger is not.
pub(super) struct Mcts<'a, R: Rules> {
    rules: &'a R,
    statistics: &'a mut Statistics,
    config: &'a Config,
    rng: &'a mut StdRng,
    agent: Player,
    ledger: ExpansionLedger,
    completed: u32,
}

impl<'a, R: Rules> Mcts<'a, R> {
    pub(super) fn new(
        rules: &'a R,
        statistics: &'a mut Statistics,
        config: &'a Config,
        rng: &'a mut StdRng,
        agent: Player,
    ) -> Self {
        Self {
            rules,
            statistics,
            config,
            rng,
            agent,
            ledger: ExpansionLedger::new(),
            completed: 0,
        }
    }
}

impl<R: Rules> Mcts<'_, R> {
    /// Number of simulations that finished and were backpropagated.
    #[must_use]
    pub(super) const fn completed(&self) -> u32 {
        self.completed
    }

    /// Runs [`Config::simulations`] simulations from `root` and returns the
    /// move with the best average outcome. `moves` are the legal moves in
    /// `root` with the agent to move.
    pub(super) fn run(&mut self, root: &Position, moves: &[Move]) -> Option<Move> {
        if let Some(next_move) = tactics::winning_move(self.rules, root, moves, self.agent) {
            return Some(next_move);
        }
        if let Some(next_move) = tactics::winning_move(self.rules, root, moves, !self.agent) {
            return Some(next_move);
        }
        for round in 0..self.config.simulations {
            if let Err(error) = self.simulate(root, moves) {
                warn!(round, ?error, "Skipping failed simulation");
            }
        }
        best_move(self.statistics, root, moves)
    }

    /// One selection-expansion-rollout round. Statistics are only updated
    /// once all the moves of the round were played successfully.
    fn simulate(&mut self, root: &Position, root_moves: &[Move]) -> anyhow::Result<()> {
        let mut path = Path::new();
        let mut current = root.clone();
        let mut moves = root_moves.to_vec();
        let mut mover = self.agent;
        let mut winner = None;
        let mut playout_steps = Vec::new();

        while !self.ledger.expand(&current) {
            let Some(next_move) = self.select_move(&current, &moves, mover) else {
                break;
            };
            path.push(&current, next_move);
            current = self.rules.apply_move(&current, next_move, mover)?;
            if self.rules.check_win(&current, next_move, mover).is_some() {
                winner = Some(mover);
                break;
            }
            moves = self.rules.legal_moves(&current);
            mover = !mover;
        }

        if winner.is_none() {
            let moves = self.rules.legal_moves(&current);
            if let Some(&next_move) = moves.choose(self.rng) {
                path.push(&current, next_move);
                current = self.rules.apply_move(&current, next_move, mover)?;
                if self.rules.check_win(&current, next_move, mover).is_some() {
                    winner = Some(mover);
                } else {
                    let playout = self.rollout(current, !mover)?;
                    winner = Some(playout.winner);
                    playout_steps = playout.steps;
                }
            }
        }

        let credit = self.credit(winner, root.dimension());
        let agent_won = winner == Some(self.agent);
        for step in playout_steps {
            self.statistics.record_rave(step, agent_won);
        }
        let depth = path.len();
        for step in path.into_steps() {
            self.statistics.record_visit(step, credit);
        }
        self.completed += 1;
        trace!(
            depth,
            expanded = self.ledger.len(),
            winner = ?winner,
            credit,
            "Simulation finished"
        );
        Ok(())
    }

    /// Picks the in-tree move. A move that wins on the spot for the agent's
    /// opponent is always explored first, no matter who is to move.
    fn select_move(&mut self, position: &Position, moves: &[Move], mover: Player) -> Option<Move> {
        if let Some(threat) = tactics::winning_move(self.rules, position, moves, !self.agent) {
            return Some(threat);
        }
        policy::select(
            self.statistics,
            self.config,
            position,
            moves,
            mover == self.agent,
            self.rng,
        )
    }

    /// Plays uniformly random moves starting with `mover` until a win or a
    /// full board. On a full board the player who moved last wins, but the
    /// playout moves are not reported for RAVE credit.
    fn rollout(&mut self, mut position: Position, mut mover: Player) -> anyhow::Result<Playout> {
        let mut steps = Vec::new();
        loop {
            let moves = self.rules.legal_moves(&position);
            let Some(&next_move) = moves.choose(self.rng) else {
                return Ok(Playout {
                    winner: !mover,
                    steps: Vec::new(),
                });
            };
            let next = self.rules.apply_move(&position, next_move, mover)?;
            steps.push(StatKey::new(position, next_move));
            position = next;
            if self.rules.check_win(&position, next_move, mover).is_some() {
                return Ok(Playout {
                    winner: mover,
                    steps,
                });
            }
            mover = !mover;
        }
    }

    /// Outcome from the agent's point of view. Opponent wins are only
    /// penalized on small boards.
    fn credit(&self, winner: Option<Player>, dimension: u8) -> i32 {
        match winner {
            Some(player) if player == self.agent => 1,
            Some(_) if dimension <= self.config.penalty_dimension_limit => -1,
            _ => 0,
        }
    }
}

/// Average outcome of the pair, zero if it was never visited.
fn win_rate(stats: NodeStats) -> f64 {
    if stats.visits == 0 {
        return 0.0;
    }
    f64::from(stats.value) / f64::from(stats.visits)
}

/// The move with the highest [`win_rate`]; the first one wins ties.
fn best_move(statistics: &Statistics, root: &Position, moves: &[Move]) -> Option<Move> {
    let mut best: Option<(Move, f64)> = None;
    for &next_move in moves {
        let rate = win_rate(statistics.probe(root, next_move));
        if best.map_or(true, |(_, best_rate)| rate > best_rate) {
            best = Some((next_move, rate));
        }
    }
    best.map(|(next_move, _)| next_move)
}
