//! Search configuration parameters.

/// Parameters of the MCTS+RAVE search.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of simulated playouts per search.
    pub simulations: u32,
    /// Exploration constant of the UCT formula.
    pub exploration: f64,
    /// RAVE equivalence parameter: the number of exact visits at which the
    /// RAVE estimate and the exact estimate get equal weight.
    pub rave_equivalence: f64,
    /// Whether RAVE estimates are blended into the selection score. The RAVE
    /// statistics are collected either way.
    pub rave_blending: bool,
    /// Opponent wins are only penalized on boards with dimension up to this
    /// limit, larger boards only credit the agent's own wins.
    pub penalty_dimension_limit: u8,
    /// Seed of the random number generator. `None` seeds from the OS entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulations: 500,
            exploration: 1.8,
            rave_equivalence: 50.0,
            rave_blending: false,
            penalty_dimension_limit: 5,
            seed: None,
        }
    }
}

impl Config {
    /// Builder pattern: set number of simulations.
    #[must_use]
    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.simulations = simulations;
        self
    }

    /// Builder pattern: fix the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder pattern: blend RAVE estimates into the selection score.
    #[must_use]
    pub fn with_rave_blending(mut self, enabled: bool) -> Self {
        self.rave_blending = enabled;
        self
    }
}
