//! Havannah playing engine built on Monte Carlo Tree Search with RAVE
//! statistics.
//!
//! - [`game`] implements the board geometry and the winning conditions.
//! - [`search`] picks moves: tactical checks first, then MCTS.
//! - [`Engine`] drives both over a line-based text protocol.
//!
//! ```
//! use havannah::game::position::Position;
//! use havannah::search::{Agent, Config};
//! use havannah::Player;
//!
//! let position = Position::empty(4).unwrap();
//! let mut agent = Agent::new(Player::One, Config::default().with_simulations(50));
//! let best_move = agent.choose_move(&position);
//! assert!(position.is_empty_cell(best_move));
//! ```

pub mod environment;
pub mod game;
pub mod search;

mod engine;
pub use engine::{Engine, DEFAULT_DIMENSION};
pub use environment::{Player, Rules};
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Logs the engine version and the build type on startup.
pub fn log_build_info() {
    tracing::info!(
        version = %engine_version(),
        release = !shadow_rs::is_debug(),
        "Havannah engine"
    );
    if !shadow_rs::git_clean() {
        tracing::warn!("Built with uncommitted changes");
    }
}
