//! Criterion benchmarks measure time of the clearly separated pieces of code.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use havannah::environment::Rules;
use havannah::game::position::Position;
use havannah::game::rules::Havannah;
use havannah::search::{Agent, Config};
use havannah::Player;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Positions reached by random play from the empty board, one per dimension.
fn midgame_positions() -> Vec<Position> {
    let mut rng = StdRng::seed_from_u64(42);
    [4, 6, 8]
        .into_iter()
        .map(|dimension| {
            let mut position = Position::empty(dimension).unwrap();
            let mut player = Player::One;
            for _ in 0..usize::from(dimension) * 3 {
                let moves = Havannah.legal_moves(&position);
                let next_move = *moves.choose(&mut rng).unwrap();
                let next = Havannah.apply_move(&position, next_move, player).unwrap();
                if Havannah.check_win(&next, next_move, player).is_some() {
                    break;
                }
                position = next;
                player = !player;
            }
            position
        })
        .collect()
}

fn win_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("Win detection");
    for position in midgame_positions() {
        let player = position.side_to_move();
        let _ = group.bench_with_input(
            BenchmarkId::new("all moves", format!("dimension {}", position.dimension())),
            &position,
            |b, position| {
                b.iter(|| {
                    for next_move in Havannah.legal_moves(position) {
                        let next = Havannah.apply_move(position, next_move, player).unwrap();
                        let _ = criterion::black_box(Havannah.check_win(&next, next_move, player));
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = rules;
    config = Criterion::default().sample_size(50);
    targets = win_detection
}

fn search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Search");
    for dimension in [4, 6] {
        let position = Position::empty(dimension).unwrap();
        let _ = group.bench_with_input(
            BenchmarkId::new("500 simulations", format!("dimension {dimension}")),
            &position,
            |b, position| {
                b.iter(|| {
                    let mut agent = Agent::new(Player::One, Config::default().with_seed(1));
                    criterion::black_box(agent.choose_move(position))
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = mcts;
    config = Criterion::default().sample_size(10);
    targets = search
}

criterion_main!(rules, mcts);
