//! Benchmarks for whole-game playtests and per-action costs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use life_cards::actions::{ActionPayload, ActionProcessor, DRAW_CARDS};
use life_cards::core::{Difficulty, GameConfig};
use life_cards::game::Game;
use life_cards::playtest::{PlaytestConfig, PlaytestRunner};

fn bench_playtest(c: &mut Criterion) {
    let mut group = c.benchmark_group("playtest");

    for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
        let config = PlaytestConfig::new()
            .with_games(10)
            .with_game_config(GameConfig::default().with_difficulty(difficulty));
        let runner = PlaytestRunner::new(config);

        group.bench_with_input(
            BenchmarkId::new("ten_games", format!("{:?}", difficulty)),
            &runner,
            |b, runner| b.iter(|| black_box(runner.run())),
        );
    }

    group.finish();
}

fn bench_actions(c: &mut Criterion) {
    let game = Game::new(GameConfig::default()).unwrap();
    let processor = ActionProcessor::new();

    c.bench_function("draw_one", |b| {
        b.iter(|| {
            let mut game = game.clone();
            black_box(processor.execute(DRAW_CARDS, &mut game, ActionPayload::Count(1)))
        })
    });

    c.bench_function("game_clone", |b| b.iter(|| black_box(game.clone())));

    c.bench_function("snapshot_bytes", |b| {
        b.iter(|| black_box(game.snapshot().to_bytes()))
    });
}

criterion_group!(benches, bench_playtest, bench_actions);
criterion_main!(benches);
