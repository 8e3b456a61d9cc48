use criterion::{criterion_group, criterion_main, Criterion};
use quarto::game::{Agent, RandomAgent};
use quarto::{is_game_over_key, GameState, NegamaxEngine, PositionKey, SearchConfig, TranspositionTable};
use std::hint::black_box;

/// Posições de várias densidades, obtidas com jogadas aleatórias semeadas
fn corpus() -> Vec<GameState> {
    let mut states = Vec::new();
    for seed in 0..8u64 {
        let mut agent = RandomAgent::with_seed(seed);
        let mut state = GameState::new();
        let first = agent.choose_first_piece(&state);
        if state.choose_first_piece(first).is_err() {
            continue;
        }
        for _ in 0..(seed as usize + 2) {
            let mv = agent.choose_move(&state);
            if state.apply_move(mv).is_err() || state.is_game_over() {
                break;
            }
            states.push(state);
        }
    }
    states.retain(|s| !s.is_game_over());
    states
}

fn bench_codec(c: &mut Criterion) {
    let keys: Vec<PositionKey> = corpus().iter().map(|s| s.key()).collect();

    c.bench_function("codec/is_game_over_key", |bch| {
        bch.iter(|| {
            let mut acc = 0u32;
            for &key in &keys {
                acc += is_game_over_key(key) as u32;
            }
            black_box(acc)
        })
    });

    c.bench_function("codec/successor", |bch| {
        bch.iter(|| {
            let mut acc = 0u128;
            for &key in &keys {
                acc ^= key.successor(black_box(7), black_box(3)).raw();
            }
            black_box(acc)
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let states = corpus();

    c.bench_function("search/depth3_window32", |bch| {
        let mut engine = NegamaxEngine::new(SearchConfig::new(3, 32));
        bch.iter(|| {
            let mut nodes = 0u64;
            for state in &states {
                nodes += engine.search(state).nodes_searched;
            }
            black_box(nodes)
        })
    });

    c.bench_function("search/depth2_full_width", |bch| {
        let mut engine = NegamaxEngine::new(SearchConfig::full_width(2));
        bch.iter(|| {
            let mut acc = 0i32;
            for state in &states {
                acc += engine.search(state).score;
            }
            black_box(acc)
        })
    });

    c.bench_function("search/depth3_cached", |bch| {
        let mut engine = NegamaxEngine::with_table(SearchConfig::new(3, 32), TranspositionTable::new("bench"));
        bch.iter(|| {
            let mut acc = 0u64;
            for state in &states {
                acc += engine.search(state).nodes_searched;
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_codec, bench_search);
criterion_main!(benches);
