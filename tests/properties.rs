// Property tests: determinism, cache correctness and clear idempotence

use esostep::engine::TransitionCache;
use esostep::grid::{grid_move, Direction, Grid};
use esostep::lang::{Back, Language, Program, StunStep, Suffolk, Wii2d};
use proptest::prelude::*;
use proptest::sample::select;

const BACK_OPS: [char; 8] = ['\\', '/', '<', '>', '-', '+', '*', ' '];
const WII2D_OPS: [char; 14] = [
    '^', 'v', '<', '>', '|', '?', '@', '+', '-', '*', '/', '~', '3', ' ',
];

/// State after `steps` applications of the transition function
fn iterate<L: Language>(lang: &L, seed: &L::State, steps: usize) -> L::State {
    let mut state = seed.clone();
    for _ in 0..steps {
        state = lang.step(&state);
    }
    state
}

/// Replay a next/prev script against a cache and compare with direct recomputation
fn check_cache<L: Language + Clone>(lang: L, program: &Program, script: &[bool]) -> Result<(), TestCaseError> {
    let seed = lang.seed(program);
    let mut cache = TransitionCache::new(lang.clone(), seed.clone());

    for &forward in script {
        if forward {
            cache.next();
        } else {
            cache.prev();
        }
        let expected = iterate(&lang, &seed, cache.cursor());
        prop_assert_eq!(cache.current(), &expected);
    }
    Ok(())
}

fn back_grid() -> impl Strategy<Value = Grid> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(select(BACK_OPS.to_vec()), rows * cols)
            .prop_map(move |cells| Grid::from_cells(cells, rows, cols))
    })
}

fn wii2d_grid() -> impl Strategy<Value = Grid> {
    (2usize..6, 2usize..6).prop_flat_map(|(rows, cols)| {
        (
            prop::collection::vec(select(WII2D_OPS.to_vec()), rows * cols),
            0..rows * cols,
        )
            .prop_map(move |(mut cells, start)| {
                cells[start] = '!';
                Grid::from_cells(cells, rows, cols)
            })
    })
}

proptest! {
    #[test]
    fn stun_step_is_deterministic(code in "[+<>-]{0,24}", steps in 0usize..200) {
        let program = Program::Text(code);
        let a = iterate(&StunStep, &StunStep.seed(&program), steps);
        let b = iterate(&StunStep, &StunStep.seed(&program), steps);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn wii2d_is_deterministic(grid in wii2d_grid(), seed in any::<u64>(), steps in 0usize..100) {
        let lang = Wii2d::with_seed(seed);
        let program = Program::Grid(grid);
        let a = iterate(&lang, &lang.seed(&program), steps);
        let b = iterate(&lang, &lang.seed(&program), steps);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn stun_step_cache_matches_recomputation(
        code in "[+<>-]{0,16}",
        script in prop::collection::vec(any::<bool>(), 0..80),
    ) {
        check_cache(StunStep, &Program::Text(code), &script)?;
    }

    #[test]
    fn suffolk_cache_matches_recomputation(
        code in "[<>!,.]{0,16}",
        input in "[a-z]{0,4}",
        script in prop::collection::vec(any::<bool>(), 0..80),
    ) {
        check_cache(Suffolk::with_input(&input), &Program::Text(code), &script)?;
    }

    #[test]
    fn back_cache_matches_recomputation(
        grid in back_grid(),
        script in prop::collection::vec(any::<bool>(), 0..60),
    ) {
        check_cache(Back, &Program::Grid(grid), &script)?;
    }

    #[test]
    fn wii2d_cache_matches_recomputation(
        grid in wii2d_grid(),
        script in prop::collection::vec(any::<bool>(), 0..60),
    ) {
        check_cache(Wii2d::default(), &Program::Grid(grid), &script)?;
    }

    #[test]
    fn clear_is_idempotent(code in "[+<>-]{0,16}", steps in 0usize..30) {
        let program = Program::Text(code);
        let seed = StunStep.seed(&program);
        let mut cache = TransitionCache::new(StunStep, seed.clone());
        for _ in 0..steps {
            cache.next();
        }

        cache.clear(seed.clone());
        let once = (cache.cursor(), cache.len(), cache.current().clone());
        cache.clear(seed.clone());
        let twice = (cache.cursor(), cache.len(), cache.current().clone());

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once, (0, 1, seed));
    }

    #[test]
    fn grid_moves_stay_inside_and_reverse(
        rows in 1usize..8,
        cols in 1usize..8,
        start in 0usize..64,
        dir in select(Direction::ALL.to_vec()),
    ) {
        let start = start % (rows * cols);
        let moved = grid_move(start, dir.code(), rows, cols);
        prop_assert!(moved < rows * cols);
        prop_assert_eq!(grid_move(moved, -dir.code(), rows, cols), start);
    }

    #[test]
    fn resize_keeps_the_top_left_block(
        text in "[a-z]{1,6}(\n[a-z]{1,6}){0,5}",
        rows in 1usize..8,
        cols in 1usize..8,
    ) {
        let grid = Grid::fit_text(&text);
        let resized = grid.resized(rows, cols);
        prop_assert_eq!(resized.dims().area(), rows * cols);
        for r in 0..rows.min(grid.rows()) {
            for c in 0..cols.min(grid.cols()) {
                prop_assert_eq!(resized.get(r * cols + c), grid.get(r * grid.cols() + c));
            }
        }
    }
}
