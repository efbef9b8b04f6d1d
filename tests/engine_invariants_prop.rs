//! Property tests for the engine kernel.
//!
//! Invariants covered:
//! - Merge at a resting position followed by a sweep adds the piece's cells
//!   and removes exactly one board width per swept row.
//! - A rotation either lands on a free spot or leaves the piece untouched.
//! - Four quarter turns in one direction are the identity.
//! - Random rollouts keep score and lines monotonic, the level in step with
//!   the line count, and a running piece never overlaps the board.

use proptest::prelude::*;
use tettris::core::{drop_interval_ms, template, Board, GameState, ScriptedQueue};
use tettris::types::{Direction, GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const ACTIONS: [GameAction; 5] = [
    GameAction::MoveLeft,
    GameAction::MoveRight,
    GameAction::SoftDrop,
    GameAction::RotateCw,
    GameAction::RotateCcw,
];

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    (0..PieceKind::ALL.len()).prop_map(|i| PieceKind::ALL[i])
}

fn dir_strategy() -> impl Strategy<Value = Direction> {
    any::<bool>().prop_map(|cw| if cw { Direction::CW } else { Direction::CCW })
}

/// Board rows from `top` down filled from bitmasks; rows above stay empty.
fn board_from_masks(masks: &[u16], top: usize) -> Board {
    let mut board = Board::new();
    for (i, mask) in masks.iter().enumerate() {
        let y = top + i;
        if y >= BOARD_HEIGHT as usize {
            break;
        }
        for x in 0..BOARD_WIDTH as usize {
            if mask & (1 << x) != 0 {
                board.set(x as i8, y as i8, 1 + (x % 7) as u8);
            }
        }
    }
    board
}

fn assert_cells_valid(board: &Board) {
    assert!(board.cells().iter().all(|&c| c <= 7));
}

proptest! {
    #[test]
    fn merge_then_sweep_conserves_cells(
        masks in prop::collection::vec(0u16..1024, 16),
        kind in kind_strategy(),
        x in -2i8..10,
    ) {
        let mut board = board_from_masks(&masks, 4);
        let matrix = *template(kind);
        prop_assume!(!board.collides(&matrix, x, 0));

        let mut y = 0;
        while !board.collides(&matrix, x, y + 1) {
            y += 1;
        }

        let before = board.occupied_count();
        board.merge(&matrix, x, y);
        let swept = board.sweep();

        prop_assert_eq!(
            board.occupied_count(),
            before + 4 - BOARD_WIDTH as usize * swept.len()
        );
        for y in 0..BOARD_HEIGHT as usize {
            prop_assert!(!board.is_row_full(y));
        }
        assert_cells_valid(&board);
    }

    #[test]
    fn rotate_lands_free_or_restores(
        masks in prop::collection::vec(0u16..1024, 17),
        kind in kind_strategy(),
        moves in prop::collection::vec(0usize..3, 0..12),
        dir in dir_strategy(),
    ) {
        let mut state = GameState::with_source(ScriptedQueue::repeat(kind));
        *state.board_mut() = board_from_masks(&masks, 3);
        state.start();
        prop_assume!(state.is_running());

        for m in moves {
            state.apply_action(ACTIONS[m]);
        }
        prop_assume!(state.is_running());

        let before = state.active().unwrap();
        let rotated = state.rotate(dir);
        let after = state.active().unwrap();

        if rotated {
            prop_assert!(!state.board().collides(&after.matrix, after.x, after.y));
            prop_assert_eq!(after.y, before.y);
            prop_assert_eq!(after.matrix, before.matrix.rotated(dir));
        } else {
            prop_assert_eq!(after, before);
        }
    }

    #[test]
    fn four_turns_are_identity(kind in kind_strategy(), dir in dir_strategy()) {
        let start = *template(kind);
        let mut m = start;
        for _ in 0..4 {
            m.rotate(dir);
        }
        prop_assert_eq!(m, start);
    }

    #[test]
    fn generated_rollout_respects_core_invariants(
        seed in any::<u64>(),
        actions in prop::collection::vec(0usize..ACTIONS.len(), 1..300),
        tick_ms in 0u32..400,
    ) {
        let mut state = GameState::new(seed);
        state.start();

        let mut last_score = 0;
        let mut last_lines = 0;

        for a in actions {
            if state.game_over() {
                break;
            }
            state.apply_action(ACTIONS[a]);
            state.tick(tick_ms);

            prop_assert!(state.score() >= last_score);
            prop_assert!(state.lines() >= last_lines);
            last_score = state.score();
            last_lines = state.lines();

            prop_assert_eq!(state.level(), 1 + state.lines() / 10);
            prop_assert_eq!(state.drop_interval_ms(), drop_interval_ms(state.level()));
            assert_cells_valid(state.board());

            if state.is_running() {
                let active = state.active().unwrap();
                prop_assert!(!active.collides(state.board()));
            }
        }
    }
}
