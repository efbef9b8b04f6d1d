//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the engine, the renderer and the
//! input layer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//!
//! # Game Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Default frame interval (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Auto-drop interval at level 1 |
//! | `DROP_STEP_MS` | 100 | Interval reduction per level |
//! | `MIN_DROP_MS` | 100 | Auto-drop interval floor |
//! | `HOLD_REPEAT_MS` | 150 | Repeat period of a held control |
//!
//! # Examples
//!
//! ```
//! use tettris_types::{Direction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_cell(3).unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.cell(), 3);
//!
//! assert_eq!(Direction::try_from(-1i8), Ok(Direction::Left));
//! assert!(Direction::try_from(2i8).is_err());
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use thiserror::Error;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Default frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Auto-drop interval at level 1
pub const BASE_DROP_MS: u32 = 1000;

/// Auto-drop interval reduction per level above 1
pub const DROP_STEP_MS: u32 = 100;

/// Auto-drop interval floor
pub const MIN_DROP_MS: u32 = 100;

/// Points for the first row removed by a sweep; each further row doubles it.
pub const LINE_CLEAR_BASE: u32 = 100;

/// Rows needed per level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Level at the start of a game.
pub const START_LEVEL: u32 = 1;

/// Repeat period while a movement control is held.
pub const HOLD_REPEAT_MS: u32 = 150;

/// Number of piece kinds in the catalog.
pub const PIECE_KIND_COUNT: usize = 7;

/// A cell on the game board or in a piece matrix.
///
/// `0` is empty, `1..=7` is the color ID of the piece kind that filled it.
pub type Cell = u8;

/// The empty cell value.
pub const EMPTY: Cell = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(TICK_MS, 16);
        assert_eq!(BASE_DROP_MS, 1000);
        assert_eq!(DROP_STEP_MS, 100);
        assert_eq!(MIN_DROP_MS, 100);
        assert_eq!(HOLD_REPEAT_MS, 150);
    }

    #[test]
    fn piece_kind_cells_are_one_through_seven() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.cell() as usize, i + 1);
            assert_eq!(PieceKind::from_cell(kind.cell()), Some(*kind));
        }
        assert_eq!(PieceKind::from_cell(EMPTY), None);
        assert_eq!(PieceKind::from_cell(8), None);
    }

    #[test]
    fn direction_rejects_out_of_range() {
        assert_eq!(Direction::try_from(1i8), Ok(Direction::Right));
        assert_eq!(Direction::try_from(-1i8), Ok(Direction::Left));
        assert_eq!(Direction::try_from(0i8), Err(InvalidDirection(0)));
        assert_eq!(Direction::try_from(-3i8), Err(InvalidDirection(-3)));
        assert_eq!(
            InvalidDirection(5).to_string(),
            "invalid direction 5 (expected -1 or +1)"
        );
    }

    #[test]
    fn direction_rotation_aliases() {
        assert_eq!(Direction::CW, Direction::Right);
        assert_eq!(Direction::CCW, Direction::Left);
        assert_eq!(Direction::Left.reverse(), Direction::Right);
        assert_eq!(Direction::Right.delta(), 1);
    }
}

/// The seven piece kinds, in catalog order.
///
/// The catalog order fixes each kind's cell color ID (`I` = 1 ... `Z` = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in catalog order.
    pub const ALL: [PieceKind; PIECE_KIND_COUNT] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Cell color ID written into the grid when this piece locks.
    pub fn cell(&self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::J => 4,
            PieceKind::L => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::cell`]. Returns `None` for empty or unknown IDs.
    pub fn from_cell(cell: Cell) -> Option<Self> {
        match cell {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::J),
            5 => Some(PieceKind::L),
            6 => Some(PieceKind::S),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Index into [`PieceKind::ALL`].
    pub fn index(&self) -> usize {
        self.cell() as usize - 1
    }
}

/// A unit direction.
///
/// Used both for horizontal movement (left/right) and for rotation, where
/// `Right` means clockwise and `Left` counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Clockwise rotation.
    pub const CW: Direction = Direction::Right;
    /// Counter-clockwise rotation.
    pub const CCW: Direction = Direction::Left;

    /// Signed unit step: -1 or +1.
    pub fn delta(&self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A direction integer other than -1 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid direction {0} (expected -1 or +1)")]
pub struct InvalidDirection(pub i8);

impl TryFrom<i8> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            other => Err(InvalidDirection(other)),
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// Input collaborators only ever produce these; they map one-to-one onto the
/// engine entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one row; locks it if it is resting
    SoftDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Clear the board and start a new game
    Restart,
    /// Give up: end the current game
    Quit,
}

/// Lifecycle of one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    #[default]
    Running,
    GameOver,
}

/// Why a session entered [`SessionStatus::GameOver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// A freshly spawned piece collided with the stack.
    ToppedOut,
    /// The player gave up.
    Quit,
}

/// Core-side event emitted after a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    /// Rows removed by the sweep that followed the lock.
    pub rows_cleared: u32,
    /// Points awarded by that sweep.
    pub points: u32,
    /// Whether the sweep raised the level.
    pub level_up: bool,
    /// Whether the following spawn ended the game.
    pub topped_out: bool,
}
