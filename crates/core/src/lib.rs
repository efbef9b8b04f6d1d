//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on UI or terminal I/O, making it:
//!
//! - **Deterministic**: Same seed (or scripted piece source) produces identical games
//! - **Testable**: Every rule is exercised by unit tests
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//! - **Fast**: Collision, merge, sweep and rotation never allocate
//!
//! # Module Structure
//!
//! - [`shapes`]: the seven piece matrices, quarter-turn rotation, wall-kick offsets
//! - [`board`]: 10x20 grid with collision, merge and row sweep
//! - [`rng`]: injectable piece sources (seeded uniform random, scripted)
//! - [`scoring`]: sweep rewards, level policy and drop interval
//! - [`clock`]: the auto-drop accumulator
//! - [`game_state`]: the session tying everything together
//! - [`snapshot`]: read-only state handed to renderers
//!
//! # Game Rules
//!
//! - Pieces spawn on the top row, horizontally centered
//! - A soft drop into something locks the piece, sweeps full rows and spawns the next one
//! - Rotation tries a sideways kick sequence before giving up
//! - The k-th row removed in one sweep is worth 100 x 2^k
//! - Every 10 lines raise the level; each level drops 100ms faster (floor 100ms)
//!
//! # Example
//!
//! ```
//! use tettris_core::GameState;
//! use tettris_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::SoftDrop);
//!
//! assert_eq!(game.score(), 0);
//! assert!(!game.game_over());
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) with the elapsed time every
//! frame, or [`GameState::frame`](game_state::GameState::frame) with a timestamp.

pub mod board;
pub mod clock;
pub mod game_state;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;

pub use tettris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use clock::DropClock;
pub use game_state::{ActivePiece, GameState};
pub use rng::{PieceQueue, PieceSource, ScriptedQueue};
pub use scoring::{drop_interval_ms, score_sweep, sweep_points, SweepScore};
pub use shapes::{kick_offsets, template, PieceMatrix};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
