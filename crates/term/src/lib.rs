//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the game view paints a snapshot into
//! a framebuffer of styled cells, and the terminal renderer flushes that
//! framebuffer through crossterm, re-sending only what changed.
//!
//! Board cells are drawn two columns wide to compensate for terminal glyph
//! aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tettris_core as core;
pub use tettris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{piece_color, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
