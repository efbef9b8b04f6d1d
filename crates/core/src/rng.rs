//! RNG module - random piece selection
//!
//! Pieces are drawn uniformly at random from the seven catalog kinds. The
//! random source is injected through [`PieceSource`] so games can be replayed
//! from a seed, or driven by a fixed script in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{PieceKind, PIECE_KIND_COUNT};

/// Anything that can hand out the next piece kind.
pub trait PieceSource {
    fn draw(&mut self) -> PieceKind;
}

/// Uniform random piece generator backed by a seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: StdRng,
    seed: u64,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this queue was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl PieceSource for PieceQueue {
    fn draw(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..PIECE_KIND_COUNT)]
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Deterministic source that cycles through a fixed list of kinds.
#[derive(Debug, Clone)]
pub struct ScriptedQueue {
    script: Vec<PieceKind>,
    index: usize,
}

impl ScriptedQueue {
    /// Cycle through `script`. An empty script yields `O` forever.
    pub fn new(script: impl Into<Vec<PieceKind>>) -> Self {
        Self {
            script: script.into(),
            index: 0,
        }
    }

    /// Always draw `kind`.
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl PieceSource for ScriptedQueue {
    fn draw(&mut self) -> PieceKind {
        if self.script.is_empty() {
            return PieceKind::O;
        }
        let kind = self.script[self.index % self.script.len()];
        self.index = self.index.wrapping_add(1);
        kind
    }
}

impl<S: PieceSource + ?Sized> PieceSource for &mut S {
    fn draw(&mut self) -> PieceKind {
        (**self).draw()
    }
}

impl<S: PieceSource + ?Sized> PieceSource for Box<S> {
    fn draw(&mut self) -> PieceKind {
        (**self).draw()
    }
}
