//! Shapes module - the piece catalog and matrix rotation
//!
//! Every piece is a small square matrix of cell color IDs. Some shapes are
//! padded with empty rows/columns (I to 4x4, the three-wide pieces to 3x3) so
//! that rotating the whole matrix pivots the piece around a sensible center.
//!
//! Matrices are stored inline in a fixed 4x4 array, so copying a template into
//! an active piece never allocates.

use arrayvec::ArrayVec;

use crate::types::{Cell, Direction, PieceKind, EMPTY, PIECE_KIND_COUNT};

/// Largest matrix side length in the catalog.
pub const MAX_PIECE_SIZE: usize = 4;

/// Upper bound on the number of kick offsets for any matrix width.
pub const MAX_KICKS: usize = 8;

/// A square matrix of cells, `size` x `size`, top-left aligned in fixed storage.
///
/// Cells outside the `size` x `size` square are always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceMatrix {
    size: u8,
    cells: [[Cell; MAX_PIECE_SIZE]; MAX_PIECE_SIZE],
}

impl PieceMatrix {
    /// Build a matrix from square rows.
    pub const fn from_rows<const N: usize>(rows: [[Cell; N]; N]) -> Self {
        assert!(N >= 1 && N <= MAX_PIECE_SIZE, "piece matrix must be 1x1 to 4x4");

        let mut cells = [[EMPTY; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        let mut y = 0;
        while y < N {
            let mut x = 0;
            while x < N {
                cells[y][x] = rows[y][x];
                x += 1;
            }
            y += 1;
        }

        Self {
            size: N as u8,
            cells,
        }
    }

    /// Side length (the matrix width, which equals its height).
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Cell at column `x`, row `y`; empty outside the matrix.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x >= self.size as usize || y >= self.size as usize {
            return EMPTY;
        }
        self.cells[y][x]
    }

    /// Rows of the matrix, each `size` cells long.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        let n = self.size as usize;
        self.cells[..n].iter().map(move |row| &row[..n])
    }

    /// Non-empty cells as `(dx, dy, cell)` offsets from the matrix origin.
    pub fn minos(&self) -> impl Iterator<Item = (i8, i8, Cell)> + '_ {
        let n = self.size as usize;
        (0..n)
            .flat_map(move |y| (0..n).map(move |x| (x, y)))
            .filter_map(move |(x, y)| {
                let cell = self.cells[y][x];
                (cell != EMPTY).then_some((x as i8, y as i8, cell))
            })
    }

    /// Number of non-empty cells.
    pub fn mino_count(&self) -> usize {
        self.minos().count()
    }

    /// Rotate a quarter turn in place.
    ///
    /// Transposes the square, then reverses each row (clockwise) or the row
    /// order (counter-clockwise).
    pub fn rotate(&mut self, dir: Direction) {
        let n = self.size as usize;
        for y in 0..n {
            for x in 0..y {
                let t = self.cells[x][y];
                self.cells[x][y] = self.cells[y][x];
                self.cells[y][x] = t;
            }
        }

        match dir {
            Direction::Right => {
                for row in &mut self.cells[..n] {
                    row[..n].reverse();
                }
            }
            Direction::Left => self.cells[..n].reverse(),
        }
    }

    /// A rotated copy.
    pub fn rotated(mut self, dir: Direction) -> Self {
        self.rotate(dir);
        self
    }
}

static CATALOG: [PieceMatrix; PIECE_KIND_COUNT] = [
    // I
    PieceMatrix::from_rows([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    // O
    PieceMatrix::from_rows([[2, 2], [2, 2]]),
    // T
    PieceMatrix::from_rows([[0, 3, 0], [3, 3, 3], [0, 0, 0]]),
    // J
    PieceMatrix::from_rows([[4, 0, 0], [4, 4, 4], [0, 0, 0]]),
    // L
    PieceMatrix::from_rows([[0, 0, 5], [5, 5, 5], [0, 0, 0]]),
    // S
    PieceMatrix::from_rows([[0, 6, 6], [6, 6, 0], [0, 0, 0]]),
    // Z
    PieceMatrix::from_rows([[7, 7, 0], [0, 7, 7], [0, 0, 0]]),
];

/// The immutable spawn-orientation template for a piece kind.
pub fn template(kind: PieceKind) -> &'static PieceMatrix {
    &CATALOG[kind.index()]
}

/// Horizontal offsets tried, in order, when a rotation collides.
///
/// Kick steps +1, -2, +3, -4, ... are applied cumulatively, so the offsets
/// relative to the starting column run +1, -1, +2, -2, ... The search stops as
/// soon as the next step would be positive and wider than the matrix; the
/// position reached by the last applied step is not tried.
///
/// ```
/// use tettris_core::shapes::kick_offsets;
///
/// assert_eq!(kick_offsets(2).as_slice(), &[1]);
/// assert_eq!(kick_offsets(3).as_slice(), &[1, -1, 2]);
/// assert_eq!(kick_offsets(4).as_slice(), &[1, -1, 2]);
/// ```
pub fn kick_offsets(width: u8) -> ArrayVec<i8, MAX_KICKS> {
    let mut out = ArrayVec::new();
    let width = width as i8;
    let mut offset: i8 = 0;
    let mut step: i8 = 1;

    loop {
        offset += step;
        step = -(step + step.signum());
        if step > width {
            break;
        }
        if out.try_push(offset).is_err() {
            break;
        }
    }

    out
}
