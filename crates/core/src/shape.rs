//! Shape module - the seven catalog matrices and the rotation transform
//!
//! A shape is a small 0/1 matrix (at most 4x4) stored in a fixed array so it stays
//! `Copy` and never allocates. Rows come first: `cells[y][x]`.
//!
//! Rotation is a pure matrix transform (transpose, then reverse the row order),
//! which turns the matrix 90° counter-clockwise. There is no kick table here; the
//! piece tries lateral offsets itself.

use crate::types::ShapeKind;

/// Side length of the backing array
pub const MAX_SHAPE_SIDE: usize = 4;

/// A 0/1 shape matrix with explicit width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    /// Build a shape from `height` rows of `width` values each.
    ///
    /// Panics if the rows are ragged, empty, larger than 4x4, or contain
    /// values other than 0 and 1.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty() && rows.len() <= MAX_SHAPE_SIDE, "bad shape height");
        let width = rows[0].len();
        assert!(width > 0 && width <= MAX_SHAPE_SIDE, "bad shape width");

        let mut cells = [[0u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "ragged shape row {}", y);
            for (x, &v) in row.iter().enumerate() {
                assert!(v <= 1, "shape cell ({}, {}) must be 0 or 1", x, y);
                cells[y][x] = v;
            }
        }

        Self {
            width: width as u8,
            height: rows.len() as u8,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// Value at `(x, y)`; 0 outside the shape's extent
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= self.width() || y >= self.height() {
            return 0;
        }
        self.cells[y][x]
    }

    /// Iterate the occupied cells as `(dx, dy)` offsets from the top-left corner
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |y| {
            (0..self.width()).filter_map(move |x| (self.cells[y][x] != 0).then_some((x, y)))
        })
    }

    /// Rotate 90°: transpose, then reverse row order
    pub fn rotated(&self) -> Self {
        let w = self.width();
        let h = self.height();
        let mut cells = [[0u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];

        // New shape is h wide and w tall.
        for (ny, row) in cells.iter_mut().enumerate().take(w) {
            for (nx, cell) in row.iter_mut().enumerate().take(h) {
                *cell = self.cells[nx][w - 1 - ny];
            }
        }

        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

/// Pure rotation transform, see [`Shape::rotated`]
pub fn rotate_shape(shape: &Shape) -> Shape {
    shape.rotated()
}

/// Catalog matrix for a shape kind (spawn orientation)
pub fn catalog_shape(kind: ShapeKind) -> Shape {
    match kind {
        ShapeKind::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
        ShapeKind::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
        ShapeKind::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        ShapeKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
        ShapeKind::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
        ShapeKind::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
        ShapeKind::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
    }
}

/// Catalog `(width, height)` per kind, usable in const context
const fn catalog_extent(kind: ShapeKind) -> (usize, usize) {
    match kind {
        ShapeKind::I => (4, 1),
        ShapeKind::O => (2, 2),
        ShapeKind::J | ShapeKind::L | ShapeKind::S | ShapeKind::T | ShapeKind::Z => (3, 2),
    }
}

const fn largest_catalog_side() -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < ShapeKind::ALL.len() {
        let (w, h) = catalog_extent(ShapeKind::ALL[i]);
        if w > max {
            max = w;
        }
        if h > max {
            max = h;
        }
        i += 1;
    }
    max
}

/// Smallest accepted board side: every shape fits in any orientation
pub const MIN_BOARD_DIMENSION: usize = largest_catalog_side();

const _: () = assert!(MIN_BOARD_DIMENSION <= crate::types::MAX_BOARD_DIMENSION);
