//! Grid tests - construction, overlap tests, row removal and the row scan

use termtris::core::{catalog_shape, BoardDimensions, BoardError, ErrorKind, Grid, MIN_BOARD_DIMENSION};
use termtris::types::{ShapeKind, MAX_BOARD_DIMENSION};

fn grid(w: i64, h: i64) -> Grid {
    Grid::new(BoardDimensions::new(w, h).unwrap())
}

fn fill_row(g: &mut Grid, y: usize) {
    for x in 0..g.width() {
        g.set(x, y, 1);
    }
}

#[test]
fn test_grid_new_empty() {
    let g = grid(10, 20);
    assert_eq!(g.width(), 10);
    assert_eq!(g.height(), 20);
    assert_eq!(g.cells().len(), 200);
    assert_eq!(g.filled_count(), 0);
    assert!(g.is_consistent());
}

#[test]
fn test_dimensions_accept_full_range() {
    let min = MIN_BOARD_DIMENSION as i64;
    let max = MAX_BOARD_DIMENSION as i64;
    for (w, h) in [(min, min), (min, max), (max, min), (max, max), (10, 20)] {
        let g = grid(w, h);
        assert_eq!((g.width() as i64, g.height() as i64), (w, h));
    }
}

#[test]
fn test_dimensions_out_of_range() {
    for (w, h) in [(3, 10), (10, 3), (51, 10), (10, 51), (0, 0), (-1, 10), (10, -20)] {
        let err = BoardDimensions::new(w, h).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range, "{}x{}", w, h);
    }
}

#[test]
fn test_dimensions_wrong_type() {
    for (w, h) in [("10.5", "20"), ("true", "20"), ("10", "abc"), ("", "20")] {
        let err = BoardDimensions::parse(w, h).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type, "{:?}x{:?}", w, h);
    }
    let err = BoardDimensions::parse("2", "20").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert!(BoardDimensions::parse(" 10 ", "20").is_ok());
}

#[test]
fn test_dimensions_overflowing_integers_are_range_errors() {
    for (w, h) in [
        ("99999999999999999999", "20"),
        ("10", "-99999999999999999999"),
    ] {
        let err = BoardDimensions::parse(w, h).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range, "{:?}x{:?}", w, h);
    }
}

#[test]
fn test_region_overlaps_free_placements() {
    let g = grid(10, 20);
    for kind in ShapeKind::ALL {
        let mut shape = catalog_shape(kind);
        for _ in 0..4 {
            for y in 0..=(20 - shape.height()) as i32 {
                for x in 0..=(10 - shape.width()) as i32 {
                    assert!(!g.region_overlaps(x, y, &shape), "{:?} at ({}, {})", kind, x, y);
                }
            }
            shape = shape.rotated();
        }
    }
}

#[test]
fn test_region_overlaps_out_of_bounds() {
    let g = grid(10, 20);
    let t = catalog_shape(ShapeKind::T);
    assert!(g.region_overlaps(-1, 0, &t));
    assert!(g.region_overlaps(0, -1, &t));
    assert!(g.region_overlaps(8, 0, &t));
    assert!(g.region_overlaps(0, 19, &t));
    assert!(g.region_overlaps(100, 100, &t));
    assert!(g.region_overlaps(i32::MAX - 1, 0, &t));
    assert!(g.region_overlaps(0, i32::MAX, &t));
    assert!(g.region_overlaps(i32::MIN, i32::MIN, &t));
}

#[test]
fn test_region_overlaps_ignores_empty_shape_cells() {
    let mut g = grid(10, 20);
    // T's top row is [0, 1, 0]: a filled cell under a 0 does not collide.
    g.set(0, 0, 1);
    let t = catalog_shape(ShapeKind::T);
    assert!(!g.region_overlaps(0, 0, &t));
    g.set(1, 0, 1);
    assert!(g.region_overlaps(0, 0, &t));
}

#[test]
fn test_drop_row_every_index_preserves_dimensions() {
    for idx in -20isize..20 {
        let mut g = grid(10, 20);
        let row = if idx < 0 { (20 + idx) as usize } else { idx as usize };
        fill_row(&mut g, row);
        if row > 0 {
            g.set(3, row - 1, 1);
        }

        g.drop_row(idx).unwrap();

        assert_eq!((g.width(), g.height()), (10, 20));
        assert_eq!(g.cells().len(), 200);
        assert_eq!(g.row(0), &[0; 10], "new top row for idx {}", idx);
        if row > 0 {
            // Removed content is gone, the row above slid into its place.
            assert_eq!(g.filled_count(), 1);
            assert_eq!(g.get(3, row), 1);
        } else {
            assert_eq!(g.filled_count(), 0);
        }
    }
}

#[test]
fn test_drop_row_out_of_range() {
    let mut g = grid(10, 20);
    for idx in [20isize, 21, -21, -100] {
        let err = g.drop_row(idx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
        assert_eq!(
            err,
            BoardError::RowIndexOutOfRange {
                index: idx,
                height: 20
            }
        );
    }
}

#[test]
fn test_scan_non_adjacent_rows() {
    let mut g = grid(4, 6);
    fill_row(&mut g, 2);
    g.set(0, 3, 1);
    fill_row(&mut g, 4);
    fill_row(&mut g, 5);

    assert_eq!(g.scan_completed(2, 6), 3);
    assert_eq!(g.filled_count(), 1);
    assert_eq!(g.get(0, 5), 1);
}

#[test]
fn test_scan_respects_range() {
    let mut g = grid(4, 6);
    fill_row(&mut g, 0);
    fill_row(&mut g, 5);

    assert_eq!(g.scan_completed(3, 5), 0);
    assert_eq!(g.scan_completed(4, 6), 1);
    assert!(g.is_row_complete(1));
}

#[test]
fn test_clear() {
    let mut g = grid(4, 4);
    fill_row(&mut g, 1);
    g.clear();
    assert_eq!(g.filled_count(), 0);
}
