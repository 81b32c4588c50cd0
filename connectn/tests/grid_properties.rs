use connectn::{GameError, Grid, Symbol};
use proptest::prelude::*;

const BLANK: Symbol = Symbol::new('.');
const PIECES: [Symbol; 2] = [Symbol::new('X'), Symbol::new('O')];

/// Plays `(piece, column)` drops, ignoring rejected ones.
fn build(rows: usize, cols: usize, drops: &[(usize, usize)]) -> Grid {
    let mut grid = Grid::new(rows, cols, BLANK).unwrap();
    for &(piece, col) in drops {
        let _ = grid.place_piece(PIECES[piece], col);
    }
    grid
}

fn dims_and_drops() -> impl Strategy<Value = (usize, usize, Vec<(usize, usize)>)> {
    (1usize..7, 1usize..8).prop_flat_map(|(rows, cols)| {
        let drops = prop::collection::vec((0usize..2, 0usize..cols + 2), 0..60);
        (Just(rows), Just(cols), drops)
    })
}

/// Fewer drops than cells, so at least one column always has room.
fn partial_fill() -> impl Strategy<Value = (usize, usize, Vec<(usize, usize)>)> {
    (1usize..7, 1usize..8).prop_flat_map(|(rows, cols)| {
        let drops = prop::collection::vec((0usize..2, 0usize..cols + 2), 0..rows * cols);
        (Just(rows), Just(cols), drops)
    })
}

proptest! {
    #[test]
    fn full_iff_every_column_full((rows, cols, drops) in dims_and_drops()) {
        let grid = build(rows, cols, &drops);
        let all_columns_full = (0..cols).all(|c| grid.column_height(c) == Some(rows));
        prop_assert_eq!(grid.is_full(), all_columns_full);
        for col in 0..cols {
            let height = grid.column_height(col).unwrap();
            prop_assert!(height <= rows);
            for row in 0..rows {
                prop_assert_eq!(grid.is_blank(row, col), row >= height);
            }
        }
    }

    #[test]
    fn rejected_placements_do_not_mutate((rows, cols, drops) in dims_and_drops(), extra in 0usize..12) {
        let mut grid = build(rows, cols, &drops);
        let before = grid.clone();
        match grid.place_piece(PIECES[0], extra) {
            Err(GameError::ColumnOutOfBounds { .. }) => {
                prop_assert!(extra >= cols);
                prop_assert_eq!(&grid, &before);
            }
            Err(GameError::ColumnFull { .. }) => {
                prop_assert!(before.is_column_full(extra));
                prop_assert_eq!(&grid, &before);
            }
            Ok(row) => {
                prop_assert_eq!(Some(row), before.column_height(extra));
            }
            Err(other) => {
                prop_assert!(false, "unexpected error {other}");
            }
        }
    }

    #[test]
    fn place_then_remove_round_trips((rows, cols, drops) in partial_fill(), pick in any::<prop::sample::Index>()) {
        let mut grid = build(rows, cols, &drops);
        let open = grid.open_columns();
        prop_assert!(!open.is_empty());
        let col = open[pick.index(open.len())];
        let before = grid.clone();
        let row = grid.place_piece(PIECES[1], col).unwrap();
        grid.remove_piece(row, col).unwrap();
        prop_assert_eq!(grid, before);
    }

    #[test]
    fn runs_survive_left_right_mirroring((rows, cols, drops) in dims_and_drops()) {
        let grid = build(rows, cols, &drops);
        let mirrored_drops: Vec<(usize, usize)> = drops
            .iter()
            .map(|&(piece, col)| (piece, if col < cols { cols - 1 - col } else { col }))
            .collect();
        let mirrored = build(rows, cols, &mirrored_drops);
        for row in 0..rows {
            for col in 0..cols {
                if grid.is_blank(row, col) {
                    prop_assert!(mirrored.is_blank(row, cols - 1 - col));
                    continue;
                }
                prop_assert_eq!(
                    grid.longest_run(row, col).unwrap(),
                    mirrored.longest_run(row, cols - 1 - col).unwrap()
                );
            }
        }
    }

    #[test]
    fn runs_survive_upside_down_mirroring(
        (rows, cols, cells) in (1usize..7, 1usize..8).prop_flat_map(|(r, c)| {
            (Just(r), Just(c), prop::collection::vec(0usize..2, r * c))
        })
    ) {
        // Only a full grid stays gravity-consistent when flipped.
        let mut grid = Grid::new(rows, cols, BLANK).unwrap();
        let mut flipped = Grid::new(rows, cols, BLANK).unwrap();
        for col in 0..cols {
            for row in 0..rows {
                grid.place_piece(PIECES[cells[row * cols + col]], col).unwrap();
                flipped.place_piece(PIECES[cells[(rows - 1 - row) * cols + col]], col).unwrap();
            }
        }
        prop_assert!(grid.is_full() && flipped.is_full());
        for row in 0..rows {
            for col in 0..cols {
                prop_assert_eq!(
                    grid.longest_run(row, col).unwrap(),
                    flipped.longest_run(rows - 1 - row, col).unwrap()
                );
            }
        }
    }

    #[test]
    fn run_length_is_bounded_by_grid((rows, cols, drops) in dims_and_drops()) {
        let grid = build(rows, cols, &drops);
        for row in 0..rows {
            for col in 0..cols {
                match grid.longest_run(row, col) {
                    Ok(len) => {
                        prop_assert!(len >= 1 && len <= rows.max(cols));
                    }
                    Err(GameError::EmptySpotQueried { .. }) => {
                        prop_assert!(grid.is_blank(row, col));
                    }
                    Err(other) => {
                        prop_assert!(false, "unexpected error {other}");
                    }
                }
            }
        }
    }
}
