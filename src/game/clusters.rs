use crate::game::grid::{Cell, Grid};

/// Number of maximal 8-connected components of `cell` in `grid`.
///
/// Iterative flood fill over the full board; deterministic and free of side
/// effects, so repeated calls on the same snapshot agree.
pub fn count_clusters(grid: &Grid, cell: Cell) -> usize {
    let (width, height) = (grid.width(), grid.height());
    let mut visited = vec![false; width * height];
    let mut clusters = 0;
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if grid.get(x, y) != Some(cell) || visited[y * width + x] {
                continue;
            }
            clusters += 1;
            visited[y * width + x] = true;
            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                for (nx, ny) in grid.neighbors(cx, cy) {
                    if grid.get(nx, ny) == Some(cell) && !visited[ny * width + nx] {
                        visited[ny * width + nx] = true;
                        stack.push((nx, ny));
                    }
                }
            }
        }
    }

    clusters
}

/// Percentage of non-empty cells that are blue; 0 when the board is empty.
pub fn territory_control(grid: &Grid) -> f64 {
    let red = grid.red_count();
    let blue = grid.blue_count();
    let occupied = red + blue;
    if occupied == 0 {
        return 0.0;
    }
    blue as f64 / occupied as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        let mut grid = Grid::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    'r' => grid.set(x, y, Cell::Red),
                    'b' => grid.set(x, y, Cell::Blue),
                    _ => {}
                }
            }
        }
        grid
    }

    #[test]
    fn diagonal_contact_joins_a_cluster() {
        let grid = grid_from(&[
            "b....", //
            ".b...",
            "..b..",
            ".....",
            "....b",
        ]);
        assert_eq!(count_clusters(&grid, Cell::Blue), 2);
    }

    #[test]
    fn colors_cluster_independently() {
        let grid = grid_from(&[
            "rr.bb", //
            ".....",
            "r...b",
        ]);
        assert_eq!(count_clusters(&grid, Cell::Red), 2);
        assert_eq!(count_clusters(&grid, Cell::Blue), 2);
        assert_eq!(count_clusters(&grid, Cell::Empty), 1);
    }

    #[test]
    fn counting_is_idempotent_on_a_snapshot() {
        let grid = grid_from(&[
            "b.r", //
            ".b.",
            "r.b",
        ]);
        let snap = grid.snapshot();
        assert_eq!(count_clusters(&snap, Cell::Blue), count_clusters(&snap, Cell::Blue));
        assert_eq!(count_clusters(&snap, Cell::Red), count_clusters(&snap, Cell::Red));
    }

    #[test]
    fn territory_is_zero_on_an_empty_board() {
        let grid = Grid::new(8, 8);
        assert_eq!(territory_control(&grid), 0.0);
    }

    #[test]
    fn territory_stays_within_percentage_bounds() {
        let all_blue = grid_from(&["bb", "bb"]);
        assert_eq!(territory_control(&all_blue), 100.0);

        let all_red = grid_from(&["rr", "rr"]);
        assert_eq!(territory_control(&all_red), 0.0);

        let mixed = grid_from(&["rb", ".."]);
        let pct = territory_control(&mixed);
        assert!(pct > 0.0 && pct < 100.0);
        assert!((pct - 50.0).abs() < 1e-9);
    }
}
