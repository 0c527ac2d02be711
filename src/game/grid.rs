use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Red,
    Blue,
}

impl Cell {
    pub fn as_u8(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Red => 1,
            Cell::Blue => 2,
        }
    }
}

/// Why a placement request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceError {
    #[error("coordinates outside the board")]
    InvalidPlacement,
    #[error("target cell is already occupied")]
    CellOccupied,
    #[error("the game is over")]
    GameOver,
}

/// The authoritative cell matrix. Dimensions never change once created;
/// cells mutate only through seeding, `try_place`, and the end-of-tick
/// write in the evolution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    pub(crate) cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, cell: Cell) {
        debug_assert!(x < self.width && y < self.height);
        self.cells[y * self.width + x] = cell;
    }

    /// Place a blue cell at `(x, y)`. Fails without mutating when the target
    /// is out of bounds or not empty.
    pub fn try_place(&mut self, x: i32, y: i32) -> Result<(), PlaceError> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(PlaceError::InvalidPlacement);
        }
        let (x, y) = (x as usize, y as usize);
        if self.cells[y * self.width + x] != Cell::Empty {
            return Err(PlaceError::CellOccupied);
        }
        self.cells[y * self.width + x] = Cell::Blue;
        Ok(())
    }

    /// The up-to-8 Moore-adjacent in-bounds coordinates of `(x, y)`.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(8);
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx >= 0 && ny >= 0 && (nx as usize) < self.width && (ny as usize) < self.height {
                    out.push((nx as usize, ny as usize));
                }
            }
        }
        out
    }

    /// Number of blue Moore-neighbors of `(x, y)`.
    pub fn blue_neighbor_count(&self, x: usize, y: usize) -> usize {
        self.neighbors(x, y)
            .into_iter()
            .filter(|&(nx, ny)| self.cells[ny * self.width + nx] == Cell::Blue)
            .count()
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn red_count(&self) -> usize {
        self.count(Cell::Red)
    }

    pub fn blue_count(&self) -> usize {
        self.count(Cell::Blue)
    }

    /// Immutable copy for broadcast or as the pre-tick snapshot.
    pub fn snapshot(&self) -> Grid {
        self.clone()
    }

    /// Row-major dump for the wire, 0 = empty, 1 = red, 2 = blue.
    pub fn rows(&self) -> Vec<Vec<u8>> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.cells[y * self.width + x].as_u8())
                    .collect()
            })
            .collect()
    }

    /// Seed red obstacles from an RLE pattern. Digits are run lengths,
    /// `o` is a live run, `b` a dead run, `$` skips rows, `!` ends the
    /// pattern. Cells outside the board are clipped. Returns the number of
    /// red cells placed.
    pub fn seed_rle(&mut self, rle: &str) -> usize {
        let (mut x, mut y) = (0usize, 0usize);
        let mut count = String::new();

        for ch in rle.chars() {
            if ch.is_ascii_digit() {
                count.push(ch);
                continue;
            }
            let repeat = count.parse::<usize>().unwrap_or(1);
            count.clear();

            match ch {
                '$' => {
                    y += repeat;
                    x = 0;
                }
                'b' => {
                    x += repeat;
                }
                'o' => {
                    for _ in 0..repeat {
                        if x < self.width && y < self.height {
                            self.cells[y * self.width + x] = Cell::Red;
                        }
                        x += 1;
                    }
                }
                '!' => break,
                _ => {}
            }
        }

        self.red_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_into_empty_cell_succeeds() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(grid.try_place(2, 3), Ok(()));
        assert_eq!(grid.get(2, 3), Some(Cell::Blue));
        assert_eq!(grid.blue_count(), 1);
    }

    #[test]
    fn place_out_of_bounds_is_rejected_without_mutation() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(grid.try_place(-1, 0), Err(PlaceError::InvalidPlacement));
        assert_eq!(grid.try_place(5, 0), Err(PlaceError::InvalidPlacement));
        assert_eq!(grid.try_place(0, 5), Err(PlaceError::InvalidPlacement));
        assert_eq!(grid.blue_count(), 0);
    }

    #[test]
    fn place_onto_occupied_cell_is_rejected() {
        let mut grid = Grid::new(5, 5);
        grid.set(1, 1, Cell::Red);
        grid.try_place(2, 2).unwrap();
        assert_eq!(grid.try_place(1, 1), Err(PlaceError::CellOccupied));
        assert_eq!(grid.try_place(2, 2), Err(PlaceError::CellOccupied));
        assert_eq!(grid.get(1, 1), Some(Cell::Red));
    }

    #[test]
    fn neighbor_counts_respect_board_edges() {
        let grid = Grid::new(5, 5);
        assert_eq!(grid.neighbors(0, 0).len(), 3);
        assert_eq!(grid.neighbors(4, 0).len(), 3);
        assert_eq!(grid.neighbors(2, 0).len(), 5);
        assert_eq!(grid.neighbors(2, 2).len(), 8);
    }

    #[test]
    fn blue_neighbor_count_ignores_red() {
        let mut grid = Grid::new(5, 5);
        grid.set(1, 1, Cell::Blue);
        grid.set(1, 2, Cell::Blue);
        grid.set(1, 3, Cell::Red);
        assert_eq!(grid.blue_neighbor_count(2, 2), 2);
    }

    #[test]
    fn snapshot_is_decoupled_from_later_writes() {
        let mut grid = Grid::new(4, 4);
        grid.try_place(0, 0).unwrap();
        let snap = grid.snapshot();
        grid.try_place(1, 1).unwrap();
        assert_eq!(snap.get(1, 1), Some(Cell::Empty));
        assert_eq!(snap.blue_count(), 1);
        assert_eq!(grid.blue_count(), 2);
    }

    #[test]
    fn rle_seeding_matches_run_lengths_and_row_skips() {
        let mut grid = Grid::new(6, 6);
        // Row 0: ooo..., row 2 (after the 2$ skip): .o
        let placed = grid.seed_rle("3o2$bo!");
        assert_eq!(placed, 4);
        assert_eq!(grid.get(0, 0), Some(Cell::Red));
        assert_eq!(grid.get(1, 0), Some(Cell::Red));
        assert_eq!(grid.get(2, 0), Some(Cell::Red));
        assert_eq!(grid.get(3, 0), Some(Cell::Empty));
        assert_eq!(grid.get(0, 1), Some(Cell::Empty));
        assert_eq!(grid.get(1, 2), Some(Cell::Red));
    }

    #[test]
    fn rle_seeding_clips_to_the_board() {
        let mut grid = Grid::new(3, 3);
        let placed = grid.seed_rle("5o!");
        assert_eq!(placed, 3);
        assert_eq!(grid.red_count(), 3);
    }

    #[test]
    fn rle_stops_at_terminator() {
        let mut grid = Grid::new(5, 5);
        let placed = grid.seed_rle("o!$3o");
        assert_eq!(placed, 1);
    }
}
