use thiserror::Error;

use crate::config::{BIRTH_NEIGHBORS, ELIMINATION_THRESHOLD, SURVIVAL_MAX, SURVIVAL_MIN};
use crate::game::grid::{Cell, Grid};

/// The one fatal simulation condition: the cell buffer no longer matches the
/// board dimensions. Indicates a broken invariant, so the running game is
/// torn down rather than ticked further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("grid buffer holds {actual} cells, dimensions require {expected}")]
    CorruptGrid { expected: usize, actual: usize },
}

/// What a single tick changed on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Empty cells that became blue.
    pub born: Vec<(usize, usize)>,
    /// Blue cells that reverted to empty.
    pub died: Vec<(usize, usize)>,
    /// Red cells eliminated this tick.
    pub eliminated: Vec<(usize, usize)>,
}

impl TickSummary {
    pub fn changed(&self) -> usize {
        self.born.len() + self.died.len() + self.eliminated.len()
    }
}

/// Advance the board by one tick.
///
/// Both rules read a single snapshot taken before any mutation, so every
/// cell's decision sees the same pre-tick blue layout (simultaneous-update
/// semantics). In particular red elimination reflects the strength players
/// actually built up, not the same-tick birth/death churn. All writes land
/// at the end of the tick.
pub fn step(grid: &mut Grid) -> Result<TickSummary, EngineError> {
    let expected = grid.width() * grid.height();
    if grid.cells.len() != expected {
        return Err(EngineError::CorruptGrid {
            expected,
            actual: grid.cells.len(),
        });
    }

    let before = grid.snapshot();
    let mut summary = TickSummary::default();

    for y in 0..before.height() {
        for x in 0..before.width() {
            let blues = before.blue_neighbor_count(x, y);
            match before.get(x, y) {
                Some(Cell::Blue) => {
                    if !(SURVIVAL_MIN..=SURVIVAL_MAX).contains(&blues) {
                        grid.set(x, y, Cell::Empty);
                        summary.died.push((x, y));
                    }
                }
                Some(Cell::Empty) => {
                    if blues == BIRTH_NEIGHBORS {
                        grid.set(x, y, Cell::Blue);
                        summary.born.push((x, y));
                    }
                }
                Some(Cell::Red) => {
                    if blues >= ELIMINATION_THRESHOLD {
                        grid.set(x, y, Cell::Empty);
                        summary.eliminated.push((x, y));
                    }
                }
                None => unreachable!("coordinates come from the snapshot bounds"),
            }
        }
    }

    Ok(summary)
}
