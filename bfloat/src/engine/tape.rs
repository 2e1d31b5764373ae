//! The machine's memory: a right-growing tape of cells.

use crate::config::Cell;

/// Growable tape with a selected cell.
///
/// Invariants: there is always at least one cell, and `pointer < cells.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Cell>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    pub fn new() -> Self {
        Self {
            cells: vec![0],
            pointer: 0,
        }
    }

    /// Back to a single zero cell.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.cells.push(0);
        self.pointer = 0;
    }

    pub fn get(&self) -> Cell {
        self.cells[self.pointer]
    }

    pub fn set(&mut self, value: Cell) {
        self.cells[self.pointer] = value;
    }

    /// Moving left of cell 0 is a no-op.
    pub fn move_left(&mut self) {
        self.pointer = self.pointer.saturating_sub(1);
    }

    /// Grows the tape by one zero cell when stepping past its end.
    pub fn move_right(&mut self) {
        self.pointer += 1;
        if self.pointer == self.cells.len() {
            self.cells.push(0);
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
