//! Human-readable memory dumps for the `~` instruction.
//!
//! Eight cells per row, each row prefixed by the hex index of its first
//! cell.  Values are lowercase hex, at least two digits; the selected cell
//! is marked with `>`.
//!
//! ```text
//! 0000:  00  2a >01  00
//! ```

use std::fmt::Write;

use crate::config::Cell;

const CELLS_PER_ROW: usize = 8;

pub fn format_dump(tape: &[Cell], pointer: usize) -> String {
    let mut out = String::new();
    for (row, cells) in tape.chunks(CELLS_PER_ROW).enumerate() {
        let base = row * CELLS_PER_ROW;
        let _ = write!(out, "{base:04x}:");
        for (i, &value) in cells.iter().enumerate() {
            let marker = if base + i == pointer { '>' } else { ' ' };
            let _ = write!(out, " {marker}{}", hex(value));
        }
        out.push('\n');
    }
    out
}

fn hex(value: Cell) -> String {
    if value < 0 {
        format!("-{:02x}", value.unsigned_abs())
    } else {
        format!("{value:02x}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
