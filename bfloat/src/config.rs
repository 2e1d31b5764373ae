//! Execution engine configuration.
//!
//! | Setting | Textual form | Default |
//! |---------|--------------|---------|
//! | [`CellLimit`] | `0 < N <= u32::MAX` wraps cells into `[0, N)`; `-1` disables wrapping | `256` |
//! | yield interval | milliseconds between cooperative yields; `-1` disables | disabled |

use std::num::NonZeroU32;
use std::time::Duration;

/// Cell size used when nothing else is configured.
pub const DEFAULT_CELL_SIZE: u32 = 256;

/// Numeric sentinel meaning "unbounded" / "disabled" in textual settings.
pub const DISABLED: i64 = -1;

/// A cell value.  Wide enough for unbounded tapes.
pub type Cell = i64;

// ── CellLimit ─────────────────────────────────────────────────────────────────

/// How out-of-range cell values are mapped back into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLimit {
    /// Values wrap into `[0, N)`.  A zero bound cannot be expressed.
    Wrap(NonZeroU32),
    /// No wrapping at all.
    Unbounded,
}

impl Default for CellLimit {
    fn default() -> Self {
        NonZeroU32::new(DEFAULT_CELL_SIZE).map_or(CellLimit::Unbounded, CellLimit::Wrap)
    }
}

impl CellLimit {
    /// Interpret a numeric cell size: `-1` → unbounded, positive → wrap.
    pub fn from_size(size: i64) -> Result<Self, String> {
        if size == DISABLED {
            return Ok(CellLimit::Unbounded);
        }
        u32::try_from(size)
            .ok()
            .and_then(NonZeroU32::new)
            .map(CellLimit::Wrap)
            .ok_or_else(|| {
                format!(
                    "invalid cell size {size} (expected 1..={} or -1)",
                    u32::MAX
                )
            })
    }

    /// The wrap bound, or `None` when unbounded.
    pub fn bound(self) -> Option<Cell> {
        match self {
            CellLimit::Wrap(n) => Some(Cell::from(n.get())),
            CellLimit::Unbounded => None,
        }
    }

    /// Apply the wrap function.
    pub fn wrap(self, value: Cell) -> Cell {
        match self.bound() {
            Some(n) => value.rem_euclid(n),
            None => value,
        }
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub cell_limit: CellLimit,
    /// Minimum wall-clock spacing between cooperative yields.  `None` never
    /// yields on time; the engine then only suspends on input.
    pub yield_interval: Option<Duration>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell_limit(mut self, cell_limit: CellLimit) -> Self {
        self.cell_limit = cell_limit;
        self
    }

    pub fn with_yield_interval(mut self, interval: Option<Duration>) -> Self {
        self.yield_interval = interval;
        self
    }
}

/// Interpret a numeric yield interval in milliseconds: `-1` → disabled.
pub fn yield_interval_from_millis(millis: i64) -> Result<Option<Duration>, String> {
    match millis {
        DISABLED => Ok(None),
        n if n >= 0 => Ok(Some(Duration::from_millis(n.unsigned_abs()))),
        n => Err(format!("invalid yield interval {n} (expected milliseconds or -1)")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
