//! Peephole optimizer over instruction strings.
//!
//! Rewrites until nothing changes:
//!
//! - `<>`, `><`, `-+`, `+-` cancel out and are removed;
//! - a loop without nested brackets directly after a `]` is removed.  The
//!   selected cell is zero whenever the previous loop exits, so the second
//!   loop can never run.
//!
//! Every rewrite shortens the string, so the loop terminates.

use std::sync::LazyLock;

use regex::Regex;

const CANCELLING_PAIRS: [&str; 4] = ["<>", "><", "-+", "+-"];

static DEAD_LOOP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\[[^\[\]]*\]").expect("valid regex"));

/// Rewrite `src` to a fixed point of the peephole rules.
pub fn optimize(src: &str) -> String {
    let mut bf = src.to_owned();
    loop {
        let before = bf.len();
        for pair in CANCELLING_PAIRS {
            bf = bf.replace(pair, "");
        }
        bf = DEAD_LOOP_RE.replace_all(&bf, "]").into_owned();
        if bf.len() == before {
            return bf;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
