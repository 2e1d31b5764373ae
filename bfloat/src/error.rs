//! Error taxonomy shared by the compiler, parser, and loaders.
//!
//! Every compile-time failure is fail-fast: the first error aborts the
//! current compile unit and propagates to the caller unchanged.  Runtime
//! execution has no error path at all (see [`crate::engine::Outcome`]).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::compiler::lexer::TokenKind;

/// Which side of a loop was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Open,
    Close,
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bracket::Open => f.write_str("open bracket '['"),
            Bracket::Close => f.write_str("close bracket ']'"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("macro `{name}` expected but not found")]
    UndefinedMacro { name: String },

    #[error("in macro `{macro_name}`: no variable named `{name}` found")]
    UndefinedVariable { macro_name: String, name: String },

    #[error("in macro `{macro_name}`: invalid syntax at offset {offset} -> {excerpt}")]
    Syntax {
        macro_name: String,
        offset: usize,
        excerpt: String,
    },

    #[error("in macro `{macro_name}`: {reason}")]
    InvalidRepeat { macro_name: String, reason: String },

    /// A non-symbol token survived rewriting.  Indicates a compiler bug.
    #[error("in macro `{macro_name}`: unmatched {kind} token")]
    UnmatchedToken { macro_name: String, kind: TokenKind },

    #[error("unmatched {bracket} at offset {offset}")]
    UnmatchedBracket { bracket: Bracket, offset: usize },

    #[error("illegal syntax in constants, line {line}: {text}")]
    ConstantsSyntax { line: usize, text: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_macro() {
        let e = Error::UndefinedVariable {
            macro_name: "print".to_owned(),
            name: "x".to_owned(),
        };
        assert_eq!(e.to_string(), "in macro `print`: no variable named `x` found");
    }

    #[test]
    fn bracket_message() {
        let e = Error::UnmatchedBracket {
            bracket: Bracket::Close,
            offset: 3,
        };
        assert_eq!(e.to_string(), "unmatched close bracket ']' at offset 3");
    }

    #[test]
    fn unmatched_token_names_kind() {
        let e = Error::UnmatchedToken {
            macro_name: "program".to_owned(),
            kind: TokenKind::Repeat,
        };
        assert_eq!(e.to_string(), "in macro `program`: unmatched repeat token");
    }
}
