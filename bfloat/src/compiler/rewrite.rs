//! Token rewriting: repeats first, then macro calls, then assembly.
//!
//! Resolving repeats leftmost-first is equivalent to a single left-to-right
//! pass that pops the preceding output token: `+{2}{3}` repeats the second
//! `+` of `++`, yielding four.  Macro calls never produce new repeat or call
//! tokens, so after the repeat pass they are expanded left to right.

use crate::compiler::lexer::Token;
use crate::error::{Error, Result};

/// Replace every [`Token::Repeat`] and its preceding token with N copies of
/// that token.
pub fn expand_repeats(tokens: Vec<Token>, macro_name: &str) -> Result<Vec<Token>> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let Token::Repeat(count) = token else {
            out.push(token);
            continue;
        };
        let Some(repeatee) = out.pop() else {
            return Err(Error::InvalidRepeat {
                macro_name: macro_name.to_owned(),
                reason: "can't repeat nothing".to_owned(),
            });
        };
        if out.try_reserve(count).is_err() {
            return Err(Error::InvalidRepeat {
                macro_name: macro_name.to_owned(),
                reason: format!("repeat count {count} is too large"),
            });
        }
        out.extend(std::iter::repeat_n(repeatee, count));
    }
    Ok(out)
}

/// Replace every [`Token::Call`] with the symbols `expand` produces for it.
pub fn expand_calls<F>(tokens: Vec<Token>, mut expand: F) -> Result<Vec<Token>>
where
    F: FnMut(&str, &[String]) -> Result<String>,
{
    tokens
        .into_iter()
        .map(|token| match token {
            Token::Call { name, args } => expand(&name, &args).map(Token::Symbols),
            other => Ok(other),
        })
        .collect()
}

/// Concatenate an all-symbol token stream.
pub fn assemble(tokens: &[Token], macro_name: &str) -> Result<String> {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Symbols(s) => out.push_str(s),
            // Unreachable when the passes above ran; reported rather than panicking.
            other => {
                return Err(Error::UnmatchedToken {
                    macro_name: macro_name.to_owned(),
                    kind: other.kind(),
                });
            }
        }
    }
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
