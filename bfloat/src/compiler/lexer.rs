//! Placeholder substitution and tokenization of macro bodies.
//!
//! Substitution runs over the whole body first, so a substituted value is
//! lexed exactly like hand-written source.  Lexing then applies these rules
//! top-down at each position; the first one that matches wins:
//!
//! | # | Pattern | Token |
//! |---|---------|-------|
//! | 1 | one of `+ - < > . , [ ] ~` | [`Token::Symbols`] |
//! | 2 | ` {N}` (leading space optional) | [`Token::Repeat`] |
//! | 3 | `name` or `name(a, b, …)` | [`Token::Call`] |
//! | 4 | whitespace | discarded |
//! | 5 | `# … #` | discarded |

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::ConstantTable;
use crate::error::{Error, Result};

/// Length of the source excerpt quoted in syntax errors.
const EXCERPT_LEN: usize = 10;

// ── Tokens ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Base-language symbols.  A single character when lexed; a whole
    /// expansion once a macro call has been rewritten.
    Symbols(String),
    /// `{N}`: repeat the preceding token N times.
    Repeat(usize),
    /// `name(args…)`: expand another macro.
    Call { name: String, args: Vec<String> },
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Symbols(_) => TokenKind::Symbol,
            Token::Repeat(_) => TokenKind::Repeat,
            Token::Call { .. } => TokenKind::MacroCall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Symbol,
    Repeat,
    MacroCall,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Symbol => "symbol",
            TokenKind::Repeat => "repeat",
            TokenKind::MacroCall => "macro-call",
        })
    }
}

// ── Substitution ──────────────────────────────────────────────────────────────

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([A-Za-z0-9_]+)/").expect("valid regex"));

/// Variables visible while compiling one macro invocation.
///
/// Positional arguments are bound to `"0"`, `"1"`, …; constants are layered
/// on top and win over a positional binding with the same name.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub args: &'a [String],
    pub constants: &'a ConstantTable,
}

impl<'a> Scope<'a> {
    pub fn new(args: &'a [String], constants: &'a ConstantTable) -> Self {
        Self { args, constants }
    }

    /// Look up a variable.  Empty values count as unbound.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let value = self
            .constants
            .get(name)
            .or_else(|| self.positional(name))?;
        (!value.is_empty()).then_some(value)
    }

    fn positional(&self, name: &str) -> Option<&'a str> {
        let idx: usize = name.parse().ok()?;
        // Only the canonical spelling is a key: `/01/` is not argument 1.
        if idx.to_string() != name {
            return None;
        }
        self.args.get(idx).map(String::as_str)
    }
}

/// Replace every `/name/` placeholder in `text` with its bound value.
pub fn substitute(text: &str, scope: &Scope<'_>, macro_name: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let name = &caps[1];
        let value = scope.get(name).ok_or_else(|| Error::UndefinedVariable {
            macro_name: macro_name.to_owned(),
            name: name.to_owned(),
        })?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Rule {
    Symbol,
    Repeat,
    Call,
    Whitespace,
    Comment,
}

static RULES: LazyLock<Vec<(Rule, Regex)>> = LazyLock::new(|| {
    [
        (Rule::Symbol, r"^[\[\]+\-,.<>~]"),
        (Rule::Repeat, r"^ ?\{([0-9]+)\}"),
        (Rule::Call, r"^([A-Za-z_][A-Za-z0-9_]*)(?: ?\(([^()]*)\))?"),
        (Rule::Whitespace, r"^\s+"),
        (Rule::Comment, r"^#[^#]*#"),
    ]
    .into_iter()
    .map(|(rule, src)| (rule, Regex::new(src).expect("valid regex")))
    .collect()
});

/// Tokenize already-substituted macro text.
pub fn lex(text: &str, macro_name: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let matched = RULES
            .iter()
            .find_map(|(rule, re)| re.captures(rest).map(|caps| (*rule, caps)));

        let Some((rule, caps)) = matched else {
            return Err(Error::Syntax {
                macro_name: macro_name.to_owned(),
                offset: text[..pos].chars().count(),
                excerpt: rest.chars().take(EXCERPT_LEN).collect(),
            });
        };

        let len = caps.get(0).map_or(0, |m| m.end());
        match rule {
            Rule::Symbol => tokens.push(Token::Symbols(caps[0].to_owned())),
            Rule::Repeat => {
                let count = caps[1].parse().map_err(|_| Error::InvalidRepeat {
                    macro_name: macro_name.to_owned(),
                    reason: format!("repeat count {} is too large", &caps[1]),
                })?;
                tokens.push(Token::Repeat(count));
            }
            Rule::Call => {
                let args = caps
                    .get(2)
                    .map(|m| split_args(m.as_str()))
                    .unwrap_or_default();
                tokens.push(Token::Call {
                    name: caps[1].to_owned(),
                    args,
                });
            }
            Rule::Whitespace | Rule::Comment => {}
        }
        pos += len;
    }

    Ok(tokens)
}

/// Split an argument list on commas.  `()` is an empty list.
fn split_args(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    list.split(',').map(|arg| arg.trim().to_owned()).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Token {
        Token::Symbols(s.to_owned())
    }

    fn call(name: &str, args: &[&str]) -> Token {
        Token::Call {
            name: name.to_owned(),
            args: args.iter().map(|&a| a.to_owned()).collect(),
        }
    }

    // ── substitute ────────────────────────────────────────────────────────────

    #[test]
    fn substitutes_positional_args() {
        let args = vec!["+".to_owned(), "-".to_owned()];
        let consts = ConstantTable::new();
        let scope = Scope::new(&args, &consts);
        assert_eq!(substitute("/1//0/", &scope, "m").unwrap(), "-+");
    }

    #[test]
    fn constants_override_positional() {
        let args = vec!["arg".to_owned()];
        let consts: ConstantTable = [("0", "const")].into_iter().collect();
        let scope = Scope::new(&args, &consts);
        assert_eq!(substitute("/0/", &scope, "m").unwrap(), "const");
    }

    #[test]
    fn unbound_placeholder_fails() {
        let consts = ConstantTable::new();
        let scope = Scope::new(&[], &consts);
        let err = substitute("+/nope/", &scope, "m").unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { name, .. } if name == "nope"));
    }

    #[test]
    fn empty_binding_counts_as_unbound() {
        let consts: ConstantTable = [("blank", "")].into_iter().collect();
        let scope = Scope::new(&[], &consts);
        assert!(matches!(
            substitute("/blank/", &scope, "m"),
            Err(Error::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn non_canonical_index_is_not_positional() {
        let args = vec!["+".to_owned(), "-".to_owned()];
        let consts = ConstantTable::new();
        let scope = Scope::new(&args, &consts);
        assert!(substitute("/01/", &scope, "m").is_err());
    }

    #[test]
    fn text_without_placeholders_unchanged() {
        let consts = ConstantTable::new();
        let scope = Scope::new(&[], &consts);
        assert_eq!(substitute("+[->+<]", &scope, "m").unwrap(), "+[->+<]");
    }

    // ── lex ───────────────────────────────────────────────────────────────────

    #[test]
    fn lexes_symbols() {
        let toks = lex("+-<>.,[]~", "m").unwrap();
        assert_eq!(toks.len(), 9);
        assert!(toks.iter().all(|t| t.kind() == TokenKind::Symbol));
    }

    #[test]
    fn lexes_repeat_with_optional_space() {
        assert_eq!(lex("+{3}", "m").unwrap(), vec![sym("+"), Token::Repeat(3)]);
        assert_eq!(lex("+ {3}", "m").unwrap(), vec![sym("+"), Token::Repeat(3)]);
    }

    #[test]
    fn lexes_calls() {
        assert_eq!(lex("clear", "m").unwrap(), vec![call("clear", &[])]);
        assert_eq!(lex("a()", "m").unwrap(), vec![call("a", &[])]);
        assert_eq!(
            lex("add(>, <<)", "m").unwrap(),
            vec![call("add", &[">", "<<"])]
        );
        assert_eq!(lex("f (x)", "m").unwrap(), vec![call("f", &["x"])]);
    }

    #[test]
    fn empty_arguments_are_kept() {
        assert_eq!(lex("f(a,,b)", "m").unwrap(), vec![call("f", &["a", "", "b"])]);
    }

    #[test]
    fn whitespace_and_comments_discarded() {
        let toks = lex("+ # bump the cell #\n\t-", "m").unwrap();
        assert_eq!(toks, vec![sym("+"), sym("-")]);
    }

    #[test]
    fn digits_are_not_an_identifier() {
        let err = lex("42", "m").unwrap_err();
        assert!(matches!(err, Error::Syntax { offset: 0, .. }));
    }

    #[test]
    fn syntax_error_reports_offset_and_excerpt() {
        let err = lex("++ @@@@@@@@@@@@@@", "prog").unwrap_err();
        match err {
            Error::Syntax {
                macro_name,
                offset,
                excerpt,
            } => {
                assert_eq!(macro_name, "prog");
                assert_eq!(offset, 3);
                assert_eq!(excerpt, "@@@@@@@@@@");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_comment_is_syntax_error() {
        assert!(matches!(lex("+ # open", "m"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn oversized_repeat_count_rejected() {
        let err = lex("+{99999999999999999999999}", "m").unwrap_err();
        assert!(matches!(err, Error::InvalidRepeat { .. }));
    }
}
