//! Macro compiler: brainfloat macro source → base instruction string.
//!
//! Compiling a macro invocation is a four-step pipeline:
//!
//! 1. substitute `/name/` placeholders ([`lexer::substitute`]),
//! 2. tokenize ([`lexer::lex`]),
//! 3. expand `{N}` repeats, then macro calls, recursively compiling each
//!    callee with its argument strings ([`rewrite`]),
//! 4. concatenate the resulting symbols.
//!
//! # Quick start
//!
//! ```rust
//! use bfloat::compiler::compile;
//! use bfloat::constants::ConstantTable;
//! use bfloat::macros::MacroSet;
//!
//! let mut macros = MacroSet::new();
//! macros.define("twice", "/0//0/");
//! macros.define("program", "twice(+){2} .");
//! let out = compile(&macros, &ConstantTable::new(), "program").unwrap();
//! assert_eq!(out, "++++.");
//! ```
//!
//! Self-referential macros recurse without bound.

pub mod lexer;
pub mod rewrite;

use std::collections::HashMap;

use crate::constants::ConstantTable;
use crate::error::{Error, Result};
use crate::macros::MacroSet;

/// Name of the macro a program starts from.
pub const ENTRY_MACRO: &str = "program";

/// Compile `entry` (with no arguments) to a base instruction string.
pub fn compile(macros: &MacroSet, constants: &ConstantTable, entry: &str) -> Result<String> {
    Compiler::new(macros, constants).compile(entry, &[])
}

/// Holds the inputs of one compilation plus a cache of finished expansions.
///
/// Compilation is deterministic, so each `(macro, args)` pair only needs to be
/// expanded once; `a(){1000}` compiles `a` a single time.
pub struct Compiler<'a> {
    macros: &'a MacroSet,
    constants: &'a ConstantTable,
    cache: HashMap<(String, Vec<String>), String>,
}

impl<'a> Compiler<'a> {
    pub fn new(macros: &'a MacroSet, constants: &'a ConstantTable) -> Self {
        Self {
            macros,
            constants,
            cache: HashMap::new(),
        }
    }

    /// Compile one invocation of macro `name`.
    pub fn compile(&mut self, name: &str, args: &[String]) -> Result<String> {
        let key = (name.to_owned(), args.to_vec());
        if let Some(done) = self.cache.get(&key) {
            return Ok(done.clone());
        }

        let (macros, constants) = (self.macros, self.constants);
        let mac = macros.get(name).ok_or_else(|| Error::UndefinedMacro {
            name: name.to_owned(),
        })?;
        tracing::trace!(macro_name = name, ?args, "expanding macro");

        let scope = lexer::Scope::new(args, constants);
        let text = lexer::substitute(&mac.content, &scope, name)?;
        let tokens = lexer::lex(&text, name)?;
        let tokens = rewrite::expand_repeats(tokens, name)?;
        let tokens = rewrite::expand_calls(tokens, |callee, callee_args| {
            self.compile(callee, callee_args)
        })?;
        let out = rewrite::assemble(&tokens, name)?;

        self.cache.insert(key, out.clone());
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
