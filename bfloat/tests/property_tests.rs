use proptest::prelude::*;

use bfloat::compiler::{compile, ENTRY_MACRO};
use bfloat::constants::ConstantTable;
use bfloat::macros::MacroSet;
use bfloat::optimize::optimize;
use bfloat::parser::parse;

/// Any string over the instruction alphabet.
fn instruction_string() -> impl Strategy<Value = String> {
    "[-+<>.,\\[\\]~]{0,64}"
}

/// Instruction strings with balanced brackets.
fn balanced_program() -> impl Strategy<Value = String> {
    let leaf = "[-+<>.,~]{0,4}".prop_map(String::from);
    leaf.prop_recursive(4, 64, 4, |inner| {
        prop::collection::vec(
            prop_oneof![
                inner.clone(),
                inner.prop_map(|body| format!("[{body}]")),
            ],
            0..4,
        )
        .prop_map(|parts| parts.concat())
    })
}

proptest! {
    /// Optimizing twice gives the same result as optimizing once.
    #[test]
    fn optimizer_is_idempotent(s in instruction_string()) {
        let once = optimize(&s);
        prop_assert_eq!(optimize(&once), once);
    }

    /// Optimizing never lengthens a program.
    #[test]
    fn optimizer_never_grows(s in instruction_string()) {
        prop_assert!(optimize(&s).len() <= s.len());
    }

    /// Bracket balance survives optimization.
    #[test]
    fn optimizer_keeps_brackets_balanced(s in balanced_program()) {
        prop_assert!(parse(&optimize(&s)).is_ok());
    }

    /// A macro made only of base symbols compiles to itself.
    #[test]
    fn pure_symbols_round_trip(s in instruction_string()) {
        let mut macros = MacroSet::new();
        macros.define(ENTRY_MACRO, s.clone());
        let out = compile(&macros, &ConstantTable::new(), ENTRY_MACRO).unwrap();
        prop_assert_eq!(out, s);
    }

    /// Whitespace between symbols is dropped by the compiler.
    #[test]
    fn whitespace_is_insignificant(s in instruction_string()) {
        let spaced: String = s.chars().flat_map(|c| [c, ' ', '\n']).collect();
        let mut macros = MacroSet::new();
        macros.define(ENTRY_MACRO, spaced);
        let out = compile(&macros, &ConstantTable::new(), ENTRY_MACRO).unwrap();
        prop_assert_eq!(out, s);
    }

    /// Balanced programs parse and print back unchanged.
    #[test]
    fn balanced_programs_parse(s in balanced_program()) {
        let program = parse(&s).unwrap();
        prop_assert_eq!(program.to_string(), s);
    }

    /// `{N}` repeats the preceding symbol exactly N times.
    #[test]
    fn repeat_count_is_exact(n in 0usize..200) {
        let mut macros = MacroSet::new();
        macros.define(ENTRY_MACRO, format!("+{{{n}}}"));
        let out = compile(&macros, &ConstantTable::new(), ENTRY_MACRO).unwrap();
        prop_assert_eq!(out, "+".repeat(n));
    }

    /// Neither the compiler nor the parser panics on arbitrary input.
    #[test]
    fn no_panics_on_arbitrary_input(s in "\\PC*") {
        // `0` is not a callable identifier, so the body cannot recurse into it.
        let mut macros = MacroSet::new();
        macros.define("0", s.clone());
        let _ = compile(&macros, &ConstantTable::new(), "0");
        let _ = parse(&s);
        let _ = ConstantTable::parse(&s);
    }
}
