//! brainfloat: Brainfuck extended with a text-macro layer.
//!
//! Data flow:
//!
//! ```text
//! macros + constants ──compiler──▶ instruction string ──optimize──▶
//!     instruction string ──parser──▶ Program ──engine──▶ output / dumps
//! ```
//!
//! The instruction alphabet is `+ - < > . , [ ] ~`; `~` dumps memory.
//!
//! # Quick start
//!
//! ```rust
//! use bfloat::{compile_program, Library};
//! use bfloat::macros::MacroSet;
//! use bfloat::constants::ConstantTable;
//!
//! let mut macros = MacroSet::new();
//! macros.define("program", "+{72} . +-");
//! let lib = Library::new(macros, ConstantTable::new());
//! let program = compile_program(&lib).unwrap();
//! assert_eq!(program.to_string(), format!("{}.", "+".repeat(72)));
//! ```

pub mod compiler;
pub mod config;
pub mod constants;
pub mod dump;
pub mod engine;
pub mod error;
pub mod library;
pub mod macros;
pub mod optimize;
pub mod parser;

pub use config::{CellLimit, EngineConfig};
pub use engine::{Machine, MachineIo, Outcome};
pub use error::{Error, Result};
pub use library::Library;
pub use parser::Program;

/// Build `lib` (compile + optimize) and parse the result.
pub fn compile_program(lib: &Library) -> Result<Program> {
    parser::parse(&lib.build()?)
}

/// Parse and execute an instruction string on a fresh machine.
pub async fn run_source<I: MachineIo>(
    src: &str,
    config: EngineConfig,
    io: &mut I,
) -> Result<Outcome> {
    let program = parser::parse(src)?;
    Ok(Machine::new(config).run(&program, io).await)
}
