//! Execution engine: a cooperative tape machine.
//!
//! ```rust
//! use bfloat::engine::{BufferedIo, Machine, Outcome};
//! use bfloat::parser::parse;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let program = parse(",.").unwrap();
//! let mut machine = Machine::default();
//! let mut io = BufferedIo::new([65u8]);
//! assert_eq!(machine.run(&program, &mut io).await, Outcome::Completed);
//! assert_eq!(io.output, vec![65]);
//! # });
//! ```

pub mod io;
pub mod machine;
pub mod tape;

pub use io::{BufferedIo, CancelToken, ChannelIo, Input, MachineIo};
pub use machine::{Machine, Outcome};
pub use tape::Tape;
