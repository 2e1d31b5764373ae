//! Frame-stack interpreter.
//!
//! Loops are not executed by recursion: each active loop body is a [`Frame`]
//! on an explicit stack, so the whole machine state lives in the `run`
//! future and survives any suspension.  The end of a block is the only
//! place where the engine yields on a timer or honours a cancellation poll.

use std::time::Instant;

use crate::config::{Cell, EngineConfig};
use crate::engine::io::{Input, MachineIo};
use crate::engine::tape::Tape;
use crate::parser::{Instruction, Program};

/// How an execution ended.  Neither variant is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Control fell off the end of the program.
    Completed,
    /// The host cancelled, either through input or the cancellation poll.
    Cancelled,
}

/// A block being executed and the index of the next instruction in it.
#[derive(Debug, Clone, Copy)]
struct Frame<'p> {
    block: &'p [Instruction],
    cursor: usize,
}

impl<'p> Frame<'p> {
    fn new(block: &'p [Instruction]) -> Self {
        Self { block, cursor: 0 }
    }

    fn at_end(&self) -> bool {
        self.cursor == self.block.len()
    }
}

/// One tape machine.  `run` borrows it mutably, so a machine executes at most
/// one program at a time; run two programs concurrently on two machines.
#[derive(Debug, Default)]
pub struct Machine {
    config: EngineConfig,
    tape: Tape,
}

impl Machine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            tape: Tape::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The tape as left by the last run.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    fn wrap(&self, value: Cell) -> Cell {
        self.config.cell_limit.wrap(value)
    }

    /// Execute `program` on a fresh tape.
    pub async fn run<I: MachineIo>(&mut self, program: &Program, io: &mut I) -> Outcome {
        self.tape.reset();
        tracing::debug!(
            instructions = program.instructions().len(),
            cell_limit = ?self.config.cell_limit,
            "execution started"
        );

        let mut frames = vec![Frame::new(program.instructions())];
        let mut last_yield = Instant::now();

        while let Some(frame) = frames.last_mut() {
            if frame.at_end() {
                if let Some(interval) = self.config.yield_interval {
                    if last_yield.elapsed() >= interval {
                        tracing::trace!(depth = frames.len(), "yielding");
                        tokio::task::yield_now().await;
                        last_yield = Instant::now();
                    }
                }
                if io.cancel_requested() {
                    tracing::debug!("execution cancelled by host");
                    return Outcome::Cancelled;
                }
                let depth = frames.len();
                match frames.last_mut() {
                    Some(frame) if depth > 1 && self.tape.get() != 0 => frame.cursor = 0,
                    _ => {
                        frames.pop();
                    }
                }
                continue;
            }

            let block = frame.block;
            let instr = &block[frame.cursor];
            frame.cursor += 1;

            match instr {
                Instruction::Increment => {
                    let v = self.wrap(self.tape.get().wrapping_add(1));
                    self.tape.set(v);
                }
                Instruction::Decrement => {
                    let v = self.wrap(self.tape.get().wrapping_sub(1));
                    self.tape.set(v);
                }
                Instruction::MoveLeft => self.tape.move_left(),
                Instruction::MoveRight => self.tape.move_right(),
                Instruction::Output => io.output(self.tape.get()),
                Instruction::Input => match io.input().await {
                    Input::Cancel => {
                        tracing::debug!("execution cancelled at input");
                        return Outcome::Cancelled;
                    }
                    Input::Byte(b) => {
                        let v = self.wrap(Cell::from(b));
                        self.tape.set(v);
                        last_yield = Instant::now();
                    }
                },
                Instruction::Dump => io.dump(self.tape.cells(), self.tape.pointer()),
                Instruction::Loop(body) => {
                    if self.tape.get() != 0 {
                        frames.push(Frame::new(body));
                    }
                }
            }
        }

        tracing::debug!(cells = self.tape.cells().len(), "execution finished");
        Outcome::Completed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;
    use std::time::Duration;

    use super::*;
    use crate::config::CellLimit;
    use crate::engine::io::{BufferedIo, CancelToken};
    use crate::parser::parse;

    async fn run_with(src: &str, config: EngineConfig, input: &[u8]) -> (Machine, BufferedIo, Outcome) {
        let program = parse(src).unwrap();
        let mut machine = Machine::new(config);
        let mut io = BufferedIo::new(input);
        let outcome = machine.run(&program, &mut io).await;
        (machine, io, outcome)
    }

    async fn run(src: &str, input: &[u8]) -> (Machine, BufferedIo, Outcome) {
        run_with(src, EngineConfig::default(), input).await
    }

    #[tokio::test]
    async fn empty_program_completes() {
        let (m, io, outcome) = run("", b"").await;
        assert_eq!(outcome, Outcome::Completed);
        assert!(io.output.is_empty());
        assert_eq!(m.tape().cells(), &[0]);
    }

    #[tokio::test]
    async fn echo_one_byte() {
        let (_, io, outcome) = run(",.", &[65]).await;
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(io.output, vec![65]);
        assert_eq!(io.input_requests, 1);
    }

    #[tokio::test]
    async fn hello_world() {
        let src = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
        let (_, io, outcome) = run(src, b"").await;
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(io.output_string(), "Hello World!\n");
    }

    #[tokio::test]
    async fn wraps_at_256_by_default() {
        let src = "+".repeat(256);
        let (m, _, _) = run(&src, b"").await;
        assert_eq!(m.tape().get(), 0);
        let (m, _, _) = run("-", b"").await;
        assert_eq!(m.tape().get(), 255);
    }

    #[tokio::test]
    async fn unbounded_cells_do_not_wrap() {
        let cfg = EngineConfig::new().with_cell_limit(CellLimit::Unbounded);
        let (m, _, _) = run_with(&"+".repeat(256), cfg, b"").await;
        assert_eq!(m.tape().get(), 256);
        let (m, _, _) = run_with("-", cfg, b"").await;
        assert_eq!(m.tape().get(), -1);
    }

    #[tokio::test]
    async fn small_cell_limit_wraps_decrement() {
        let cfg = EngineConfig::new().with_cell_limit(CellLimit::from_size(10).unwrap());
        let (m, _, _) = run_with("-", cfg, b"").await;
        assert_eq!(m.tape().get(), 9);
    }

    #[tokio::test]
    async fn smallest_cell_limit_pins_cells_to_zero() {
        let cfg = EngineConfig::new().with_cell_limit(CellLimit::Wrap(NonZeroU32::MIN));
        let (m, io, outcome) = run_with("+++.-.", cfg, b"").await;
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(io.output, vec![0, 0]);
        assert_eq!(m.tape().get(), 0);
    }

    #[tokio::test]
    async fn input_is_wrapped() {
        let cfg = EngineConfig::new().with_cell_limit(CellLimit::from_size(10).unwrap());
        let (m, _, _) = run_with(",", cfg, &[65]).await;
        assert_eq!(m.tape().get(), 5);
    }

    #[tokio::test]
    async fn move_left_of_origin_is_noop() {
        let (m, _, _) = run("<<+>+", b"").await;
        assert_eq!(m.tape().cells(), &[1, 1]);
        assert_eq!(m.tape().pointer(), 1);
    }

    #[tokio::test]
    async fn loop_skipped_when_cell_zero() {
        let (_, io, _) = run("[.]+.", b"").await;
        assert_eq!(io.output, vec![1]);
    }

    #[tokio::test]
    async fn nested_loops_multiply() {
        // 3 * 4 into cell 2
        let (m, _, _) = run("+++[>++++[>+<-]<-]", b"").await;
        assert_eq!(m.tape().cells(), &[0, 0, 12]);
    }

    #[tokio::test]
    async fn top_level_end_does_not_repeat() {
        let (_, io, outcome) = run("+.", b"").await;
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(io.output, vec![1]);
    }

    #[tokio::test]
    async fn cancel_at_input_stops_without_further_output() {
        let (_, io, outcome) = run(".,+.", b"").await;
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(io.output, vec![0]);
        assert_eq!(io.input_requests, 1);
    }

    #[tokio::test]
    async fn cat_until_cancel() {
        let (_, io, outcome) = run(",[.,]", b"abc").await;
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(io.output_bytes(), b"abc");
    }

    #[tokio::test]
    async fn dump_reports_tape_and_pointer() {
        let (m, io, _) = run("+>++~", b"").await;
        assert_eq!(io.dumps, vec!["0000:  01 >02\n".to_owned()]);
        assert_eq!(m.tape().cells(), &[1, 2]);
    }

    #[tokio::test]
    async fn cancellation_poll_stops_infinite_loop() {
        let token = CancelToken::new();
        let program = parse("+[]").unwrap();
        let mut machine = Machine::new(
            EngineConfig::new().with_yield_interval(Some(Duration::ZERO)),
        );
        let mut io = BufferedIo::default().with_cancel(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::task::yield_now().await;
            token.cancel();
        });
        let outcome = machine.run(&program, &mut io).await;
        assert_eq!(outcome, Outcome::Cancelled);
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn cancellation_polled_at_top_level_end() {
        let token = CancelToken::new();
        token.cancel();
        let program = parse("+.").unwrap();
        let mut machine = Machine::default();
        let mut io = BufferedIo::default().with_cancel(token);
        assert_eq!(machine.run(&program, &mut io).await, Outcome::Cancelled);
        assert_eq!(io.output, vec![1]);
    }

    #[tokio::test]
    async fn rerun_starts_from_fresh_tape() {
        let program = parse("+>+").unwrap();
        let mut machine = Machine::default();
        machine.run(&program, &mut BufferedIo::default()).await;
        machine.run(&program, &mut BufferedIo::default()).await;
        assert_eq!(machine.tape().cells(), &[1, 1]);
    }
}
