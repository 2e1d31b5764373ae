//! The engine's view of its host.
//!
//! [`MachineIo`] is the whole collaborator contract: an async byte source
//! that may answer with [`Input::Cancel`], synchronous output and dump
//! sinks, and a cancellation poll.  Two hosts ship with the crate:
//!
//! - [`BufferedIo`]: scripted input, captured output; used by tests and by
//!   callers that have all input up front.
//! - [`ChannelIo`]: interactive; input arrives over a tokio channel and a
//!   [`CancelToken`] can interrupt a pending read.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Notify};

use crate::config::Cell;
use crate::dump::format_dump;

// ── Contract ──────────────────────────────────────────────────────────────────

/// Answer to an input request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Byte(u8),
    /// Stop the whole execution.  Not an error.
    Cancel,
}

#[allow(async_fn_in_trait)]
pub trait MachineIo {
    /// Wait for the next input byte.
    async fn input(&mut self) -> Input;

    /// Receive the selected cell's value for a `.` instruction.
    fn output(&mut self, value: Cell);

    /// Receive the tape and pointer for a `~` instruction.
    fn dump(&mut self, _tape: &[Cell], _pointer: usize) {}

    /// Polled at every end-of-loop check.
    fn cancel_requested(&self) -> bool {
        false
    }
}

// ── CancelToken ───────────────────────────────────────────────────────────────

/// Shared, clonable stop request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`CancelToken::cancel`] has been called.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel
            // cannot slip in between.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

// ── BufferedIo ────────────────────────────────────────────────────────────────

/// Host with all input known in advance.
///
/// Running out of input answers [`Input::Cancel`].
#[derive(Debug, Default)]
pub struct BufferedIo {
    input: VecDeque<u8>,
    /// Every value handed to [`MachineIo::output`], in order.
    pub output: Vec<Cell>,
    /// Every formatted memory dump, in order.
    pub dumps: Vec<String>,
    /// Number of input requests made so far.
    pub input_requests: usize,
    cancel: Option<CancelToken>,
}

impl BufferedIo {
    pub fn new(input: impl AsRef<[u8]>) -> Self {
        Self {
            input: input.as_ref().iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Poll `token` at every end-of-loop check.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Output values truncated to bytes.
    pub fn output_bytes(&self) -> Vec<u8> {
        self.output.iter().map(|&v| v as u8).collect()
    }

    /// Output interpreted as text (values as code points).
    pub fn output_string(&self) -> String {
        self.output
            .iter()
            .filter_map(|&v| u32::try_from(v).ok().and_then(char::from_u32))
            .collect()
    }
}

impl MachineIo for BufferedIo {
    async fn input(&mut self) -> Input {
        self.input_requests += 1;
        self.input.pop_front().map_or(Input::Cancel, Input::Byte)
    }

    fn output(&mut self, value: Cell) {
        self.output.push(value);
    }

    fn dump(&mut self, tape: &[Cell], pointer: usize) {
        self.dumps.push(format_dump(tape, pointer));
    }

    fn cancel_requested(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

// ── ChannelIo ─────────────────────────────────────────────────────────────────

/// Interactive host: bytes arrive on a channel, output goes to a writer.
///
/// Every output value is written as the UTF-8 encoding of the code point it
/// names, so `65` writes `A` and `200` writes `È` (two bytes).  Values that
/// are not Unicode scalar values are logged and dropped.
///
/// Output is flushed after every value so it is visible before the next
/// input request.  A closed channel answers `eof_byte` if set, otherwise
/// [`Input::Cancel`].
pub struct ChannelIo<W: Write, D: Write> {
    input: mpsc::Receiver<u8>,
    cancel: CancelToken,
    out: W,
    dump_out: D,
    eof_byte: Option<u8>,
}

impl<W: Write, D: Write> ChannelIo<W, D> {
    pub fn new(input: mpsc::Receiver<u8>, cancel: CancelToken, out: W, dump_out: D) -> Self {
        Self {
            input,
            cancel,
            out,
            dump_out,
            eof_byte: None,
        }
    }

    pub fn with_eof_byte(mut self, byte: Option<u8>) -> Self {
        self.eof_byte = byte;
        self
    }

    /// Give back the output writers.
    pub fn into_writers(self) -> (W, D) {
        (self.out, self.dump_out)
    }

    fn write_value(&mut self, value: Cell) -> std::io::Result<()> {
        let Some(c) = u32::try_from(value).ok().and_then(char::from_u32) else {
            tracing::warn!(value, "output value is not a character; dropped");
            return Ok(());
        };
        let mut buf = [0u8; 4];
        self.out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write, D: Write> MachineIo for ChannelIo<W, D> {
    async fn input(&mut self) -> Input {
        if self.cancel.is_cancelled() {
            return Input::Cancel;
        }
        let eof_byte = self.eof_byte;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Input::Cancel,
            byte = self.input.recv() => match byte.or(eof_byte) {
                Some(b) => Input::Byte(b),
                None => Input::Cancel,
            },
        }
    }

    fn output(&mut self, value: Cell) {
        if let Err(e) = self.write_value(value) {
            tracing::error!("output failed: {e}; stopping");
            self.cancel.cancel();
        }
    }

    fn dump(&mut self, tape: &[Cell], pointer: usize) {
        let text = format_dump(tape, pointer);
        if let Err(e) = self
            .dump_out
            .write_all(text.as_bytes())
            .and_then(|()| self.dump_out.flush())
        {
            tracing::warn!("memory dump failed: {e}");
        }
    }

    fn cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
