// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("transport fault")]
    Fault,
    #[error("input stream closed")]
    Closed,
}

/// Line/byte channel the console runs over (a UART on target).
pub trait Transport {
    /// Best-effort blocking write.
    fn send(&mut self, text: &str);

    /// Zero-fills `buf`, then reads at most `buf.len() - 1` bytes, stopping
    /// early at a carriage return. A timeout is not an error: it returns
    /// whatever was read, possibly nothing. `None` waits forever.
    fn read_line(&mut self, buf: &mut [u8], timeout: Option<Duration>)
        -> Result<usize, TransportError>;

    fn prompt(
        &mut self,
        text: &str,
        buf: &mut [u8],
        timeout: Option<Duration>,
    ) -> Result<usize, TransportError> {
        self.send(text);
        self.read_line(buf, timeout)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, text: &str) {
        (**self).send(text)
    }

    fn read_line(
        &mut self,
        buf: &mut [u8],
        timeout: Option<Duration>,
    ) -> Result<usize, TransportError> {
        (**self).read_line(buf, timeout)
    }
}

/// Copies one received line into a zero-filled `buf`, honouring the
/// terminator slot and the carriage-return cut-off. Returns bytes stored.
pub fn fill_line(buf: &mut [u8], line: &[u8]) -> usize {
    buf.fill(0);
    let max = buf.len().saturating_sub(1);
    let len = line
        .iter()
        .position(|&b| b == b'\r')
        .unwrap_or(line.len())
        .min(max);
    buf[..len].copy_from_slice(&line[..len]);
    len
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(Vec<u8>),
    /// The prompt expires with no input.
    Timeout,
    /// The read fails at the peripheral.
    Fault,
}

/// In-memory transport: replays queued input and records all output.
/// Reports [`TransportError::Closed`] once the queue is drained.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    input: VecDeque<InputEvent>,
    output: String,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut transport = Self::new();
        for line in lines {
            transport.push_line(line);
        }
        transport
    }

    pub fn push_line(&mut self, line: impl AsRef<[u8]>) {
        self.input.push_back(InputEvent::Line(line.as_ref().to_vec()));
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.input.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn read_line(
        &mut self,
        buf: &mut [u8],
        _timeout: Option<Duration>,
    ) -> Result<usize, TransportError> {
        buf.fill(0);
        match self.input.pop_front() {
            Some(InputEvent::Line(line)) => Ok(fill_line(buf, &line)),
            Some(InputEvent::Timeout) => Ok(0),
            Some(InputEvent::Fault) => Err(TransportError::Fault),
            None => Err(TransportError::Closed),
        }
    }
}
