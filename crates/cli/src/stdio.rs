// Embedded Bank - UART Console Banking Demo
// Copyright (C) 2026 LabWired Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crossbeam_channel::{Receiver, RecvTimeoutError};
use embank_core::transport::{fill_line, Transport, TransportError};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Host stand-in for the UART: lines come from a reader thread so that
/// reads can honour a timeout.
pub struct StdioTransport<W: Write> {
    lines: Receiver<io::Result<Vec<u8>>>,
    out: W,
}

impl StdioTransport<io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<W: Write> StdioTransport<W> {
    pub fn new<R: Read + Send + 'static>(input: R, out: W) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        thread::spawn(move || {
            let mut reader = BufReader::new(input);
            loop {
                let mut line = Vec::new();
                match reader.read_until(b'\n', &mut line) {
                    Ok(0) => {
                        debug!("Console input reached EOF");
                        break;
                    }
                    Ok(_) => {
                        while matches!(line.last(), Some(b'\n') | Some(b'\r')) {
                            line.pop();
                        }
                        if tx.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
        });
        Self { lines: rx, out }
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> Transport for StdioTransport<W> {
    fn send(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
        {
            warn!("Console write failed: {}", e);
        }
    }

    fn read_line(
        &mut self,
        buf: &mut [u8],
        timeout: Option<Duration>,
    ) -> Result<usize, TransportError> {
        buf.fill(0);
        let received = match timeout {
            Some(t) => match self.lines.recv_timeout(t) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => return Ok(0),
                Err(RecvTimeoutError::Disconnected) => return Err(TransportError::Closed),
            },
            None => self.lines.recv().map_err(|_| TransportError::Closed)?,
        };
        let line = received?;
        Ok(fill_line(buf, &line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_then_closes() {
        let input = Cursor::new(b"N\r\nalice-has-a-very-long-name\n".to_vec());
        let mut t = StdioTransport::new(input, Vec::new());

        let mut option = [0u8; 2];
        assert_eq!(t.prompt("? ", &mut option, None).unwrap(), 1);
        assert_eq!(&option, b"N\0");

        let mut name = [0u8; 8];
        let n = t.read_line(&mut name, Some(Duration::from_secs(5))).unwrap();
        assert_eq!(n, 7);
        assert_eq!(&name, b"alice-h\0");

        assert!(matches!(t.read_line(&mut name, None), Err(TransportError::Closed)));
        assert_eq!(t.into_writer(), b"? ".to_vec());
    }

    #[test]
    fn test_timeout_yields_empty_line() {
        let (_tx, rx) = crossbeam_channel::unbounded();
        let mut t = StdioTransport {
            lines: rx,
            out: Vec::new(),
        };
        let mut buf = [0xFFu8; 4];
        let n = t.read_line(&mut buf, Some(Duration::from_millis(10))).unwrap();
        assert_eq!(n, 0);
        assert_eq!(buf, [0; 4]);
    }
}
