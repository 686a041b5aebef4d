use serialport::SerialPort;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read};
use std::time::Duration;

#[derive(Debug)]
pub enum ReaderError {
    Open(serialport::Error),
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Open(err) => write!(f, "could not open serial port: {}", err),
        }
    }
}

impl std::error::Error for ReaderError {}

/// Opens the device link with a bounded read timeout, so a quiet line never
/// blocks the loop for longer than `timeout`.
pub fn open_port(
    path: &str,
    baud_rate: u32,
    timeout: Duration,
) -> Result<Box<dyn SerialPort>, ReaderError> {
    serialport::new(path, baud_rate)
        .timeout(timeout)
        .open()
        .map_err(ReaderError::Open)
}

/// Splits a byte stream into text lines, tolerating partial reads and
/// non-UTF-8 noise (decoded lossily, as the board occasionally garbles a
/// byte on power dips).
pub struct LineReader<R> {
    port: R,
    buffer: Vec<u8>,
    lines: VecDeque<String>,
}

impl<R: Read> LineReader<R> {
    pub fn new(port: R) -> Self {
        Self {
            port,
            buffer: Vec::new(),
            lines: VecDeque::new(),
        }
    }

    /// The next complete line, or `Ok(None)` when the read timed out with no
    /// full line available, which is a normal outcome, not an error.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.lines.pop_front() {
            return Ok(Some(line));
        }

        let mut chunk = [0u8; 256];
        match self.port.read(&mut chunk) {
            Ok(0) => Ok(None),
            Ok(n) => {
                self.buffer.extend_from_slice(&chunk[..n]);
                self.split_buffered();
                Ok(self.lines.pop_front())
            }
            Err(err)
                if err.kind() == io::ErrorKind::TimedOut
                    || err.kind() == io::ErrorKind::Interrupted =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn split_buffered(&mut self) {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw);
            self.lines.push_back(text.trim().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn splits_lines_and_strips_line_endings() {
        let mut reader = LineReader::new(Cursor::new(b"SOL V:1 I:2\r\nWND V:3 I:4\n".to_vec()));

        assert_eq!(reader.next_line().unwrap(), Some("SOL V:1 I:2".to_string()));
        assert_eq!(reader.next_line().unwrap(), Some("WND V:3 I:4".to_string()));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn holds_partial_lines_until_the_newline_arrives() {
        struct TwoChunks {
            chunks: Vec<Vec<u8>>,
        }
        impl Read for TwoChunks {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.chunks.pop() {
                    Some(chunk) => {
                        buf[..chunk.len()].copy_from_slice(&chunk);
                        Ok(chunk.len())
                    }
                    None => Ok(0),
                }
            }
        }

        let mut reader = LineReader::new(TwoChunks {
            chunks: vec![b" I:1200\n".to_vec(), b"SOL V:18.50".to_vec()],
        });

        // First chunk has no newline yet.
        assert_eq!(reader.next_line().unwrap(), None);
        assert_eq!(
            reader.next_line().unwrap(),
            Some("SOL V:18.50 I:1200".to_string())
        );
    }

    #[test]
    fn garbled_bytes_decode_lossily() {
        let mut reader = LineReader::new(Cursor::new(vec![0xff, b'L', b'U', b'X', b'\n']));
        let line = reader.next_line().unwrap().unwrap();
        assert!(line.ends_with("LUX"));
    }
}
