//! Output buffer with tail-search prompt detection.
//!
//! Only the last `search_depth` bytes are searched for a prompt; a long
//! `show` output never gets rescanned from the top on every read.

use bytes::BytesMut;
use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Collects printable output, dropping escape sequences and carriage returns.
#[derive(Default)]
struct Printable {
    out: Vec<u8>,
}

impl Perform for Printable {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out
            .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        // Keep line structure; IOS emits "\r\n" and bare "\r" on redraws.
        if byte == b'\n' || byte == b'\t' {
            self.out.push(byte);
        }
    }
}

/// Buffer for accumulating device output and searching it for prompts.
pub struct PatternBuffer {
    /// Cleaned output accumulated so far.
    buffer: BytesMut,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,

    /// Escape-sequence state carried across reads.
    parser: Parser,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
            parser: Parser::new(),
        }
    }

    /// Append raw channel data, stripping ANSI escapes and `\r`.
    ///
    /// The parser keeps its state between calls, so an escape sequence
    /// split across two SSH packets is still removed.
    pub fn extend(&mut self, data: &[u8]) {
        let mut printable = Printable::default();
        self.parser.advance(&mut printable, data);
        self.buffer.extend_from_slice(&printable.out);
    }

    /// Search only the tail of the buffer for the pattern.
    pub fn search_tail(&self, pattern: &Regex) -> Option<regex::bytes::Match<'_>> {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        pattern.find(&self.buffer[start..])
    }

    /// Check if the tail contains a pattern match.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        self.search_tail(pattern).is_some()
    }

    /// Take the buffer contents and reset.
    pub fn take(&mut self) -> Vec<u8> {
        self.buffer.split().to_vec()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"R1#show version");
        assert_eq!(buffer.as_slice(), b"R1#show version");
    }

    #[test]
    fn test_ansi_and_carriage_return_stripping() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"\x1b[32mup\x1b[0m\r\nR1#");
        assert_eq!(buffer.as_slice(), b"up\nR1#");
    }

    #[test]
    fn test_escape_split_across_reads() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"line\x1b[");
        buffer.extend(b"0mR1>");
        assert_eq!(buffer.as_slice(), b"lineR1>");
    }

    #[test]
    fn test_tail_search() {
        let mut buffer = PatternBuffer::new(20);
        buffer.extend(&[b'x'; 100]);
        buffer.extend(b"\nR1#");

        let pattern = Regex::new(r"R1#").unwrap();
        assert!(buffer.tail_contains(&pattern));
    }

    #[test]
    fn test_tail_search_not_in_tail() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"R1#");
        buffer.extend(&[b'x'; 100]);

        let pattern = Regex::new(r"R1#").unwrap();
        assert!(buffer.search_tail(&pattern).is_none());
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"test data");
        assert_eq!(buffer.take(), b"test data");
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }
}
