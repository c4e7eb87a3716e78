//! Lexical chunker: byte chunks in, complete logical lines out.
//!
//! Touchstone input arrives in arbitrarily sized pieces; a logical line
//! may be split across any number of them. The chunker buffers the
//! partial tail and only ever surfaces whole lines, normalized so the
//! rest of the parser can match byte-literally:
//!
//! - ASCII upper-cased
//! - tabs replaced by spaces, carriage returns by newlines
//! - comments (`!` to end of line) stripped
//! - surrounding whitespace trimmed, empty lines dropped

/// Accumulates raw input and yields normalized logical lines.
#[derive(Debug, Default)]
pub struct LineChunker {
    buf: String,
}

impl LineChunker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of raw input bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.push_str(&String::from_utf8_lossy(chunk));
    }

    /// Drain every complete line buffered so far.
    ///
    /// With `eof` set the remainder is flushed as a final line even
    /// without a trailing newline; otherwise everything past the last
    /// newline stays buffered for the next chunk.
    pub fn take_lines(&mut self, eof: bool) -> Vec<String> {
        let mut text = std::mem::take(&mut self.buf);
        text.make_ascii_uppercase();
        let text = text.replace('\t', " ").replace('\r', "\n");

        let cut = if eof {
            text.len()
        } else {
            match text.rfind('\n') {
                Some(idx) => idx + 1,
                None => {
                    self.buf = text;
                    return Vec::new();
                }
            }
        };

        let mut lines = Vec::new();
        for raw in text[..cut].split('\n') {
            let uncommented = match raw.find('!') {
                Some(idx) => &raw[..idx],
                None => raw,
            };
            let line = uncommented.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }

        self.buf = text[cut..].to_string();
        lines
    }

    /// Discard all buffered input.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds_partial_line() {
        let mut chunker = LineChunker::new();
        chunker.push(b"# ghz s ma");
        assert!(chunker.take_lines(false).is_empty());

        chunker.push(b" r 50\n1.0 0.5");
        let lines = chunker.take_lines(false);
        assert_eq!(lines, vec!["# GHZ S MA R 50"]);

        chunker.push(b" 90\n");
        let lines = chunker.take_lines(false);
        assert_eq!(lines, vec!["1.0 0.5 90"]);
    }

    #[test]
    fn test_eof_flushes_tail() {
        let mut chunker = LineChunker::new();
        chunker.push(b"1.0 0.5 90");
        assert!(chunker.take_lines(false).is_empty());
        assert_eq!(chunker.take_lines(true), vec!["1.0 0.5 90"]);
    }

    #[test]
    fn test_strips_comments_and_blanks() {
        let mut chunker = LineChunker::new();
        chunker.push(b"! header comment\n\n  1.0 2.0 ! trailing\n!\n");
        assert_eq!(chunker.take_lines(false), vec!["1.0 2.0"]);
    }

    #[test]
    fn test_normalizes_tabs_and_crlf() {
        let mut chunker = LineChunker::new();
        chunker.push(b"1.0\t2.0\r\n3.0 4.0\r");
        let lines = chunker.take_lines(false);
        assert_eq!(lines, vec!["1.0 2.0", "3.0 4.0"]);
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut chunker = LineChunker::new();
        let mut lines = Vec::new();
        for byte in b"# hz s ri\n1 2 3\n" {
            chunker.push(&[*byte]);
            lines.extend(chunker.take_lines(false));
        }
        assert_eq!(lines, vec!["# HZ S RI", "1 2 3"]);
    }

    #[test]
    fn test_clear() {
        let mut chunker = LineChunker::new();
        chunker.push(b"partial");
        chunker.clear();
        assert!(chunker.take_lines(true).is_empty());
    }
}
