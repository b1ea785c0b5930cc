//! ASCIIHexDecode implementation.
//!
//! Decodes hexadecimal-encoded data (e.g., "48656C6C6F" -> "Hello").
//! Whitespace is ignored, `>` ends the data, and an odd final digit is
//! padded with an implicit '0'.

use crate::error::Result;
use crate::stream::{FilterDecoder, FilterStream, Stream, StreamKind};

/// An ASCIIHexDecode stage.
pub type AsciiHexStream = FilterStream<AsciiHexDecoder>;

/// Streaming ASCIIHexDecode state.
#[derive(Debug, Default)]
pub struct AsciiHexDecoder {
    eof: bool,
}

impl AsciiHexDecoder {
    /// Fresh decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next hex digit value from upstream, skipping whitespace and junk.
    fn next_digit(&mut self, upstream: &mut dyn Stream) -> Option<u8> {
        loop {
            let c = upstream.get_char()?;
            if c == b'>' {
                self.eof = true;
                return None;
            }
            if let Some(v) = hex_digit_to_value(c) {
                return Some(v);
            }
            if !is_pdf_whitespace(c) {
                log::warn!("ASCIIHexDecode: skipping illegal character 0x{:02x}", c);
            }
        }
    }
}

impl FilterDecoder for AsciiHexDecoder {
    fn kind(&self) -> StreamKind {
        StreamKind::AsciiHex
    }

    fn get_some_chars(&mut self, upstream: &mut dyn Stream, out: &mut [u8]) -> usize {
        let mut n = 0;
        while n < out.len() && !self.eof {
            let Some(high) = self.next_digit(upstream) else {
                self.eof = true;
                break;
            };
            let low = if self.eof {
                0
            } else {
                match self.next_digit(upstream) {
                    Some(v) => v,
                    None => {
                        self.eof = true;
                        0
                    },
                }
            };
            out[n] = (high << 4) | low;
            n += 1;
        }
        n
    }

    fn reset(&mut self) -> Result<()> {
        self.eof = false;
        Ok(())
    }

    fn binary_input(&self) -> bool {
        false
    }

    fn ps_filter_op(&self) -> Option<(u32, String)> {
        Some((2, "/ASCIIHexDecode filter".to_string()))
    }
}

impl FilterStream<AsciiHexDecoder> {
    /// ASCIIHexDecode stage over `upstream`.
    pub fn new(upstream: Box<dyn Stream>, options: &crate::parser_config::ParserOptions) -> Self {
        FilterStream::from_decoder(upstream, AsciiHexDecoder::new(), options)
    }
}

/// Convert a hexadecimal ASCII character to its numeric value.
pub(crate) fn hex_digit_to_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        _ => None,
    }
}

/// PDF whitespace: NUL, TAB, LF, FF, CR and space.
pub(crate) fn is_pdf_whitespace(c: u8) -> bool {
    matches!(c, 0 | b'\t' | b'\n' | 0x0c | b'\r' | b' ')
}
