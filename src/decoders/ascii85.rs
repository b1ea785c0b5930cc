//! ASCII85Decode (Base85) implementation.
//!
//! Decodes ASCII85/Base85 encoded data. This encoding represents 4 bytes
//! as 5 ASCII characters in the range '!' to 'u'.
//! Special case: 'z' represents 4 zero bytes (00000000).

use crate::decoders::ascii_hex::is_pdf_whitespace;
use crate::error::Result;
use crate::parser_config::ParserOptions;
use crate::stream::{FilterDecoder, FilterStream, Stream, StreamKind};

/// An ASCII85Decode stage.
pub type Ascii85Stream = FilterStream<Ascii85Decoder>;

/// Streaming ASCII85Decode state.
///
/// Decodes one 5-character group at a time into a 4-byte holding area.
#[derive(Debug, Default)]
pub struct Ascii85Decoder {
    group: [u8; 4],
    group_pos: usize,
    group_len: usize,
    eof: bool,
}

impl Ascii85Decoder {
    /// Fresh decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next group from upstream into `self.group`.
    fn next_group(&mut self, upstream: &mut dyn Stream) {
        let mut digits = [0u8; 5];
        let mut count = 0;

        while count < 5 {
            let Some(c) = upstream.get_char() else {
                self.eof = true;
                break;
            };
            match c {
                b'~' => {
                    // End marker '~>'
                    if upstream.look_char() == Some(b'>') {
                        upstream.get_char();
                    }
                    self.eof = true;
                    break;
                },
                b'z' if count == 0 => {
                    self.group = [0; 4];
                    self.group_pos = 0;
                    self.group_len = 4;
                    return;
                },
                b'!'..=b'u' => {
                    digits[count] = c - b'!';
                    count += 1;
                },
                _ if is_pdf_whitespace(c) => {},
                _ => log::warn!("ASCII85Decode: skipping illegal character 0x{:02x}", c),
            }
        }

        self.group_pos = 0;
        self.group_len = 0;
        match count {
            0 => {},
            1 => log::warn!("ASCII85Decode: dropping incomplete final group of 1 character"),
            _ => {
                // Pad with 'u' (84 = 117 - 33) to complete the group
                digits[count..].fill(84);
                let acc = digits.iter().fold(0u64, |acc, &d| acc * 85 + d as u64);
                if acc > u32::MAX as u64 {
                    log::warn!("ASCII85Decode: group value overflows 32 bits");
                }
                self.group = (acc as u32).to_be_bytes();
                self.group_len = count - 1;
            },
        }
    }
}

impl FilterDecoder for Ascii85Decoder {
    fn kind(&self) -> StreamKind {
        StreamKind::Ascii85
    }

    fn get_some_chars(&mut self, upstream: &mut dyn Stream, out: &mut [u8]) -> usize {
        let mut n = 0;
        while n < out.len() {
            if self.group_pos == self.group_len {
                if self.eof {
                    break;
                }
                self.next_group(upstream);
                continue;
            }
            let take = (out.len() - n).min(self.group_len - self.group_pos);
            out[n..n + take].copy_from_slice(&self.group[self.group_pos..self.group_pos + take]);
            self.group_pos += take;
            n += take;
        }
        n
    }

    fn reset(&mut self) -> Result<()> {
        *self = Self::default();
        Ok(())
    }

    fn binary_input(&self) -> bool {
        false
    }

    fn ps_filter_op(&self) -> Option<(u32, String)> {
        Some((2, "/ASCII85Decode filter".to_string()))
    }
}

impl FilterStream<Ascii85Decoder> {
    /// ASCII85Decode stage over `upstream`.
    pub fn new(upstream: Box<dyn Stream>, options: &ParserOptions) -> Self {
        FilterStream::from_decoder(upstream, Ascii85Decoder::new(), options)
    }
}
