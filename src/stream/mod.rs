//! Pull-based byte streams.
//!
//! A pipeline is a singly linked chain of [`Stream`]s: a raw source at the
//! bottom ([`MemoryStream`], [`FileStream`]) and zero or more
//! [`FilterStream`]s stacked on top, each exclusively owning the stream it
//! decodes. Dropping the outermost stream tears down the whole chain.
//!
//! All operations are synchronous and return sentinels instead of errors once
//! the chain is built: `None` for end of data, `0` for an exhausted bulk read.

use crate::error::Result;
use std::io::SeekFrom;

mod file;
mod filter;
mod memory;
mod sequence;

pub use file::FileStream;
pub use filter::{FilterDecoder, FilterStream};
pub use memory::MemoryStream;
pub use sequence::StreamSequence;

/// The concrete variant behind a `dyn Stream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// File-backed source
    File,
    /// In-memory source
    Memory,
    /// Pseudo stream with no file backing; positions are meaningless
    Weird,
    /// FlateDecode filter
    Flate,
    /// ASCIIHexDecode filter
    AsciiHex,
    /// ASCII85Decode filter
    Ascii85,
    /// PNG/TIFF predictor layered on another filter
    Predictor,
}

impl StreamKind {
    /// Whether this is a decoding filter rather than a raw source.
    pub fn is_filter(self) -> bool {
        !matches!(self, StreamKind::File | StreamKind::Memory | StreamKind::Weird)
    }
}

/// Capability set shared by raw sources and filters.
pub trait Stream {
    /// Which variant this stream is.
    fn kind(&self) -> StreamKind;

    /// Re-establish the initial state so the content can be read again.
    ///
    /// Filters reset their upstream first and then their own decoder,
    /// discarding buffered output.
    fn reset(&mut self) -> Result<()>;

    /// Next byte, or `None` at end of data.
    fn get_char(&mut self) -> Option<u8>;

    /// Peek at the next byte without consuming it.
    fn look_char(&mut self) -> Option<u8>;

    /// Decode one bounded step into `buf`.
    ///
    /// Returns the number of bytes written, never more than `buf.len()`.
    /// A short count is not end of data; `0` is (or a sticky failure).
    fn get_some_chars(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.get_char() {
                Some(c) => {
                    buf[n] = c;
                    n += 1;
                },
                None => break,
            }
        }
        n
    }

    /// Fill as much of `buf` as the stream can provide.
    ///
    /// Loops over [`Stream::get_some_chars`] until `buf` is full or the
    /// stream is exhausted.
    fn get_chars(&mut self, buf: &mut [u8]) -> usize {
        let mut total = 0;
        while total < buf.len() {
            let n = self.get_some_chars(&mut buf[total..]);
            if n == 0 {
                break;
            }
            total += n;
        }
        total
    }

    /// Current position, or `None` when the stream has no meaningful offset.
    fn get_pos(&self) -> Option<u64>;

    /// Reposition the stream.
    ///
    /// Only raw sources can seek. Filters return `Error::Unsupported` and
    /// leave their state untouched, so callers should check [`Stream::kind`].
    fn set_pos(&mut self, pos: SeekFrom) -> Result<()>;

    /// Give back bytes that were pulled from this stream but not used.
    ///
    /// The next reads return `bytes` again, in order, before anything else.
    fn unread(&mut self, bytes: &[u8]);

    /// Whether the content must be treated as binary when embedded in a
    /// textual container. `last` is true for the outermost stream.
    fn is_binary(&self, last: bool) -> bool;

    /// PostScript filter declaration that re-creates this chain's encoding.
    ///
    /// Returns `None` when the chain cannot be expressed at `ps_level`.
    fn ps_filter(&self, ps_level: u32, indent: &str) -> Option<String>;
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn kind(&self) -> StreamKind {
        (**self).kind()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn get_char(&mut self) -> Option<u8> {
        (**self).get_char()
    }

    fn look_char(&mut self) -> Option<u8> {
        (**self).look_char()
    }

    fn get_some_chars(&mut self, buf: &mut [u8]) -> usize {
        (**self).get_some_chars(buf)
    }

    fn get_chars(&mut self, buf: &mut [u8]) -> usize {
        (**self).get_chars(buf)
    }

    fn get_pos(&self) -> Option<u64> {
        (**self).get_pos()
    }

    fn set_pos(&mut self, pos: SeekFrom) -> Result<()> {
        (**self).set_pos(pos)
    }

    fn unread(&mut self, bytes: &[u8]) {
        (**self).unread(bytes)
    }

    fn is_binary(&self, last: bool) -> bool {
        (**self).is_binary(last)
    }

    fn ps_filter(&self, ps_level: u32, indent: &str) -> Option<String> {
        (**self).ps_filter(ps_level, indent)
    }
}

/// Resolve a `SeekFrom` against a `[start, end]` window, clamping to it.
///
/// `End(n)` counts `n` bytes back from the end whatever its sign.
pub(crate) fn resolve_seek(pos: SeekFrom, start: u64, current: u64, end: u64) -> u64 {
    let target = match pos {
        SeekFrom::Start(off) => start.saturating_add(off),
        SeekFrom::End(off) => end.saturating_sub(off.unsigned_abs()),
        SeekFrom::Current(off) if off >= 0 => current.saturating_add(off as u64),
        SeekFrom::Current(off) => current.saturating_sub(off.unsigned_abs()),
    };
    target.clamp(start, end)
}
