//! In-memory byte source.

use super::{resolve_seek, Stream, StreamKind};
use crate::error::Result;
use bytes::Bytes;
use std::io::SeekFrom;

/// Seekable stream over a window of a shared buffer.
///
/// Cloning the underlying [`Bytes`] is cheap, so any number of independently
/// positioned views can read the same origin (see [`MemoryStream::sub_stream`]).
/// Positions are absolute offsets into the shared buffer.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    data: Bytes,
    start: usize,
    end: usize,
    pos: usize,
    kind: StreamKind,
}

impl MemoryStream {
    /// Stream over all of `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let end = data.len();
        Self {
            data,
            start: 0,
            end,
            pos: 0,
            kind: StreamKind::Memory,
        }
    }

    /// Stream over content synthesized in memory with no file backing.
    ///
    /// Its kind is [`StreamKind::Weird`], so consumers such as the lexer
    /// report its position as unknown.
    pub fn pseudo(data: impl Into<Bytes>) -> Self {
        Self {
            kind: StreamKind::Weird,
            ..Self::new(data)
        }
    }

    /// An empty stream.
    pub fn empty() -> Self {
        Self::new(Bytes::new())
    }

    /// Independent view of `len` bytes starting at absolute offset `start`.
    ///
    /// The window is clamped to this stream's own window.
    pub fn sub_stream(&self, start: u64, len: Option<u64>) -> Self {
        let start = (start.min(self.end as u64) as usize).max(self.start);
        let end = match len {
            Some(len) => start.saturating_add(len.min(usize::MAX as u64) as usize).min(self.end),
            None => self.end,
        };
        Self {
            data: self.data.clone(),
            start,
            end,
            pos: start,
            kind: self.kind,
        }
    }

    /// Absolute offset of the first byte of this view.
    pub fn start(&self) -> u64 {
        self.start as u64
    }

    /// Number of bytes in this view.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether this view is empty.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..self.end]
    }
}

impl Stream for MemoryStream {
    fn kind(&self) -> StreamKind {
        self.kind
    }

    fn reset(&mut self) -> Result<()> {
        self.pos = self.start;
        Ok(())
    }

    fn get_char(&mut self) -> Option<u8> {
        let c = self.look_char()?;
        self.pos += 1;
        Some(c)
    }

    fn look_char(&mut self) -> Option<u8> {
        if self.pos < self.end {
            Some(self.data[self.pos])
        } else {
            None
        }
    }

    fn get_some_chars(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.end - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    fn get_pos(&self) -> Option<u64> {
        Some(self.pos as u64)
    }

    fn set_pos(&mut self, pos: SeekFrom) -> Result<()> {
        self.pos = resolve_seek(pos, self.start as u64, self.pos as u64, self.end as u64) as usize;
        Ok(())
    }

    fn unread(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(self.pos - self.start);
        if n < bytes.len() {
            log::debug!(
                "MemoryStream: cannot unread {} bytes before start of view",
                bytes.len() - n
            );
        }
        self.pos -= n;
    }

    fn is_binary(&self, last: bool) -> bool {
        last
    }

    fn ps_filter(&self, _ps_level: u32, _indent: &str) -> Option<String> {
        Some(String::new())
    }
}
