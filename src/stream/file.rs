//! File-backed byte source.

use super::{resolve_seek, Stream, StreamKind};
use crate::error::Result;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

const FILE_BUFFER_SIZE: usize = 16 * 1024;

/// Buffered, seekable stream over a window of a file.
///
/// Every buffer refill seeks explicitly, so views created with
/// [`FileStream::sub_stream`] can share the descriptor's cursor without
/// disturbing each other. I/O errors after construction end the stream and
/// are logged.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    start: u64,
    end: u64,
    buf: Vec<u8>,
    /// File offset of `buf[0]`
    buf_offset: u64,
    buf_pos: usize,
}

impl FileStream {
    /// Open `path` as a stream over the whole file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_file(file, 0, None)
    }

    /// Stream over `len` bytes of `file` starting at `start` (to EOF when `None`).
    pub fn from_file(file: File, start: u64, len: Option<u64>) -> Result<Self> {
        let file_len = file.metadata()?.len();
        let start = start.min(file_len);
        let end = match len {
            Some(len) => start.saturating_add(len).min(file_len),
            None => file_len,
        };
        Ok(Self {
            file,
            start,
            end,
            buf: Vec::with_capacity(FILE_BUFFER_SIZE),
            buf_offset: start,
            buf_pos: 0,
        })
    }

    /// Independent view over part of the same file.
    pub fn sub_stream(&self, start: u64, len: Option<u64>) -> Result<Self> {
        let start = start.clamp(self.start, self.end);
        let len = Some(len.unwrap_or(u64::MAX).min(self.end - start));
        Self::from_file(self.file.try_clone()?, start, len)
    }

    /// Absolute offset of the first byte of this view.
    pub fn start(&self) -> u64 {
        self.start
    }

    fn pos(&self) -> u64 {
        self.buf_offset + self.buf_pos as u64
    }

    fn fill(&mut self) -> bool {
        if self.buf_pos < self.buf.len() {
            return true;
        }
        let offset = self.pos();
        if offset >= self.end {
            return false;
        }
        let want = (self.end - offset).min(FILE_BUFFER_SIZE as u64) as usize;
        self.buf.resize(want, 0);
        let read = self
            .file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.read(&mut self.buf));
        match read {
            Ok(n) => {
                self.buf.truncate(n);
                self.buf_offset = offset;
                self.buf_pos = 0;
                n > 0
            },
            Err(e) => {
                log::warn!("FileStream: read at offset {} failed: {}", offset, e);
                self.buf.clear();
                self.buf_offset = offset;
                self.buf_pos = 0;
                false
            },
        }
    }

    fn jump(&mut self, target: u64) {
        let buf_end = self.buf_offset + self.buf.len() as u64;
        if target >= self.buf_offset && target <= buf_end {
            self.buf_pos = (target - self.buf_offset) as usize;
        } else {
            self.buf.clear();
            self.buf_offset = target;
            self.buf_pos = 0;
        }
    }
}

impl Stream for FileStream {
    fn kind(&self) -> StreamKind {
        StreamKind::File
    }

    fn reset(&mut self) -> Result<()> {
        self.jump(self.start);
        Ok(())
    }

    fn get_char(&mut self) -> Option<u8> {
        let c = self.look_char()?;
        self.buf_pos += 1;
        Some(c)
    }

    fn look_char(&mut self) -> Option<u8> {
        if self.fill() {
            Some(self.buf[self.buf_pos])
        } else {
            None
        }
    }

    fn get_some_chars(&mut self, buf: &mut [u8]) -> usize {
        if buf.is_empty() || !self.fill() {
            return 0;
        }
        let n = buf.len().min(self.buf.len() - self.buf_pos);
        buf[..n].copy_from_slice(&self.buf[self.buf_pos..self.buf_pos + n]);
        self.buf_pos += n;
        n
    }

    fn get_pos(&self) -> Option<u64> {
        Some(self.pos())
    }

    fn set_pos(&mut self, pos: SeekFrom) -> Result<()> {
        let target = resolve_seek(pos, self.start, self.pos(), self.end);
        self.jump(target);
        Ok(())
    }

    fn unread(&mut self, bytes: &[u8]) {
        let n = (bytes.len() as u64).min(self.pos() - self.start);
        self.jump(self.pos() - n);
    }

    fn is_binary(&self, last: bool) -> bool {
        last
    }

    fn ps_filter(&self, _ps_level: u32, _indent: &str) -> Option<String> {
        Some(String::new())
    }
}
