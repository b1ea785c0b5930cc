//! Generic decorator turning a [`FilterDecoder`] into a [`Stream`].

use super::{MemoryStream, Stream, StreamKind};
use crate::error::{Error, Result};
use crate::parser_config::ParserOptions;
use std::io::SeekFrom;

/// Decoding step of a filter.
///
/// The decoder never owns its upstream. [`FilterStream`] holds both and
/// passes the upstream into every call, which keeps each filter ignorant of
/// everything below its immediate input.
pub trait FilterDecoder {
    /// Kind reported by the wrapping stream.
    fn kind(&self) -> StreamKind;

    /// Decode at most `out.len()` bytes pulled from `upstream`.
    ///
    /// Must make bounded forward progress: consume input, produce output, or
    /// reach a terminal state. Returns `0` only at end of data or after a
    /// sticky failure.
    fn get_some_chars(&mut self, upstream: &mut dyn Stream, out: &mut [u8]) -> usize;

    /// Reinitialize decoder state. The upstream has already been reset.
    fn reset(&mut self) -> Result<()>;

    /// Whether this filter's encoded input is binary.
    fn binary_input(&self) -> bool {
        true
    }

    /// Minimum PostScript level and operator text for [`Stream::ps_filter`].
    fn ps_filter_op(&self) -> Option<(u32, String)> {
        None
    }

    /// Input bytes staged from upstream but not yet decoded.
    fn unconsumed(&self) -> &[u8] {
        &[]
    }

    /// Forget the bytes reported by [`FilterDecoder::unconsumed`].
    fn discard_unconsumed(&mut self) {}
}

/// A filter stage: owns its upstream and buffers decoded output so single
/// bytes can be read and peeked.
pub struct FilterStream<D: FilterDecoder> {
    upstream: Box<dyn Stream>,
    decoder: D,
    buf: Vec<u8>,
    buf_pos: usize,
    buf_len: usize,
    /// Decoded bytes handed out since the last reset
    pos: u64,
}

impl<D: FilterDecoder> FilterStream<D> {
    /// Wrap `upstream` with `decoder`.
    pub fn from_decoder(upstream: Box<dyn Stream>, decoder: D, options: &ParserOptions) -> Self {
        Self {
            upstream,
            decoder,
            buf: vec![0; options.filter_buffer_size.max(1)],
            buf_pos: 0,
            buf_len: 0,
            pos: 0,
        }
    }

    /// The decoder state.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The stream this filter decodes.
    pub fn upstream(&self) -> &dyn Stream {
        self.upstream.as_ref()
    }

    /// Tear the filter down and return its upstream.
    ///
    /// Input the decoder staged but never decoded is pushed back first, so
    /// the upstream's position matches what the filter really consumed.
    pub fn into_inner(mut self) -> Box<dyn Stream> {
        self.flush_back();
        std::mem::replace(&mut self.upstream, Box::new(MemoryStream::empty()))
    }

    fn flush_back(&mut self) {
        let pending = self.decoder.unconsumed();
        if !pending.is_empty() {
            log::trace!(
                "{:?}: returning {} staged bytes to upstream",
                self.decoder.kind(),
                pending.len()
            );
            self.upstream.unread(pending);
        }
        self.decoder.discard_unconsumed();
    }

    fn purge_buffer(&mut self) {
        self.buf_pos = 0;
        self.buf_len = 0;
    }

    fn fill_buffer(&mut self) -> bool {
        if self.buf_pos < self.buf_len {
            return true;
        }
        let n = self
            .decoder
            .get_some_chars(self.upstream.as_mut(), &mut self.buf);
        self.buf_len = n.min(self.buf.len());
        self.buf_pos = 0;
        self.buf_len > 0
    }
}

impl<D: FilterDecoder> Drop for FilterStream<D> {
    fn drop(&mut self) {
        self.flush_back();
    }
}

impl<D: FilterDecoder> Stream for FilterStream<D> {
    fn kind(&self) -> StreamKind {
        self.decoder.kind()
    }

    fn reset(&mut self) -> Result<()> {
        self.upstream.reset()?;
        self.decoder.reset()?;
        self.purge_buffer();
        self.pos = 0;
        Ok(())
    }

    fn get_char(&mut self) -> Option<u8> {
        if !self.fill_buffer() {
            return None;
        }
        let c = self.buf[self.buf_pos];
        self.buf_pos += 1;
        self.pos += 1;
        Some(c)
    }

    fn look_char(&mut self) -> Option<u8> {
        if !self.fill_buffer() {
            return None;
        }
        Some(self.buf[self.buf_pos])
    }

    fn get_some_chars(&mut self, out: &mut [u8]) -> usize {
        if out.is_empty() {
            return 0;
        }
        let n = if self.buf_pos < self.buf_len {
            let n = out.len().min(self.buf_len - self.buf_pos);
            out[..n].copy_from_slice(&self.buf[self.buf_pos..self.buf_pos + n]);
            self.buf_pos += n;
            n
        } else {
            self.decoder
                .get_some_chars(self.upstream.as_mut(), out)
                .min(out.len())
        };
        self.pos += n as u64;
        n
    }

    fn get_pos(&self) -> Option<u64> {
        Some(self.pos)
    }

    fn set_pos(&mut self, _pos: SeekFrom) -> Result<()> {
        Err(Error::Unsupported(format!(
            "cannot seek a {:?} filter stream",
            self.decoder.kind()
        )))
    }

    fn unread(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let pending = self.buf_len - self.buf_pos;
        let mut merged = Vec::with_capacity(bytes.len() + pending);
        merged.extend_from_slice(bytes);
        merged.extend_from_slice(&self.buf[self.buf_pos..self.buf_len]);
        if merged.len() > self.buf.len() {
            self.buf.resize(merged.len(), 0);
        }
        self.buf[..merged.len()].copy_from_slice(&merged);
        self.buf_pos = 0;
        self.buf_len = merged.len();
        self.pos = self.pos.saturating_sub(bytes.len() as u64);
    }

    fn is_binary(&self, _last: bool) -> bool {
        self.upstream.is_binary(self.decoder.binary_input())
    }

    fn ps_filter(&self, ps_level: u32, indent: &str) -> Option<String> {
        let (min_level, op) = self.decoder.ps_filter_op()?;
        if ps_level < min_level {
            return None;
        }
        let mut s = self.upstream.ps_filter(ps_level, indent)?;
        s.push_str(indent);
        s.push_str(&op);
        s.push('\n');
        Some(s)
    }
}

impl<D: FilterDecoder + std::fmt::Debug> std::fmt::Debug for FilterStream<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStream")
            .field("decoder", &self.decoder)
            .field("upstream", &self.upstream.kind())
            .field("pos", &self.pos)
            .finish()
    }
}
