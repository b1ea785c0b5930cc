//! FlateDecode (zlib/deflate) implementation.
//!
//! This is the most common PDF compression filter, used in ~90% of PDFs.
//! Decoding is incremental: compressed input is staged from the upstream in
//! fixed-size chunks and inflated with a synchronous flush, so every call
//! returns whatever output the data seen so far can produce.

use crate::decoders::DecodeParams;
use crate::error::Result;
use crate::parser_config::ParserOptions;
use crate::stream::{FilterDecoder, FilterStream, Stream, StreamKind};
use flate2::{Decompress, FlushDecompress, Status};

/// Outcome of the last inflate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlateStatus {
    /// Progress was made; more output may follow
    Ok,
    /// The decompressor needs more input (not fatal)
    BufferExhausted,
    /// End of the compressed stream was reached
    StreamEnd,
    /// Corrupt or truncated data, or the size limit was hit
    Error,
}

impl FlateStatus {
    /// Terminal states produce no further output until a reset.
    pub fn is_terminal(self) -> bool {
        matches!(self, FlateStatus::StreamEnd | FlateStatus::Error)
    }
}

/// A FlateDecode filter stage.
pub type FlateStream = FilterStream<FlateDecoder>;

/// Inflate state of one flate filter.
pub struct FlateDecoder {
    inflater: Decompress,
    /// Decided from the first two staged bytes; `None` until then
    zlib_header: Option<bool>,
    status: FlateStatus,
    in_buf: Vec<u8>,
    in_pos: usize,
    in_len: usize,
    params: DecodeParams,
    options: ParserOptions,
}

impl FlateDecoder {
    /// New decoder. `params` are kept for predictor stages layered on top;
    /// inflating itself does not use them.
    pub fn new(params: DecodeParams, options: &ParserOptions) -> Self {
        Self {
            inflater: Decompress::new(true),
            zlib_header: None,
            status: FlateStatus::Ok,
            in_buf: vec![0; options.flate_chunk_size.max(1)],
            in_pos: 0,
            in_len: 0,
            params,
            options: *options,
        }
    }

    /// Status of the last inflate step.
    pub fn status(&self) -> FlateStatus {
        self.status
    }

    /// Decode parameters this filter was declared with.
    pub fn params(&self) -> &DecodeParams {
        &self.params
    }

    /// Total compressed bytes consumed since the last reset.
    pub fn total_in(&self) -> u64 {
        self.inflater.total_in()
    }

    /// Total bytes produced since the last reset.
    pub fn total_out(&self) -> u64 {
        self.inflater.total_out()
    }

    /// Pick zlib or raw deflate from the first staged bytes.
    ///
    /// Some producers write raw deflate data under /FlateDecode; a valid
    /// zlib header has compression method 8 and a header checksum divisible
    /// by 31.
    fn detect_header(&mut self) {
        let zlib = if self.in_len >= 2 {
            let cmf = self.in_buf[0];
            let flg = self.in_buf[1];
            cmf & 0x0F == 8 && (u16::from(cmf) << 8 | u16::from(flg)) % 31 == 0
        } else {
            true
        };
        if !zlib {
            log::debug!(
                "FlateDecode: no zlib header (0x{:02x} 0x{:02x}), decoding raw deflate",
                self.in_buf[0],
                self.in_buf[1]
            );
            self.inflater.reset(false);
        }
        self.zlib_header = Some(zlib);
    }

    fn refill(&mut self, upstream: &mut dyn Stream) -> bool {
        self.in_pos = 0;
        self.in_len = upstream.get_chars(&mut self.in_buf);
        log::trace!("FlateDecode: staged {} bytes", self.in_len);
        if self.in_len == 0 {
            return false;
        }
        if self.zlib_header.is_none() {
            self.detect_header();
        }
        true
    }
}

impl FilterDecoder for FlateDecoder {
    fn kind(&self) -> StreamKind {
        StreamKind::Flate
    }

    fn get_some_chars(&mut self, upstream: &mut dyn Stream, out: &mut [u8]) -> usize {
        if out.is_empty() {
            return 0;
        }
        loop {
            // BufferExhausted only means the last step wanted more input.
            if self.status.is_terminal() {
                return 0;
            }

            // Once the upstream is dry, keep stepping with no input: the
            // inflater may still hold decoded bytes from its window.
            let exhausted = self.in_pos == self.in_len && !self.refill(upstream);
            if exhausted && self.inflater.total_in() == 0 {
                self.status = FlateStatus::StreamEnd;
                return 0;
            }

            let before_in = self.inflater.total_in();
            let before_out = self.inflater.total_out();
            let res = self.inflater.decompress(
                &self.in_buf[self.in_pos..self.in_len],
                out,
                FlushDecompress::Sync,
            );
            let consumed = (self.inflater.total_in() - before_in) as usize;
            let mut produced = (self.inflater.total_out() - before_out) as usize;
            self.in_pos += consumed;

            self.status = match res {
                Ok(Status::Ok) => FlateStatus::Ok,
                Ok(Status::BufError) => FlateStatus::BufferExhausted,
                Ok(Status::StreamEnd) => FlateStatus::StreamEnd,
                Err(e) => {
                    log::warn!(
                        "FlateDecode: corrupt data after {} bytes of output: {}",
                        self.inflater.total_out(),
                        e
                    );
                    FlateStatus::Error
                },
            };

            if !self.options.allows_decompressed(self.inflater.total_out()) {
                log::warn!(
                    "FlateDecode: output exceeds limit of {} bytes, stopping",
                    self.options.max_decompressed_size
                );
                produced = (self.options.max_decompressed_size as u64).saturating_sub(before_out)
                    as usize;
                self.status = FlateStatus::Error;
            }

            if produced > 0 {
                return produced.min(out.len());
            }
            if exhausted && !self.status.is_terminal() {
                log::warn!(
                    "FlateDecode: input ended before end of compressed data ({} in, {} out)",
                    self.inflater.total_in(),
                    self.inflater.total_out()
                );
                self.status = FlateStatus::Error;
                return 0;
            }
            if consumed == 0 && !self.status.is_terminal() && self.in_pos < self.in_len {
                log::warn!("FlateDecode: decompressor made no progress, giving up");
                self.status = FlateStatus::Error;
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.inflater.reset(true);
        self.zlib_header = None;
        self.status = FlateStatus::Ok;
        self.in_pos = 0;
        self.in_len = 0;
        Ok(())
    }

    fn ps_filter_op(&self) -> Option<(u32, String)> {
        Some((3, "<< >> /FlateDecode filter".to_string()))
    }

    fn unconsumed(&self) -> &[u8] {
        &self.in_buf[self.in_pos..self.in_len]
    }

    fn discard_unconsumed(&mut self) {
        self.in_pos = self.in_len;
    }
}

impl std::fmt::Debug for FlateDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlateDecoder")
            .field("status", &self.status)
            .field("zlib_header", &self.zlib_header)
            .field("total_in", &self.inflater.total_in())
            .field("total_out", &self.inflater.total_out())
            .field("params", &self.params)
            .finish()
    }
}

impl FilterStream<FlateDecoder> {
    /// Flate filter over `upstream` with the declared row geometry.
    pub fn new(upstream: Box<dyn Stream>, columns: usize, colors: usize, bits: usize) -> Self {
        let params = DecodeParams {
            columns,
            colors,
            bits_per_component: bits,
            ..DecodeParams::default()
        };
        Self::with_options(upstream, params, &ParserOptions::default())
    }

    /// Flate filter with explicit parameters and options.
    pub fn with_options(
        upstream: Box<dyn Stream>,
        params: DecodeParams,
        options: &ParserOptions,
    ) -> Self {
        FilterStream::from_decoder(upstream, FlateDecoder::new(params, options), options)
    }

    /// Status of the last inflate step.
    pub fn status(&self) -> FlateStatus {
        self.decoder().status()
    }

    /// Decode parameters this filter was declared with.
    pub fn params(&self) -> &DecodeParams {
        self.decoder().params()
    }
}
