//! PNG and TIFF predictor implementations for PDF stream decoding.
//!
//! PDF streams can use predictors to improve compression. These predictors
//! encode differences between adjacent samples, which are reversed here one
//! row at a time as the decoded data is pulled through the chain.

use crate::error::{Error, Result};
use crate::parser_config::ParserOptions;
use crate::stream::{FilterDecoder, FilterStream, Stream, StreamKind};

/// Highest number of color components a predictor row may declare.
const MAX_COLORS: usize = 32;

/// Largest row, in bits, a predictor stage will buffer.
const MAX_ROW_BITS: usize = i32::MAX as usize;

/// PNG predictor algorithms, as selected by each row's tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngPredictor {
    /// No prediction
    None = 0,
    /// Sub: each byte is the difference from the byte to its left
    Sub = 1,
    /// Up: each byte is the difference from the byte above
    Up = 2,
    /// Average: each byte is the difference from the average of left and above
    Average = 3,
    /// Paeth: uses the Paeth predictor function
    Paeth = 4,
}

impl PngPredictor {
    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(PngPredictor::None),
            1 => Some(PngPredictor::Sub),
            2 => Some(PngPredictor::Up),
            3 => Some(PngPredictor::Average),
            4 => Some(PngPredictor::Paeth),
            _ => None,
        }
    }
}

/// Decode parameters for stream decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeParams {
    /// Predictor algorithm (1 = none, 2 = TIFF, 10-15 = PNG)
    pub predictor: i64,
    /// Number of columns (width in samples)
    pub columns: usize,
    /// Number of color components per sample (default 1)
    pub colors: usize,
    /// Bits per component (default 8)
    pub bits_per_component: usize,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            predictor: 1, // No prediction
            columns: 1,
            colors: 1,
            bits_per_component: 8,
        }
    }
}

impl DecodeParams {
    /// Calculate the number of bytes per row.
    ///
    /// PNG predictors (10-15) add one tag byte in front of every row.
    pub fn bytes_per_row(&self) -> usize {
        let pixel_bytes = self.pixel_bytes_per_row();

        if self.predictor >= 10 {
            pixel_bytes + 1
        } else {
            pixel_bytes
        }
    }

    /// Calculate the number of bytes of actual pixel data per row (without predictor tag).
    pub fn pixel_bytes_per_row(&self) -> usize {
        (self.columns * self.colors * self.bits_per_component).div_ceil(8)
    }

    /// Bytes per complete pixel, at least 1.
    pub fn bytes_per_pixel(&self) -> usize {
        (self.colors * self.bits_per_component).div_ceil(8).max(1)
    }

    /// Check that the parameters describe a decodable row layout.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.predictor, 1 | 2 | 10..=15) {
            return Err(Error::InvalidParams(format!(
                "Unsupported predictor: {}",
                self.predictor
            )));
        }
        if self.columns == 0 {
            return Err(Error::InvalidParams("Columns must be positive".to_string()));
        }
        if self.colors == 0 || self.colors > MAX_COLORS {
            return Err(Error::InvalidParams(format!(
                "Colors must be between 1 and {}, got {}",
                MAX_COLORS, self.colors
            )));
        }
        if !matches!(self.bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(Error::InvalidParams(format!(
                "Unsupported bits per component: {}",
                self.bits_per_component
            )));
        }
        let row_bits = self
            .columns
            .checked_mul(self.colors)
            .and_then(|v| v.checked_mul(self.bits_per_component));
        match row_bits {
            Some(bits) if bits <= MAX_ROW_BITS => Ok(()),
            _ => Err(Error::InvalidParams(format!(
                "Row of {} columns is too large",
                self.columns
            ))),
        }
    }
}

/// Zero-filled row buffer; an allocation failure is reported instead of aborting.
fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        Error::InvalidParams(format!("Cannot allocate a {} byte predictor row: {}", len, e))
    })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// A predictor stage layered on top of another filter.
pub type PredictorStream = FilterStream<PredictorDecoder>;

/// Row-by-row predictor reversal.
#[derive(Debug)]
pub struct PredictorDecoder {
    params: DecodeParams,
    /// Encoded row as read from upstream, including the PNG tag byte
    raw: Vec<u8>,
    /// Previous decoded row (zeros before the first row)
    prev: Vec<u8>,
    /// Current decoded row
    row: Vec<u8>,
    row_pos: usize,
    row_len: usize,
    done: bool,
}

impl PredictorDecoder {
    /// New decoder for the given parameters.
    pub fn new(params: DecodeParams) -> Result<Self> {
        params.validate()?;
        let pixel_bytes = params.pixel_bytes_per_row();
        Ok(Self {
            raw: zeroed(params.bytes_per_row())?,
            prev: zeroed(pixel_bytes)?,
            row: zeroed(pixel_bytes)?,
            row_pos: 0,
            row_len: 0,
            done: false,
            params,
        })
    }

    /// Parameters this stage decodes with.
    pub fn params(&self) -> &DecodeParams {
        &self.params
    }

    /// Read and decode the next row. Returns false at end of data.
    fn next_row(&mut self, upstream: &mut dyn Stream) -> bool {
        let got = upstream.get_chars(&mut self.raw);
        if got == 0 {
            self.done = true;
            return false;
        }
        if got < self.raw.len() {
            log::debug!(
                "Predictor: short final row ({} of {} bytes)",
                got,
                self.raw.len()
            );
        }

        std::mem::swap(&mut self.prev, &mut self.row);
        if self.params.predictor >= 10 {
            let tag = self.raw[0];
            let len = got - 1;
            let algorithm = PngPredictor::from_tag(tag).unwrap_or_else(|| {
                log::warn!("Invalid PNG predictor tag: {}, treating row as unpredicted", tag);
                PngPredictor::None
            });
            self.decode_png_row(algorithm, len);
            self.row_len = len;
        } else if self.params.predictor == 1 {
            self.row[..got].copy_from_slice(&self.raw[..got]);
            self.row_len = got;
        } else {
            self.decode_tiff_row(got);
            self.row_len = got;
        }
        self.row_pos = 0;
        true
    }

    // Neighbouring bytes are read at i - bpp.
    #[allow(clippy::needless_range_loop)]
    fn decode_png_row(&mut self, algorithm: PngPredictor, len: usize) {
        let bpp = self.params.bytes_per_pixel();
        let encoded = &self.raw[1..1 + len];
        let prev = &self.prev;
        let row = &mut self.row;

        for i in 0..len {
            let left = if i >= bpp { row[i - bpp] } else { 0 };
            let up = prev[i];
            let up_left = if i >= bpp { prev[i - bpp] } else { 0 };
            let predicted = match algorithm {
                PngPredictor::None => 0,
                PngPredictor::Sub => left,
                PngPredictor::Up => up,
                PngPredictor::Average => ((left as u16 + up as u16) / 2) as u8,
                PngPredictor::Paeth => {
                    paeth_predictor(left as i16, up as i16, up_left as i16) as u8
                },
            };
            row[i] = encoded[i].wrapping_add(predicted);
        }
    }

    /// TIFF Predictor 2: each component is the difference from the same
    /// component of the pixel to its left.
    fn decode_tiff_row(&mut self, len: usize) {
        let colors = self.params.colors;
        let bits = self.params.bits_per_component;
        let row = &mut self.row;
        row[..len].copy_from_slice(&self.raw[..len]);

        match bits {
            8 => {
                for i in colors..len {
                    row[i] = row[i].wrapping_add(row[i - colors]);
                }
            },
            16 => {
                let step = colors * 2;
                let mut i = step;
                while i + 1 < len {
                    let left = u16::from_be_bytes([row[i - step], row[i - step + 1]]);
                    let cur = u16::from_be_bytes([row[i], row[i + 1]]);
                    let [hi, lo] = cur.wrapping_add(left).to_be_bytes();
                    row[i] = hi;
                    row[i + 1] = lo;
                    i += 2;
                }
            },
            _ => {
                let samples = len * 8 / bits;
                let mask = (1u16 << bits) - 1;
                for s in colors..samples {
                    let left = get_sample(row, s - colors, bits);
                    let cur = get_sample(row, s, bits);
                    set_sample(row, s, bits, (cur + left) & mask);
                }
            },
        }
    }
}

/// Read the `index`-th `bits`-wide sample (bits < 8) of a packed row.
fn get_sample(row: &[u8], index: usize, bits: usize) -> u16 {
    let bit = index * bits;
    let shift = 8 - bits - bit % 8;
    ((row[bit / 8] >> shift) as u16) & ((1u16 << bits) - 1)
}

fn set_sample(row: &mut [u8], index: usize, bits: usize, value: u16) {
    let bit = index * bits;
    let shift = 8 - bits - bit % 8;
    let mask = (((1u16 << bits) - 1) as u8) << shift;
    row[bit / 8] = (row[bit / 8] & !mask) | (((value as u8) << shift) & mask);
}

/// Paeth predictor function from PNG specification.
fn paeth_predictor(a: i16, b: i16, c: i16) -> i16 {
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

impl FilterDecoder for PredictorDecoder {
    fn kind(&self) -> StreamKind {
        StreamKind::Predictor
    }

    fn get_some_chars(&mut self, upstream: &mut dyn Stream, out: &mut [u8]) -> usize {
        if out.is_empty() || self.done {
            return 0;
        }
        while self.row_pos == self.row_len {
            if !self.next_row(upstream) {
                return 0;
            }
        }
        let n = out.len().min(self.row_len - self.row_pos);
        out[..n].copy_from_slice(&self.row[self.row_pos..self.row_pos + n]);
        self.row_pos += n;
        n
    }

    fn reset(&mut self) -> Result<()> {
        self.prev.fill(0);
        self.row.fill(0);
        self.row_pos = 0;
        self.row_len = 0;
        self.done = false;
        Ok(())
    }
}

impl FilterStream<PredictorDecoder> {
    /// Predictor stage over `upstream`; fails on unusable parameters.
    pub fn new(
        upstream: Box<dyn Stream>,
        params: DecodeParams,
        options: &ParserOptions,
    ) -> Result<Self> {
        let decoder = PredictorDecoder::new(params)?;
        Ok(FilterStream::from_decoder(upstream, decoder, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MemoryStream;

    fn decode(data: Vec<u8>, params: DecodeParams) -> Vec<u8> {
        let source = Box::new(MemoryStream::new(data));
        let mut stream =
            PredictorStream::new(source, params, &ParserOptions::default()).unwrap();
        let mut out = vec![0u8; 1024];
        let n = stream.get_chars(&mut out);
        out.truncate(n);
        out
    }

    fn png(columns: usize, colors: usize) -> DecodeParams {
        DecodeParams {
            predictor: 15,
            columns,
            colors,
            bits_per_component: 8,
        }
    }

    #[test]
    fn test_png_none_and_sub() {
        let data = vec![0, 1, 2, 3, 1, 1, 1, 1];
        assert_eq!(decode(data, png(3, 1)), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_png_up_uses_previous_row() {
        let data = vec![0, 10, 20, 2, 1, 1, 2, 1, 1];
        assert_eq!(decode(data, png(2, 1)), vec![10, 20, 11, 21, 12, 22]);
    }

    #[test]
    fn test_png_average_and_paeth() {
        // Row 1 raw [4, 8]; row 2 Average: [2 + 2, 1 + (4+8)/2] ; row 3 Paeth.
        let data = vec![0, 4, 8, 3, 2, 1, 4, 1, 1];
        let out = decode(data, png(2, 1));
        assert_eq!(&out[..2], &[4, 8]);
        assert_eq!(out[2], 4);
        assert_eq!(out[3], 1u8.wrapping_add(((4u16 + 8) / 2) as u8));
        // Paeth for i=0: left=0, up=4, up_left=0 -> up
        assert_eq!(out[4], 1 + 4);
    }

    #[test]
    fn test_png_multi_color_sub() {
        let data = vec![1, 10, 20, 1, 1];
        assert_eq!(decode(data, png(2, 2)), vec![10, 20, 11, 21]);
    }

    #[test]
    fn test_invalid_tag_treated_as_none() {
        let data = vec![9, 5, 6];
        assert_eq!(decode(data, png(2, 1)), vec![5, 6]);
    }

    #[test]
    fn test_short_final_row() {
        let data = vec![0, 1, 2, 3, 0, 7];
        assert_eq!(decode(data, png(3, 1)), vec![1, 2, 3, 7]);
    }

    #[test]
    fn test_tiff_8bit() {
        let params = DecodeParams {
            predictor: 2,
            columns: 3,
            colors: 1,
            bits_per_component: 8,
        };
        assert_eq!(decode(vec![10, 5, 5, 1, 1, 1], params), vec![10, 15, 20, 1, 2, 3]);
    }

    #[test]
    fn test_tiff_16bit() {
        let params = DecodeParams {
            predictor: 2,
            columns: 2,
            colors: 1,
            bits_per_component: 16,
        };
        assert_eq!(decode(vec![0x01, 0xff, 0x00, 0x02], params), vec![0x01, 0xff, 0x02, 0x01]);
    }

    #[test]
    fn test_tiff_4bit() {
        let params = DecodeParams {
            predictor: 2,
            columns: 4,
            colors: 1,
            bits_per_component: 4,
        };
        // Samples 1, 1, 1, 15 -> 1, 2, 3, 2 (wrapping at 16)
        assert_eq!(decode(vec![0x11, 0x1f], params), vec![0x12, 0x32]);
    }

    #[test]
    fn test_reset_restarts_rows() {
        let mut stream = PredictorStream::new(
            Box::new(MemoryStream::new(vec![2, 1, 2, 2, 1, 1])),
            png(2, 1),
            &ParserOptions::default(),
        )
        .unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(stream.get_chars(&mut buf), 4);
        assert_eq!(&buf[..4], &[1, 2, 2, 3]);
        stream.reset().unwrap();
        assert_eq!(stream.get_chars(&mut buf), 4);
        assert_eq!(&buf[..4], &[1, 2, 2, 3]);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let bad = [
            DecodeParams {
                predictor: 7,
                ..DecodeParams::default()
            },
            DecodeParams {
                columns: 0,
                ..DecodeParams::default()
            },
            DecodeParams {
                colors: 33,
                ..DecodeParams::default()
            },
            DecodeParams {
                bits_per_component: 3,
                ..DecodeParams::default()
            },
            DecodeParams {
                columns: usize::MAX,
                predictor: 12,
                ..DecodeParams::default()
            },
            // No usize overflow, but far larger than any real row
            DecodeParams {
                predictor: 12,
                columns: usize::MAX / 8,
                colors: 1,
                bits_per_component: 8,
            },
            DecodeParams {
                predictor: 2,
                columns: 1 << 27,
                colors: 4,
                bits_per_component: 16,
            },
        ];
        for params in bad {
            assert!(matches!(PredictorDecoder::new(params), Err(Error::InvalidParams(_))));
        }
    }

    #[test]
    fn test_no_ps_equivalent() {
        let stream = PredictorStream::new(
            Box::new(MemoryStream::empty()),
            png(1, 1),
            &ParserOptions::default(),
        )
        .unwrap();
        assert_eq!(stream.ps_filter(3, ""), None);
        assert_eq!(stream.kind(), StreamKind::Predictor);
    }
}
