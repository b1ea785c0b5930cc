//! Stream decoder implementations for PDF filters.
//!
//! This module provides decoders for the PDF filters a content stream reader
//! needs:
//! - FlateDecode (zlib/deflate) - most common
//! - ASCIIHexDecode - hexadecimal encoding
//! - ASCII85Decode - base85 encoding
//! - PNG/TIFF predictors layered on top of FlateDecode
//!
//! Every decoder is a [`FilterStream`](crate::stream::FilterStream) stage, so
//! filters can be chained together and pulled from one byte at a time.

use crate::error::{Error, Result};
use crate::parser_config::ParserOptions;
use crate::stream::{MemoryStream, Stream};

mod ascii85;
mod ascii_hex;
mod flate;
mod predictor;

pub use ascii85::{Ascii85Decoder, Ascii85Stream};
pub use ascii_hex::{AsciiHexDecoder, AsciiHexStream};
pub use flate::{FlateDecoder, FlateStatus, FlateStream};
pub use predictor::{DecodeParams, PngPredictor, PredictorDecoder, PredictorStream};

pub(crate) use ascii_hex::{hex_digit_to_value, is_pdf_whitespace};

/// Size of the chunks [`decode_stream`] pulls from a filter chain.
const DRAIN_CHUNK_SIZE: usize = 8192;

/// PDF stream filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// FlateDecode (deflate/zlib compression)
    FlateDecode,
    /// ASCIIHexDecode (hexadecimal encoding)
    ASCIIHexDecode,
    /// ASCII85Decode (base-85 encoding)
    ASCII85Decode,
}

impl Filter {
    /// Parse a filter name, accepting the inline image abbreviations.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "FlateDecode" | "Fl" => Ok(Filter::FlateDecode),
            "ASCIIHexDecode" | "AHx" => Ok(Filter::ASCIIHexDecode),
            "ASCII85Decode" | "A85" => Ok(Filter::ASCII85Decode),
            _ => Err(Error::UnsupportedFilter(name.to_string())),
        }
    }

    /// Full filter name as written in a stream dictionary.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::FlateDecode => "FlateDecode",
            Filter::ASCIIHexDecode => "ASCIIHexDecode",
            Filter::ASCII85Decode => "ASCII85Decode",
        }
    }
}

/// Wrap `upstream` in a single filter stage.
///
/// `params` only affects FlateDecode, which keeps them for inspection.
pub fn make_filter(
    filter: Filter,
    upstream: Box<dyn Stream>,
    params: Option<&DecodeParams>,
    options: &ParserOptions,
) -> Box<dyn Stream> {
    match filter {
        Filter::FlateDecode => Box::new(FlateStream::with_options(
            upstream,
            params.cloned().unwrap_or_default(),
            options,
        )),
        Filter::ASCIIHexDecode => Box::new(AsciiHexStream::new(upstream, options)),
        Filter::ASCII85Decode => Box::new(Ascii85Stream::new(upstream, options)),
    }
}

/// Build a decoding chain over `upstream`.
///
/// Filters are applied in order, the first name decoding the raw bytes. A
/// predictor (`params.predictor > 1`) is layered on top of the last stage.
pub fn build_filter_chain(
    upstream: Box<dyn Stream>,
    filters: &[String],
    params: Option<&DecodeParams>,
    options: &ParserOptions,
) -> Result<Box<dyn Stream>> {
    let filters = filters
        .iter()
        .map(|name| Filter::from_name(name))
        .collect::<Result<Vec<_>>>()?;

    let mut stream = upstream;
    for (i, filter) in filters.iter().enumerate() {
        let stage_params = if i + 1 == filters.len() { params } else { None };
        stream = make_filter(*filter, stream, stage_params, options);
    }

    if let Some(params) = params {
        if params.predictor > 1 {
            log::trace!(
                "Layering predictor {} ({} columns) over filter chain",
                params.predictor,
                params.columns
            );
            stream = Box::new(PredictorStream::new(stream, params.clone(), options)?);
        }
    }

    Ok(stream)
}

/// Decode stream data using a filter pipeline.
///
/// PDF streams can have multiple filters applied in sequence. This function
/// applies each filter in order to decode the data.
///
/// # Examples
///
/// ```rust
/// use pdfstream::decoders::decode_stream;
///
/// let decoded = decode_stream(b"48656C6C6F>", &["AHx".to_string()]).unwrap();
/// assert_eq!(decoded, b"Hello");
/// ```
pub fn decode_stream(data: &[u8], filters: &[String]) -> Result<Vec<u8>> {
    decode_stream_with_params(data, filters, None)
}

/// Decode stream data using a filter pipeline with optional decode parameters.
///
/// This function extends `decode_stream` by supporting decode parameters
/// (e.g., PNG predictors) that are applied after the main filters.
pub fn decode_stream_with_params(
    data: &[u8],
    filters: &[String],
    params: Option<&DecodeParams>,
) -> Result<Vec<u8>> {
    decode_stream_with_options(data, filters, params, &ParserOptions::default())
}

/// Decode stream data with parser options (includes decompression bomb protection).
///
/// A corrupt stream is not an error here: everything decoded before the
/// damage is returned. Output larger than `options.max_decompressed_size`
/// is.
pub fn decode_stream_with_options(
    data: &[u8],
    filters: &[String],
    params: Option<&DecodeParams>,
    options: &ParserOptions,
) -> Result<Vec<u8>> {
    let max_size = options.max_decompressed_size;
    // The limit is enforced while draining so exceeding it is reported.
    let stage_options = ParserOptions {
        max_decompressed_size: 0,
        ..*options
    };

    let source = Box::new(MemoryStream::new(data.to_vec()));
    let mut chain = build_filter_chain(source, filters, params, &stage_options)?;

    let mut output = Vec::new();
    let mut chunk = vec![0u8; DRAIN_CHUNK_SIZE];
    loop {
        let n = chain.get_some_chars(&mut chunk);
        if n == 0 {
            break;
        }
        output.extend_from_slice(&chunk[..n]);

        // SECURITY: Check maximum decompressed size
        if !options.allows_decompressed(output.len() as u64) {
            return Err(Error::Decode(format!(
                "Decompression bomb detected: decompressed size exceeds limit {} bytes",
                max_size
            )));
        }
    }

    log::debug!(
        "Decoded {} bytes through {} filter(s) into {} bytes",
        data.len(),
        filters.len(),
        output.len()
    );
    Ok(output)
}
