//! # pdfstream
//!
//! Lazy decoding and tokenizing of PDF content: the layer between raw file
//! bytes and an object-graph builder.
//!
//! ## Core Features
//!
//! - **Byte sources**: seekable [`FileStream`] and [`MemoryStream`] views,
//!   including pseudo streams with no file backing
//! - **Filter chains**: FlateDecode (zlib and raw deflate), ASCIIHexDecode,
//!   ASCII85Decode and PNG/TIFF predictors, decoded incrementally one bounded
//!   step at a time
//! - **Sticky failure**: a corrupt stream stops with everything decoded so far
//!   still readable
//! - **Lexer**: one PDF token per call, over one stream or a sequence of
//!   streams read as if concatenated, with `12 0 R` reference detection
//!
//! ## Architecture
//!
//! Every stage implements [`Stream`]. A
//! [`FilterStream`](stream::FilterStream) owns the stream it decodes, so a
//! chain is a singly linked list that is torn down by dropping its top.
//! Nothing in the crate spawns threads or blocks.
//!
//! ## Quick Start
//!
//! ```rust
//! use pdfstream::decoders::build_filter_chain;
//! use pdfstream::{Lexer, MemoryStream, Object, ParserOptions};
//!
//! # fn main() -> pdfstream::Result<()> {
//! let options = ParserOptions::default();
//! let raw = Box::new(MemoryStream::new(&b"425420546A>"[..]));
//! let chain = build_filter_chain(raw, &["AHx".to_string()], None, &options)?;
//!
//! let tokens: Vec<Object> = Lexer::new(chain).collect();
//! assert_eq!(tokens, vec![Object::Command("BT".into()), Object::Command("Tj".into())]);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
/// Parser configuration options
pub mod parser_config;

// Byte sources and filter plumbing
pub mod stream;

// Stream decoders
pub mod decoders;

// Tokenizing
pub mod lexer;
pub mod object;

// Re-exports
pub use error::{Error, Result};
pub use lexer::Lexer;
pub use object::{Object, ObjectRef};
pub use parser_config::ParserOptions;
pub use stream::{FileStream, MemoryStream, Stream, StreamKind};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
