//! PDF lexer (tokenizer).
//!
//! This module turns a decoded byte stream into PDF tokens, one per call.
//! It recognizes all PDF token types including numbers, strings, names,
//! keywords, delimiters and indirect references.
//!
//! # PDF Syntax Overview
//!
//! PDF uses a PostScript-like syntax with the following token types:
//! - Numbers: integers (42, -123) and reals (3.14, -2.5)
//! - Strings: literal ((Hello)) and hexadecimal (<48656C6C6F>)
//! - Names: identifiers starting with / (/Type, /Pages)
//! - Keywords: true, false, null and any other command (`obj`, `BT`, `Tj`)
//! - Delimiters: `[`, `]`, `<<`, `>>`
//! - References: indirect object references (10 0 R)
//!
//! Whitespace (space, \t, \r, \n, \0, \f) and comments (% to EOL) are skipped.
//!
//! The lexer never fails. Malformed input degrades to a best-effort token or
//! to [`Object::Error`], leaving it to the caller to decide what is fatal.

use crate::decoders::{hex_digit_to_value, is_pdf_whitespace};
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use crate::parser_config::ParserOptions;
use crate::stream::{MemoryStream, Stream, StreamSequence};
use bytes::Bytes;
use std::collections::VecDeque;
use std::io::SeekFrom;

/// Check if a byte is a PDF delimiter.
fn is_delimiter(c: u8) -> bool {
    matches!(c, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

/// Regular characters are everything that is neither whitespace nor a delimiter.
fn is_regular(c: u8) -> bool {
    !is_pdf_whitespace(c) && !is_delimiter(c)
}

/// Pull tokenizer over one stream or a sequence of streams.
///
/// A sequence is read as if the bytes of its streams were concatenated, so
/// a token split across two streams comes out whole.
///
/// # Examples
///
/// ```rust
/// use pdfstream::lexer::Lexer;
/// use pdfstream::object::{Object, ObjectRef};
///
/// let mut lexer = Lexer::from_bytes(&b"/Parent 12 0 R"[..]);
/// assert_eq!(lexer.get_obj(None), Object::Name("Parent".to_string()));
/// assert_eq!(lexer.get_obj(None), Object::Reference(ObjectRef::new(12, 0)));
/// assert_eq!(lexer.get_obj(None), Object::Eof);
/// ```
pub struct Lexer<'a> {
    input: StreamSequence<'a>,
    options: ParserOptions,
    /// Tokens scanned ahead while checking for `int int R`
    lookahead: VecDeque<Object>,
    /// Object being parsed, for log messages
    obj_num: Option<u32>,
}

impl Lexer<'static> {
    /// Lexer owning a single stream.
    pub fn new(stream: Box<dyn Stream>) -> Self {
        Self::with_options(stream, ParserOptions::default())
    }

    /// Lexer owning a single stream, with explicit options.
    pub fn with_options(stream: Box<dyn Stream>, options: ParserOptions) -> Self {
        Self::from_sequence(StreamSequence::single(stream), options)
    }

    /// Lexer over an in-memory buffer with no file backing.
    ///
    /// The buffer is a pseudo stream: [`Lexer::get_pos`] reports `None`.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::from_bytes_with_options(data, ParserOptions::default())
    }

    /// In-memory lexer with explicit options.
    pub fn from_bytes_with_options(data: impl Into<Bytes>, options: ParserOptions) -> Self {
        Self::with_options(Box::new(MemoryStream::pseudo(data)), options)
    }
}

impl<'a> Lexer<'a> {
    /// Lexer over streams owned by the caller, read in order.
    pub fn from_streams(streams: &'a mut [Box<dyn Stream>]) -> Self {
        Self::from_streams_with_options(streams, ParserOptions::default())
    }

    /// Lexer over caller-owned streams, with explicit options.
    pub fn from_streams_with_options(
        streams: &'a mut [Box<dyn Stream>],
        options: ParserOptions,
    ) -> Self {
        Self::from_sequence(StreamSequence::borrowed(streams), options)
    }

    fn from_sequence(input: StreamSequence<'a>, options: ParserOptions) -> Self {
        Self {
            input,
            options,
            lookahead: VecDeque::with_capacity(2),
            obj_num: None,
        }
    }

    /// PDF whitespace test.
    pub fn is_space(c: u8) -> bool {
        is_pdf_whitespace(c)
    }

    /// Options this lexer was built with.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Next token.
    ///
    /// `obj_num` names the object being parsed in log messages.
    pub fn get_obj(&mut self, obj_num: Option<u32>) -> Object {
        self.obj_num = obj_num;
        let first = self.next_token();

        let Object::Integer(id) = first else {
            return first;
        };
        let Ok(id) = u32::try_from(id) else {
            return first;
        };
        let gen = match self.peek_token(0) {
            Object::Integer(gen) => match u16::try_from(*gen) {
                Ok(gen) => gen,
                Err(_) => return first,
            },
            _ => return first,
        };
        if !self.peek_token(1).is_command("R") {
            return first;
        }

        self.lookahead.pop_front();
        self.lookahead.pop_front();
        Object::Reference(ObjectRef::new(id, gen))
    }

    /// Read one keyword and check that it is `cmd`.
    ///
    /// Returns `Object::Command(cmd)` on a match and `Object::Error` for
    /// anything else, including end of file.
    pub fn expect_command(&mut self, cmd: &str) -> Object {
        let token = self.next_token();
        if token.is_command(cmd) {
            token
        } else {
            log::debug!("Lexer: expected '{}', found {}", cmd, token.type_name());
            Object::Error
        }
    }

    /// Consume one byte of the underlying input.
    ///
    /// Byte access bypasses tokens held for reference detection: when
    /// [`pending_tokens`](Self::pending_tokens) is non-zero the byte comes
    /// from after them.
    pub fn skip_char(&mut self) {
        self.input.get_char();
    }

    /// Peek at the next byte of the underlying input, after any held tokens.
    pub fn look_char(&mut self) -> Option<u8> {
        self.input.look_char()
    }

    /// Number of tokens already scanned but not yet returned by `get_obj`.
    pub fn pending_tokens(&self) -> usize {
        self.lookahead.len()
    }

    /// Discard everything up to and including the next end of line.
    ///
    /// CR, LF and CR LF each count as one line terminator.
    pub fn skip_to_next_line(&mut self) {
        loop {
            match self.input.get_char() {
                None | Some(b'\n') => return,
                Some(b'\r') => {
                    if self.input.look_char() == Some(b'\n') {
                        self.input.get_char();
                    }
                    return;
                },
                Some(_) => {},
            }
        }
    }

    /// The stream currently being read.
    pub fn stream(&self) -> Option<&dyn Stream> {
        self.input.current()
    }

    /// The stream currently being read, mutably.
    pub fn stream_mut(&mut self) -> Option<&mut dyn Stream> {
        self.input.current_mut()
    }

    /// Position in the current stream; `None` for pseudo streams.
    pub fn get_pos(&self) -> Option<u64> {
        self.input.get_pos()
    }

    /// Reposition the current stream, dropping any tokens read ahead.
    pub fn set_pos(&mut self, pos: SeekFrom) -> Result<()> {
        self.lookahead.clear();
        self.input.set_pos(pos)
    }

    fn next_token(&mut self) -> Object {
        match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.scan_token(),
        }
    }

    fn peek_token(&mut self, index: usize) -> &Object {
        while self.lookahead.len() <= index {
            let token = self.scan_token();
            self.lookahead.push_back(token);
        }
        &self.lookahead[index]
    }

    fn warn(&self, msg: std::fmt::Arguments<'_>) {
        match (self.obj_num, self.input.get_pos()) {
            (Some(num), Some(pos)) => log::warn!("Lexer (object {}, offset {}): {}", num, pos, msg),
            (Some(num), None) => log::warn!("Lexer (object {}): {}", num, msg),
            (None, Some(pos)) => log::warn!("Lexer (offset {}): {}", pos, msg),
            (None, None) => log::warn!("Lexer: {}", msg),
        }
    }

    /// Skip whitespace and comments; returns the first byte of the next token.
    fn skip_space(&mut self) -> Option<u8> {
        let mut comment = false;
        loop {
            let c = self.input.look_char()?;
            if comment {
                if c == b'\r' || c == b'\n' {
                    comment = false;
                }
            } else if c == b'%' {
                comment = true;
            } else if !is_pdf_whitespace(c) {
                return Some(c);
            }
            self.input.get_char();
        }
    }

    fn scan_token(&mut self) -> Object {
        let Some(c) = self.skip_space() else {
            return Object::Eof;
        };

        match c {
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.scan_number(),
            b'(' => {
                self.input.get_char();
                self.scan_literal_string()
            },
            b'/' => {
                self.input.get_char();
                self.scan_name()
            },
            b'[' => {
                self.input.get_char();
                Object::ArrayStart
            },
            b']' => {
                self.input.get_char();
                Object::ArrayEnd
            },
            b'<' => {
                self.input.get_char();
                if self.input.look_char() == Some(b'<') {
                    self.input.get_char();
                    Object::DictStart
                } else {
                    self.scan_hex_string()
                }
            },
            b'>' => {
                self.input.get_char();
                if self.input.look_char() == Some(b'>') {
                    self.input.get_char();
                    Object::DictEnd
                } else {
                    self.warn(format_args!("unexpected '>'"));
                    Object::Error
                }
            },
            b')' => {
                self.input.get_char();
                self.warn(format_args!("unexpected ')'"));
                Object::Error
            },
            b'{' | b'}' => {
                self.input.get_char();
                Object::Command((c as char).to_string())
            },
            _ => self.scan_keyword(),
        }
    }

    /// Numbers: optional sign, digits, at most one decimal point.
    ///
    /// Stray signs and extra points inside a number are dropped, the way
    /// other PDF readers accept them.
    fn scan_number(&mut self) -> Object {
        let mut text = String::new();
        let mut real = false;
        let mut digits = false;
        let mut malformed = false;

        match self.input.look_char() {
            Some(b'-') => {
                text.push('-');
                self.input.get_char();
            },
            Some(b'+') => {
                self.input.get_char();
            },
            _ => {},
        }

        while let Some(c) = self.input.look_char() {
            match c {
                b'0'..=b'9' => {
                    text.push(c as char);
                    digits = true;
                },
                b'.' if !real => {
                    text.push('.');
                    real = true;
                },
                b'.' | b'-' | b'+' => malformed = true,
                _ => break,
            }
            self.input.get_char();
        }

        if malformed {
            self.warn(format_args!("badly formatted number '{}'", text));
            if self.options.strict {
                return Object::Error;
            }
        }
        if !digits {
            return Object::Integer(0);
        }
        if !real {
            if let Ok(value) = text.parse::<i64>() {
                return Object::Integer(value);
            }
            log::debug!("Lexer: integer {} overflows, reading as real", text);
        }
        Object::Real(text.parse::<f64>().unwrap_or(0.0))
    }

    /// Literal strings: balanced parentheses and backslash escapes.
    fn scan_literal_string(&mut self) -> Object {
        let mut buf = Vec::new();
        let mut depth = 1usize;

        loop {
            let Some(c) = self.input.get_char() else {
                self.warn(format_args!("unterminated string"));
                return if self.options.strict {
                    Object::Error
                } else {
                    Object::String(buf)
                };
            };
            match c {
                b'(' => {
                    depth += 1;
                    buf.push(c);
                },
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Object::String(buf);
                    }
                    buf.push(c);
                },
                b'\r' => {
                    buf.push(b'\n');
                    if self.input.look_char() == Some(b'\n') {
                        self.input.get_char();
                    }
                },
                b'\\' => self.scan_escape(&mut buf),
                _ => buf.push(c),
            }
        }
    }

    fn scan_escape(&mut self, buf: &mut Vec<u8>) {
        let Some(c) = self.input.get_char() else {
            return;
        };
        match c {
            b'n' => buf.push(b'\n'),
            b'r' => buf.push(b'\r'),
            b't' => buf.push(b'\t'),
            b'b' => buf.push(0x08),
            b'f' => buf.push(0x0c),
            b'0'..=b'7' => {
                let mut value = (c - b'0') as u32;
                for _ in 0..2 {
                    match self.input.look_char() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + (d - b'0') as u32;
                            self.input.get_char();
                        },
                        _ => break,
                    }
                }
                // High-order overflow is ignored: \777 is 0xFF
                buf.push(value as u8);
            },
            // Line continuation
            b'\r' => {
                if self.input.look_char() == Some(b'\n') {
                    self.input.get_char();
                }
            },
            b'\n' => {},
            // \\, \(, \) and unknown escapes stand for the character itself
            _ => buf.push(c),
        }
    }

    /// Hex strings; the opening `<` is already consumed.
    fn scan_hex_string(&mut self) -> Object {
        let mut buf = Vec::new();
        let mut high: Option<u8> = None;

        loop {
            let Some(c) = self.input.get_char() else {
                self.warn(format_args!("unterminated hex string"));
                break;
            };
            if c == b'>' {
                break;
            }
            if is_pdf_whitespace(c) {
                continue;
            }
            match hex_digit_to_value(c) {
                Some(v) => match high.take() {
                    Some(h) => buf.push((h << 4) | v),
                    None => high = Some(v),
                },
                None => self.warn(format_args!("illegal character <{:02x}> in hex string", c)),
            }
        }

        // If odd length, pad with '0'
        if let Some(h) = high {
            buf.push(h << 4);
        }
        Object::String(buf)
    }

    /// Names; the leading `/` is already consumed. `#xx` escapes are decoded
    /// and invalid escapes are kept literally.
    fn scan_name(&mut self) -> Object {
        let mut buf = Vec::new();
        let mut truncated = false;

        while let Some(c) = self.input.look_char() {
            if !is_regular(c) {
                break;
            }
            self.input.get_char();

            let mut decoded = [c, 0];
            let mut len = 1;
            if c == b'#' {
                match self.input.look_char() {
                    Some(h1) if hex_digit_to_value(h1).is_some() => {
                        self.input.get_char();
                        match self.input.look_char().and_then(hex_digit_to_value) {
                            Some(v2) => {
                                self.input.get_char();
                                let v1 = hex_digit_to_value(h1).unwrap_or(0);
                                decoded[0] = (v1 << 4) | v2;
                            },
                            None => {
                                decoded[1] = h1;
                                len = 2;
                            },
                        }
                    },
                    _ => {},
                }
            }

            for &b in &decoded[..len] {
                if buf.len() < self.options.max_token_len {
                    buf.push(b);
                } else {
                    truncated = true;
                }
            }
        }

        if truncated {
            self.warn(format_args!(
                "name token longer than {} bytes, truncated",
                self.options.max_token_len
            ));
        }
        Object::Name(buf.iter().map(|&b| b as char).collect())
    }

    /// Keywords: a run of regular characters.
    fn scan_keyword(&mut self) -> Object {
        let word = self.read_word();
        match word.as_str() {
            "true" => Object::Boolean(true),
            "false" => Object::Boolean(false),
            "null" => Object::Null,
            _ => Object::Command(word),
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        let mut truncated = false;

        while let Some(c) = self.input.look_char() {
            if !is_regular(c) {
                break;
            }
            self.input.get_char();
            if word.len() < self.options.max_token_len {
                word.push(c as char);
            } else {
                truncated = true;
            }
        }

        if truncated {
            self.warn(format_args!(
                "command token longer than {} bytes, truncated",
                self.options.max_token_len
            ));
        }
        word
    }
}

impl Iterator for Lexer<'_> {
    type Item = Object;

    fn next(&mut self) -> Option<Object> {
        match self.get_obj(None) {
            Object::Eof => None,
            token => Some(token),
        }
    }
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("stream", &self.input.current_index())
            .field("kind", &self.input.kind())
            .field("lookahead", &self.lookahead)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::FlateStream;

    fn lex(input: &'static [u8]) -> Vec<Object> {
        Lexer::from_bytes(input).collect()
    }

    fn one(input: &'static [u8]) -> Object {
        Lexer::from_bytes(input).get_obj(None)
    }

    fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    fn cmd(s: &str) -> Object {
        Object::Command(s.to_string())
    }

    // ========================================================================
    // Number Tests
    // ========================================================================

    #[test]
    fn test_parse_integers() {
        assert_eq!(one(b"42"), Object::Integer(42));
        assert_eq!(one(b"-123"), Object::Integer(-123));
        assert_eq!(one(b"+17"), Object::Integer(17));
        assert_eq!(one(b"0"), Object::Integer(0));
    }

    #[test]
    fn test_parse_reals() {
        assert_eq!(one(b"2.75"), Object::Real(2.75));
        assert_eq!(one(b"-2.5"), Object::Real(-2.5));
        assert_eq!(one(b".5"), Object::Real(0.5));
        assert_eq!(one(b"5."), Object::Real(5.0));
        assert_eq!(one(b"-.002"), Object::Real(-0.002));
    }

    #[test]
    fn test_parse_malformed_numbers() {
        assert_eq!(one(b"1.2.3"), Object::Real(1.23));
        assert_eq!(one(b"--5"), Object::Integer(-5));
        assert_eq!(one(b"5-3"), Object::Integer(53));
        assert_eq!(one(b"-"), Object::Integer(0));
        assert_eq!(one(b"."), Object::Integer(0));
    }

    #[test]
    fn test_parse_malformed_number_strict() {
        let mut lexer = Lexer::from_bytes_with_options(&b"1.2.3 4"[..], ParserOptions::strict());
        assert_eq!(lexer.get_obj(None), Object::Error);
        assert_eq!(lexer.get_obj(None), Object::Integer(4));
    }

    #[test]
    fn test_parse_integer_overflow_becomes_real() {
        assert_eq!(one(b"99999999999999999999"), Object::Real(1e20));
    }

    #[test]
    fn test_number_ends_at_regular_char() {
        assert_eq!(lex(b"12abc"), vec![Object::Integer(12), cmd("abc")]);
    }

    // ========================================================================
    // String Tests
    // ========================================================================

    #[test]
    fn test_parse_literal_string() {
        assert_eq!(one(b"(Hello World)"), Object::String(b"Hello World".to_vec()));
        assert_eq!(one(b"()"), Object::String(Vec::new()));
    }

    #[test]
    fn test_parse_literal_string_with_nested_parens() {
        assert_eq!(one(b"(a (b) c)"), Object::String(b"a (b) c".to_vec()));
    }

    #[test]
    fn test_parse_literal_string_escapes() {
        assert_eq!(
            one(b"(\\n\\r\\t\\b\\f\\\\\\(\\))"),
            Object::String(b"\n\r\t\x08\x0c\\()".to_vec())
        );
        assert_eq!(one(b"(\\101\\60x)"), Object::String(b"A0x".to_vec()));
        assert_eq!(one(b"(\\0053)"), Object::String(b"\x053".to_vec()));
        assert_eq!(one(b"(\\q)"), Object::String(b"q".to_vec()));
    }

    #[test]
    fn test_parse_literal_string_line_endings() {
        assert_eq!(one(b"(a\\\r\nb)"), Object::String(b"ab".to_vec()));
        assert_eq!(one(b"(a\\\nb)"), Object::String(b"ab".to_vec()));
        assert_eq!(one(b"(a\r\nb\rc)"), Object::String(b"a\nb\nc".to_vec()));
    }

    #[test]
    fn test_parse_unterminated_literal_string() {
        assert_eq!(one(b"(abc"), Object::String(b"abc".to_vec()));
        let mut lexer = Lexer::from_bytes_with_options(&b"(abc"[..], ParserOptions::strict());
        assert_eq!(lexer.get_obj(None), Object::Error);
    }

    #[test]
    fn test_parse_hex_string() {
        assert_eq!(one(b"<48656C6C6F>"), Object::String(b"Hello".to_vec()));
        assert_eq!(one(b"<48 65 6c\n6c 6f>"), Object::String(b"Hello".to_vec()));
        assert_eq!(one(b"<>"), Object::String(Vec::new()));
    }

    #[test]
    fn test_parse_hex_string_odd_and_illegal() {
        assert_eq!(one(b"<ABC>"), Object::String(vec![0xAB, 0xC0]));
        assert_eq!(one(b"<4x1>"), Object::String(vec![0x41]));
        assert_eq!(one(b"<414"), Object::String(vec![0x41, 0x40]));
    }

    // ========================================================================
    // Name Tests
    // ========================================================================

    #[test]
    fn test_parse_name() {
        assert_eq!(one(b"/Type"), name("Type"));
        assert_eq!(lex(b"/A/B"), vec![name("A"), name("B")]);
        assert_eq!(one(b"/"), name(""));
    }

    #[test]
    fn test_parse_name_with_hex_escape() {
        assert_eq!(one(b"/A#20B"), name("A B"));
        assert_eq!(one(b"/#41#42"), name("AB"));
    }

    #[test]
    fn test_parse_name_with_invalid_hex_escape() {
        assert_eq!(one(b"/A#G1"), name("A#G1"));
        assert_eq!(one(b"/A#4"), name("A#4"));
        assert_eq!(one(b"/A#"), name("A#"));
    }

    #[test]
    fn test_long_name_truncated() {
        let options = ParserOptions {
            max_token_len: 4,
            ..ParserOptions::default()
        };
        let mut lexer = Lexer::from_bytes_with_options(&b"/ABCDEFG 1"[..], options);
        assert_eq!(lexer.get_obj(None), name("ABCD"));
        assert_eq!(lexer.get_obj(None), Object::Integer(1));
    }

    // ========================================================================
    // Keyword and Delimiter Tests
    // ========================================================================

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            lex(b"true false null obj BT"),
            vec![
                Object::Boolean(true),
                Object::Boolean(false),
                Object::Null,
                cmd("obj"),
                cmd("BT")
            ]
        );
    }

    #[test]
    fn test_parse_delimiters() {
        assert_eq!(
            lex(b"[<<>>]{}"),
            vec![
                Object::ArrayStart,
                Object::DictStart,
                Object::DictEnd,
                Object::ArrayEnd,
                cmd("{"),
                cmd("}")
            ]
        );
    }

    #[test]
    fn test_stray_closers_are_errors() {
        assert_eq!(lex(b") > 1"), vec![Object::Error, Object::Error, Object::Integer(1)]);
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            lex(b"%PDF-1.7\n1 % trailing\r2%x"),
            vec![Object::Integer(1), Object::Integer(2)]
        );
    }

    #[test]
    fn test_eof_is_repeated() {
        let mut lexer = Lexer::from_bytes(&b" "[..]);
        assert_eq!(lexer.get_obj(None), Object::Eof);
        assert_eq!(lexer.get_obj(None), Object::Eof);
    }

    // ========================================================================
    // Reference Tests
    // ========================================================================

    #[test]
    fn test_parse_reference() {
        assert_eq!(one(b"12 0 R"), Object::Reference(ObjectRef::new(12, 0)));
        assert_eq!(
            lex(b"[1 0 R 2 0 R]"),
            vec![
                Object::ArrayStart,
                Object::Reference(ObjectRef::new(1, 0)),
                Object::Reference(ObjectRef::new(2, 0)),
                Object::ArrayEnd
            ]
        );
    }

    #[test]
    fn test_reference_requires_standalone_r() {
        assert_eq!(lex(b"12 0 Rfoo"), vec![Object::Integer(12), Object::Integer(0), cmd("Rfoo")]);
        assert_eq!(lex(b"12 0 R/X"), vec![Object::Reference(ObjectRef::new(12, 0)), name("X")]);
    }

    #[test]
    fn test_integers_without_reference() {
        assert_eq!(
            lex(b"1 2 3 R"),
            vec![Object::Integer(1), Object::Reference(ObjectRef::new(2, 3))]
        );
        assert_eq!(
            lex(b"1 0 obj"),
            vec![Object::Integer(1), Object::Integer(0), cmd("obj")]
        );
        assert_eq!(lex(b"-1 0 R"), vec![Object::Integer(-1), Object::Integer(0), cmd("R")]);
        assert_eq!(
            lex(b"1 70000 R"),
            vec![Object::Integer(1), Object::Integer(70000), cmd("R")]
        );
        assert_eq!(lex(b"5 6"), vec![Object::Integer(5), Object::Integer(6)]);
    }

    #[test]
    fn test_expect_command() {
        let mut lexer = Lexer::from_bytes(&b"endobj stream"[..]);
        assert_eq!(lexer.expect_command("endobj"), cmd("endobj"));
        assert_eq!(lexer.expect_command("endstream"), Object::Error);
        assert_eq!(lexer.expect_command("endobj"), Object::Error);
    }

    // ========================================================================
    // Stream Handling Tests
    // ========================================================================

    #[test]
    fn test_multi_stream_continuity() {
        let mut streams: Vec<Box<dyn Stream>> = vec![
            Box::new(MemoryStream::new(&b"1 0 o"[..])),
            Box::new(MemoryStream::new(&b"bj << /A 1 >"[..])),
            Box::new(MemoryStream::new(&b"> endobj"[..])),
        ];
        let tokens: Vec<Object> = Lexer::from_streams(&mut streams).collect();
        assert_eq!(
            tokens,
            vec![
                Object::Integer(1),
                Object::Integer(0),
                cmd("obj"),
                Object::DictStart,
                name("A"),
                Object::Integer(1),
                Object::DictEnd,
                cmd("endobj"),
            ]
        );
    }

    #[test]
    fn test_empty_stream_list() {
        let mut streams: Vec<Box<dyn Stream>> = Vec::new();
        let mut lexer = Lexer::from_streams(&mut streams);
        assert_eq!(lexer.get_obj(None), Object::Eof);
        assert!(lexer.stream().is_none());
    }

    #[test]
    fn test_skip_to_next_line() {
        let mut lexer = Lexer::new(Box::new(MemoryStream::new(&b"stream\r\nBINARY"[..])));
        assert_eq!(lexer.get_obj(None), cmd("stream"));
        lexer.skip_to_next_line();
        assert_eq!(lexer.get_pos(), Some(8));
        assert_eq!(lexer.look_char(), Some(b'B'));

        let mut lexer = Lexer::new(Box::new(MemoryStream::new(&b"a\rb\nc"[..])));
        lexer.skip_to_next_line();
        assert_eq!(lexer.look_char(), Some(b'b'));
        lexer.skip_to_next_line();
        lexer.skip_char();
        assert_eq!(lexer.look_char(), None);
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new(Box::new(MemoryStream::new(&b"/A /B"[..])));
        assert_eq!(lexer.get_obj(None), name("A"));
        assert_eq!(lexer.get_pos(), Some(2));
        lexer.set_pos(SeekFrom::Start(0)).unwrap();
        assert_eq!(lexer.get_obj(None), name("A"));

        let mut pseudo = Lexer::from_bytes(&b"/A /B"[..]);
        pseudo.get_obj(None);
        assert_eq!(pseudo.get_pos(), None);
    }

    #[test]
    fn test_set_pos_discards_lookahead() {
        let mut lexer = Lexer::new(Box::new(MemoryStream::new(&b"1 2 3"[..])));
        assert_eq!(lexer.get_obj(None), Object::Integer(1));
        lexer.set_pos(SeekFrom::Start(0)).unwrap();
        assert_eq!(lexer.get_obj(None), Object::Integer(1));
        assert_eq!(lexer.get_obj(None), Object::Integer(2));
    }

    #[test]
    fn test_byte_access_skips_held_tokens() {
        let mut lexer = Lexer::from_bytes(&b"1 2 x y"[..]);
        assert_eq!(lexer.pending_tokens(), 0);
        assert_eq!(lexer.get_obj(None), Object::Integer(1));
        // `2 x` was scanned to rule out a reference
        assert_eq!(lexer.pending_tokens(), 2);
        assert_eq!(lexer.look_char(), Some(b' '));
        lexer.skip_char();
        assert_eq!(lexer.look_char(), Some(b'y'));

        assert_eq!(lexer.get_obj(None), Object::Integer(2));
        assert_eq!(lexer.get_obj(None), Object::Command("x".to_string()));
        assert_eq!(lexer.pending_tokens(), 0);
        assert_eq!(lexer.get_obj(None), Object::Command("y".to_string()));
    }

    #[test]
    fn test_lexer_over_flate_stream() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"BT /F1 12 Tf (Hi) Tj ET").unwrap();
        let compressed = encoder.finish().unwrap();

        let flate = FlateStream::new(Box::new(MemoryStream::new(compressed)), 1, 1, 8);
        let tokens: Vec<Object> = Lexer::new(Box::new(flate)).collect();
        assert_eq!(
            tokens,
            vec![
                cmd("BT"),
                name("F1"),
                Object::Integer(12),
                cmd("Tf"),
                Object::String(b"Hi".to_vec()),
                cmd("Tj"),
                cmd("ET"),
            ]
        );
    }

    #[test]
    fn test_is_space() {
        for c in [0u8, 9, 10, 12, 13, 32] {
            assert!(Lexer::is_space(c));
        }
        assert!(!Lexer::is_space(b'a'));
        assert!(!Lexer::is_space(b'/'));
    }
}
