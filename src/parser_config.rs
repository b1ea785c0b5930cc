/// Options controlling buffer sizes, limits and how forgiving the lexer is.
///
/// The pipeline itself never fails on malformed input; these options only
/// decide how much work it will do and whether malformed tokens are repaired
/// or reported as `Object::Error`.
///
/// # Example
///
/// ```
/// use pdfstream::parser_config::ParserOptions;
///
/// // Lenient mode - best-effort tokens (default)
/// let lenient = ParserOptions::lenient();
///
/// // Strict mode - malformed tokens become Object::Error
/// let strict = ParserOptions::strict();
///
/// // Custom configuration
/// let custom = ParserOptions {
///     strict: false,
///     flate_chunk_size: 16 * 1024,
///     filter_buffer_size: 4096,
///     max_decompressed_size: 10 * 1024 * 1024,
///     max_token_len: 255,
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Report malformed tokens as errors (true) or repair them (false)
    ///
    /// In lenient mode a number like `1.2.3` is read as `1.23` and an
    /// unterminated string yields the bytes read so far. In strict mode both
    /// produce `Object::Error`; the lexer keeps going either way.
    pub strict: bool,

    /// Size of the compressed-input staging buffer of each flate stream
    pub flate_chunk_size: usize,

    /// Size of the decoded-output buffer backing `get_char`/`look_char` on filters
    pub filter_buffer_size: usize,

    /// Maximum number of bytes a single flate stream may produce
    ///
    /// Prevents decompression bombs from exhausting memory in callers that
    /// drain whole streams. Default: 100 MB. Set to 0 to disable check.
    pub max_decompressed_size: usize,

    /// Longest name or command token kept by the lexer
    ///
    /// Longer tokens are truncated with a warning; the remainder of the token
    /// is still consumed so tokenizing stays aligned.
    pub max_token_len: usize,
}

impl Default for ParserOptions {
    /// Default configuration: lenient mode
    fn default() -> Self {
        Self::lenient()
    }
}

impl ParserOptions {
    /// Strict mode: malformed tokens are reported as `Object::Error`
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::lenient()
        }
    }

    /// Lenient mode: repair malformed tokens where a sensible value exists
    pub fn lenient() -> Self {
        Self {
            strict: false,
            flate_chunk_size: 8192,
            filter_buffer_size: 4096,
            max_decompressed_size: 100 * 1024 * 1024, // 100 MB
            max_token_len: 128,
        }
    }

    /// Very lenient mode: larger limits for heavily damaged or huge files
    pub fn very_lenient() -> Self {
        Self {
            max_decompressed_size: 200 * 1024 * 1024, // 200 MB
            max_token_len: 1024,
            ..Self::lenient()
        }
    }

    /// Whether a flate stream that has produced `total` bytes may keep going.
    pub(crate) fn allows_decompressed(&self, total: u64) -> bool {
        self.max_decompressed_size == 0 || total <= self.max_decompressed_size as u64
    }
}
