//! Decoder configuration types.

/// Default cap for atoms, tags, verbs and response-code names.
pub const DEFAULT_MAX_ATOM_LEN: usize = 128;

/// Default cap for quoted-string payloads.
pub const DEFAULT_MAX_QUOTED_LEN: usize = 128;

/// Default cap for trailing human-readable text.
pub const DEFAULT_MAX_TEXT_LEN: usize = 500;

/// Default cap for a declared literal size.
pub const DEFAULT_MAX_LITERAL_LEN: u32 = 100 * 1024 * 1024; // 100 MB

/// Token size limits shared by every lexer of a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum atom length in bytes.
    pub max_atom_len: usize,
    /// Maximum quoted-string length in bytes (after unescaping).
    pub max_quoted_len: usize,
    /// Maximum human-readable text length in bytes.
    pub max_text_len: usize,
    /// Maximum declared literal size in octets.
    pub max_literal_len: u32,
}

impl DecoderConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub const fn builder() -> DecoderConfigBuilder {
        DecoderConfigBuilder::new()
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_atom_len: DEFAULT_MAX_ATOM_LEN,
            max_quoted_len: DEFAULT_MAX_QUOTED_LEN,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            max_literal_len: DEFAULT_MAX_LITERAL_LEN,
        }
    }
}

/// Builder for decoder configuration.
#[derive(Debug, Clone)]
pub struct DecoderConfigBuilder {
    config: DecoderConfig,
}

impl DecoderConfigBuilder {
    /// Creates a new builder populated with the default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: DecoderConfig {
                max_atom_len: DEFAULT_MAX_ATOM_LEN,
                max_quoted_len: DEFAULT_MAX_QUOTED_LEN,
                max_text_len: DEFAULT_MAX_TEXT_LEN,
                max_literal_len: DEFAULT_MAX_LITERAL_LEN,
            },
        }
    }

    /// Sets the atom cap.
    #[must_use]
    pub const fn max_atom_len(mut self, len: usize) -> Self {
        self.config.max_atom_len = len;
        self
    }

    /// Sets the quoted-string cap.
    #[must_use]
    pub const fn max_quoted_len(mut self, len: usize) -> Self {
        self.config.max_quoted_len = len;
        self
    }

    /// Sets the human-readable text cap.
    #[must_use]
    pub const fn max_text_len(mut self, len: usize) -> Self {
        self.config.max_text_len = len;
        self
    }

    /// Sets the literal size cap.
    #[must_use]
    pub const fn max_literal_len(mut self, len: u32) -> Self {
        self.config.max_literal_len = len;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub const fn build(self) -> DecoderConfig {
        self.config
    }
}

impl Default for DecoderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
