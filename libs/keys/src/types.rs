//! Typed key values for the platform's identifier shapes.
//!
//! | Shape | Layout | Bytes |
//! |---|---|---|
//! | [`ModelId`] | opaque model identifier | 16 |
//! | [`ShortKey`] | opaque element identifier, no flags | 20 |
//! | [`FullKey`] | flags (4, big-endian u32) then short key (20) | 24 |
//! | [`XrefKey`] | model id (16) then full key (24) | 40 |
//!
//! All shapes share one canonical text form: unpadded web-safe base64.
//! Parsing through these types is always strict; the lenient best-effort
//! conversions live in [`crate::KeyCodec`].

use uuid::Uuid;

use crate::define_key;
use crate::error::KeyError;
use crate::flags;

define_key!(ModelId, 16, "model id");
define_key!(ShortKey, 20, "short key");
define_key!(FullKey, 24, "full key");
define_key!(XrefKey, 40, "xref key");

impl ModelId {
    /// URI scheme prefixed to model IDs in cross-model references.
    pub const URN_PREFIX: &'static str = "urn:adsk.dtm:";

    /// Parses a model ID, accepting an optional `urn:adsk.dtm:` prefix.
    pub fn from_text(s: &str) -> Result<Self, KeyError> {
        let trimmed = s.strip_prefix(Self::URN_PREFIX).unwrap_or(s);
        Self::parse(trimmed)
    }

    /// Formats the model ID as a `urn:adsk.dtm:` URI.
    #[must_use]
    pub fn to_urn(&self) -> String {
        format!("{}{}", Self::URN_PREFIX, self)
    }
}

impl FullKey {
    /// Builds a full key from a flags value and a short key.
    #[must_use]
    pub fn new(flags: u32, short: ShortKey) -> Self {
        let mut buf = [0u8; Self::LEN];
        buf[..4].copy_from_slice(&flags.to_be_bytes());
        buf[4..].copy_from_slice(short.as_bytes());
        Self::from_bytes(buf)
    }

    /// Generates a full key with a fresh random element identifier.
    ///
    /// Bytes [4, 20) hold a new UUIDv4 (122 random bits plus RFC 4122
    /// version/variant bits); bytes [20, 24) are zero.
    #[must_use]
    pub fn generate(flags: u32) -> Self {
        let mut id = [0u8; ShortKey::LEN];
        id[..16].copy_from_slice(Uuid::new_v4().as_bytes());
        Self::new(flags, ShortKey::from_bytes(id))
    }

    /// The flags prefix as a big-endian u32.
    #[must_use]
    pub fn flags(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// The 20-byte element identifier without the flags prefix.
    #[must_use]
    pub fn short_key(&self) -> ShortKey {
        let mut id = [0u8; ShortKey::LEN];
        id.copy_from_slice(&self.0[4..]);
        ShortKey::from_bytes(id)
    }

    /// Returns true if the logical bit is set in the flags prefix.
    #[must_use]
    pub fn is_logical(&self) -> bool {
        flags::is_logical(self.flags())
    }

    /// The trailing 4 bytes as a big-endian u32 (the system-id source).
    #[must_use]
    pub fn system_tail(&self) -> u32 {
        let n = Self::LEN;
        u32::from_be_bytes([self.0[n - 4], self.0[n - 3], self.0[n - 2], self.0[n - 1]])
    }
}

impl XrefKey {
    /// Builds a cross-model key from a model ID and a full key.
    #[must_use]
    pub fn new(model: ModelId, full: FullKey) -> Self {
        let mut buf = [0u8; Self::LEN];
        buf[..ModelId::LEN].copy_from_slice(model.as_bytes());
        buf[ModelId::LEN..].copy_from_slice(full.as_bytes());
        Self::from_bytes(buf)
    }

    /// The 16-byte model component.
    #[must_use]
    pub fn model_id(&self) -> ModelId {
        let mut buf = [0u8; ModelId::LEN];
        buf.copy_from_slice(&self.0[..ModelId::LEN]);
        ModelId::from_bytes(buf)
    }

    /// The 24-byte full-key component.
    #[must_use]
    pub fn full_key(&self) -> FullKey {
        let mut buf = [0u8; FullKey::LEN];
        buf.copy_from_slice(&self.0[ModelId::LEN..]);
        FullKey::from_bytes(buf)
    }
}
