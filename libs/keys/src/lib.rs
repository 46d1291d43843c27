//! # dtm-keys
//!
//! Binary key and identifier codec for the dtm building-data platform.
//!
//! ## Design Principles
//!
//! - Keys are fixed-width byte records with one canonical text form:
//!   unpadded web-safe base64 (`+` → `-`, `/` → `_`, no `=`)
//! - Typed keys prevent mixing shapes; conversions are explicit
//! - Every operation is a pure value transform: no I/O, no shared state,
//!   safe to call from any number of threads
//!
//! ## Key Shapes
//!
//! - Model ID: 16 bytes, addressed externally as `urn:adsk.dtm:<base64>`
//! - Short key: 20-byte element identifier, no flags
//! - Full key: 4-byte big-endian flags prefix + short key (24 bytes)
//! - Xref key: model ID + full key (40 bytes), for cross-model references
//! - System ID: LEB128 varint of the full key's trailing 32-bit integer,
//!   as standard-alphabet base64 with only the padding stripped
//!
//! ## Example
//!
//! ```
//! use dtm_keys::KeyCodec;
//!
//! # fn main() -> Result<(), dtm_keys::KeyError> {
//! let codec = KeyCodec::strict();
//! // 27 base64 chars decode to a 20-byte short key
//! let full = codec.to_full_key("AAAAAAAAAAAAAAAAAAAAAAAAAAA", true)?;
//! assert!(codec.is_full_key(&full)?);
//! assert_eq!(codec.to_short_key(&full)?, "AAAAAAAAAAAAAAAAAAAAAAAAAAA");
//! # Ok(())
//! # }
//! ```

mod codec;
pub mod encoding;
mod error;
pub mod flags;
mod macros;
mod types;
pub mod varint;

pub use codec::{
    from_short_key_array, from_xref_key, from_xref_key_array, is_full_key, is_xref_key,
    new_element_key, new_element_key_from, to_element_guid, to_full_key, to_short_key,
    to_system_id, to_xref_key, KeyCodec, Strictness,
};
pub use encoding::encode_web_safe;
pub use error::KeyError;
pub use types::{FullKey, ModelId, ShortKey, XrefKey};
