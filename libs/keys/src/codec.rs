//! Key-shape conversions over the text forms used by the API.
//!
//! Every operation here takes web-safe base64 text in and yields fresh text
//! out; nothing is cached and nothing does I/O. The codec carries a single
//! [`Strictness`] setting controlling how mis-sized input is handled:
//! `Lenient` reproduces the upstream client's best-effort behavior, `Strict`
//! rejects it with [`KeyError::UnexpectedLength`].

use crate::encoding;
use crate::error::KeyError;
use crate::flags::{FLAG_LOGICAL, FLAG_PHYSICAL};
use crate::types::{FullKey, ModelId, ShortKey, XrefKey};
use crate::varint;

/// Input-size validation policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Best-effort parity with the upstream client: undersized input is
    /// copied into a zero-filled buffer, oversized input is truncated, and
    /// a trailing partial array record is silently dropped.
    #[default]
    Lenient,
    /// Mis-sized input is rejected with [`KeyError::UnexpectedLength`].
    Strict,
}

/// Stateless codec over the text key forms.
///
/// Cheap to copy; safe to share across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyCodec {
    strictness: Strictness,
}

impl KeyCodec {
    /// Codec with the given validation policy.
    #[must_use]
    pub const fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    /// Codec in lenient (upstream-parity) mode.
    #[must_use]
    pub const fn lenient() -> Self {
        Self::new(Strictness::Lenient)
    }

    /// Codec in strict mode.
    #[must_use]
    pub const fn strict() -> Self {
        Self::new(Strictness::Strict)
    }

    /// The active validation policy.
    #[must_use]
    pub const fn strictness(&self) -> Strictness {
        self.strictness
    }

    fn is_strict(&self) -> bool {
        matches!(self.strictness, Strictness::Strict)
    }

    /// Decodes text into a zero-filled fixed-size buffer.
    ///
    /// Strict mode requires an exact decoded length; lenient mode pads
    /// undersized input with zeroes and truncates oversized input.
    fn decode_fixed<const N: usize>(
        &self,
        text: &str,
        what: &'static str,
    ) -> Result<[u8; N], KeyError> {
        let bytes = encoding::decode(text)?;
        if self.is_strict() && bytes.len() != N {
            return Err(KeyError::UnexpectedLength {
                what,
                expected: N,
                actual: bytes.len(),
            });
        }
        let mut buf = [0u8; N];
        let n = bytes.len().min(N);
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(buf)
    }

    fn check_array_remainder(
        &self,
        what: &'static str,
        len: usize,
        record: usize,
    ) -> Result<(), KeyError> {
        if self.is_strict() && len % record != 0 {
            return Err(KeyError::UnexpectedLength {
                what,
                expected: len - len % record,
                actual: len,
            });
        }
        Ok(())
    }

    /// Returns true iff the text decodes to exactly 24 bytes.
    ///
    /// Malformed base64 is an error, not `false`.
    pub fn is_full_key(&self, text: &str) -> Result<bool, KeyError> {
        Ok(encoding::decode(text)?.len() == FullKey::LEN)
    }

    /// Returns true iff the text decodes to exactly 40 bytes.
    pub fn is_xref_key(&self, text: &str) -> Result<bool, KeyError> {
        Ok(encoding::decode(text)?.len() == XrefKey::LEN)
    }

    /// Prepends the logical or physical flags value to a 20-byte short key.
    pub fn to_full_key(&self, short_text: &str, is_logical: bool) -> Result<String, KeyError> {
        let id: [u8; ShortKey::LEN] = self.decode_fixed(short_text, ShortKey::WHAT)?;
        let flags = if is_logical { FLAG_LOGICAL } else { FLAG_PHYSICAL };
        Ok(FullKey::new(flags, ShortKey::from_bytes(id)).to_string())
    }

    /// Strips the 4-byte flags prefix from a 24-byte full key.
    pub fn to_short_key(&self, full_text: &str) -> Result<String, KeyError> {
        let bytes = encoding::decode(full_text)?;
        if self.is_strict() && bytes.len() != FullKey::LEN {
            return Err(KeyError::UnexpectedLength {
                what: FullKey::WHAT,
                expected: FullKey::LEN,
                actual: bytes.len(),
            });
        }
        let mut id = [0u8; ShortKey::LEN];
        if bytes.len() > 4 {
            let n = (bytes.len() - 4).min(ShortKey::LEN);
            id[..n].copy_from_slice(&bytes[4..4 + n]);
        }
        Ok(ShortKey::from_bytes(id).to_string())
    }

    /// Derives the varint system ID from the last 4 bytes of a full key.
    ///
    /// The output is standard-alphabet base64 with only the `=` padding
    /// stripped. The `+`/`/` substitution is deliberately not applied; the
    /// consuming system expects the standard alphabet for system IDs.
    pub fn to_system_id(&self, full_text: &str) -> Result<String, KeyError> {
        let bytes = encoding::decode(full_text)?;
        if self.is_strict() && bytes.len() != FullKey::LEN {
            return Err(KeyError::UnexpectedLength {
                what: FullKey::WHAT,
                expected: FullKey::LEN,
                actual: bytes.len(),
            });
        }
        // A 32-bit read needs 4 bytes even in lenient mode.
        if bytes.len() < 4 {
            return Err(KeyError::UnexpectedLength {
                what: "system id source",
                expected: 4,
                actual: bytes.len(),
            });
        }
        let n = bytes.len();
        let value = u32::from_be_bytes([bytes[n - 4], bytes[n - 3], bytes[n - 2], bytes[n - 1]]);
        let mut buf = [0u8; varint::MAX_VARINT32_LEN];
        let len = varint::encode_u32(value, &mut buf);
        Ok(encoding::encode_system_id(&buf[..len]))
    }

    /// Concatenates a model ID and a full key into a 40-byte xref key.
    ///
    /// The model ID may carry the `urn:adsk.dtm:` prefix.
    pub fn to_xref_key(&self, model_text: &str, full_text: &str) -> Result<String, KeyError> {
        let model_text = model_text
            .strip_prefix(ModelId::URN_PREFIX)
            .unwrap_or(model_text);
        let model: [u8; ModelId::LEN] = self.decode_fixed(model_text, ModelId::WHAT)?;
        let full: [u8; FullKey::LEN] = self.decode_fixed(full_text, FullKey::WHAT)?;
        let xref = XrefKey::new(ModelId::from_bytes(model), FullKey::from_bytes(full));
        Ok(xref.to_string())
    }

    /// Splits a 40-byte xref key into (model URN, full key text).
    pub fn from_xref_key(&self, xref_text: &str) -> Result<(String, String), KeyError> {
        let buf: [u8; XrefKey::LEN] = self.decode_fixed(xref_text, XrefKey::WHAT)?;
        let xref = XrefKey::from_bytes(buf);
        Ok((xref.model_id().to_urn(), xref.full_key().to_string()))
    }

    /// Unpacks a flat concatenation of 20-byte short-key records.
    ///
    /// With `use_full_keys`, each record is promoted to a 24-byte full key
    /// using the logical or physical flags value. A trailing partial record
    /// is dropped in lenient mode and rejected in strict mode.
    pub fn from_short_key_array(
        &self,
        packed_text: &str,
        use_full_keys: bool,
        is_logical: bool,
    ) -> Result<Vec<String>, KeyError> {
        let bytes = encoding::decode(packed_text)?;
        self.check_array_remainder("short key array", bytes.len(), ShortKey::LEN)?;

        let flags = if is_logical { FLAG_LOGICAL } else { FLAG_PHYSICAL };
        let mut keys = Vec::with_capacity(bytes.len() / ShortKey::LEN);
        for record in bytes.chunks_exact(ShortKey::LEN) {
            let mut id = [0u8; ShortKey::LEN];
            id.copy_from_slice(record);
            let short = ShortKey::from_bytes(id);
            if use_full_keys {
                keys.push(FullKey::new(flags, short).to_string());
            } else {
                keys.push(short.to_string());
            }
        }
        Ok(keys)
    }

    /// Unpacks a flat concatenation of 40-byte xref-key records into two
    /// index-aligned sequences: model URNs and full-key texts.
    ///
    /// Empty input yields two empty vectors. A trailing partial record is
    /// dropped in lenient mode and rejected in strict mode.
    pub fn from_xref_key_array(
        &self,
        packed_text: &str,
    ) -> Result<(Vec<String>, Vec<String>), KeyError> {
        let bytes = encoding::decode(packed_text)?;
        self.check_array_remainder("xref key array", bytes.len(), XrefKey::LEN)?;

        let count = bytes.len() / XrefKey::LEN;
        let mut models = Vec::with_capacity(count);
        let mut fulls = Vec::with_capacity(count);
        for record in bytes.chunks_exact(XrefKey::LEN) {
            let mut buf = [0u8; XrefKey::LEN];
            buf.copy_from_slice(record);
            let xref = XrefKey::from_bytes(buf);
            models.push(xref.model_id().to_urn());
            fulls.push(xref.full_key().to_string());
        }
        Ok((models, fulls))
    }

    /// Formats decoded key bytes as a dashed lowercase-hex GUID.
    ///
    /// Hex pairs are grouped in the canonical 8-4-4-4-12 pattern; any hex
    /// beyond the first 16 bytes is appended as one final segment rather
    /// than discarded. This is a display form, not a UUID validator.
    pub fn to_element_guid(&self, key_text: &str) -> Result<String, KeyError> {
        let bytes = encoding::decode(key_text)?;
        let hex = hex::encode(&bytes);

        const BOUNDS: [usize; 5] = [8, 12, 16, 20, 32];
        let mut out = String::with_capacity(hex.len() + 5);
        let mut start = 0;
        for end in BOUNDS {
            if start >= hex.len() {
                break;
            }
            let end = end.min(hex.len());
            if start > 0 {
                out.push('-');
            }
            out.push_str(&hex[start..end]);
            start = end;
        }
        if start < hex.len() {
            out.push('-');
            out.push_str(&hex[start..]);
        }
        Ok(out)
    }
}

/// Generates a fresh element key with the given flags value.
///
/// Each call embeds a new random 128-bit identifier; identifiers are never
/// reused across calls.
#[must_use]
pub fn new_element_key(flags: u32) -> String {
    FullKey::generate(flags).to_string()
}

/// Deterministic variant of [`new_element_key`] taking all 20 id bytes.
#[must_use]
pub fn new_element_key_from(flags: u32, id: [u8; ShortKey::LEN]) -> String {
    FullKey::new(flags, ShortKey::from_bytes(id)).to_string()
}

/// Lenient shorthand for [`KeyCodec::is_full_key`].
pub fn is_full_key(text: &str) -> Result<bool, KeyError> {
    KeyCodec::lenient().is_full_key(text)
}

/// Lenient shorthand for [`KeyCodec::is_xref_key`].
pub fn is_xref_key(text: &str) -> Result<bool, KeyError> {
    KeyCodec::lenient().is_xref_key(text)
}

/// Lenient shorthand for [`KeyCodec::to_full_key`].
pub fn to_full_key(short_text: &str, is_logical: bool) -> Result<String, KeyError> {
    KeyCodec::lenient().to_full_key(short_text, is_logical)
}

/// Lenient shorthand for [`KeyCodec::to_short_key`].
pub fn to_short_key(full_text: &str) -> Result<String, KeyError> {
    KeyCodec::lenient().to_short_key(full_text)
}

/// Lenient shorthand for [`KeyCodec::to_system_id`].
pub fn to_system_id(full_text: &str) -> Result<String, KeyError> {
    KeyCodec::lenient().to_system_id(full_text)
}

/// Lenient shorthand for [`KeyCodec::to_xref_key`].
pub fn to_xref_key(model_text: &str, full_text: &str) -> Result<String, KeyError> {
    KeyCodec::lenient().to_xref_key(model_text, full_text)
}

/// Lenient shorthand for [`KeyCodec::from_xref_key`].
pub fn from_xref_key(xref_text: &str) -> Result<(String, String), KeyError> {
    KeyCodec::lenient().from_xref_key(xref_text)
}

/// Lenient shorthand for [`KeyCodec::from_short_key_array`].
pub fn from_short_key_array(
    packed_text: &str,
    use_full_keys: bool,
    is_logical: bool,
) -> Result<Vec<String>, KeyError> {
    KeyCodec::lenient().from_short_key_array(packed_text, use_full_keys, is_logical)
}

/// Lenient shorthand for [`KeyCodec::from_xref_key_array`].
pub fn from_xref_key_array(packed_text: &str) -> Result<(Vec<String>, Vec<String>), KeyError> {
    KeyCodec::lenient().from_xref_key_array(packed_text)
}

/// Lenient shorthand for [`KeyCodec::to_element_guid`].
pub fn to_element_guid(key_text: &str) -> Result<String, KeyError> {
    KeyCodec::lenient().to_element_guid(key_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding;
    use crate::flags::element_flags;
    use proptest::prelude::*;

    /// 20 zero bytes.
    const ZERO_SHORT: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAA";
    /// flags 0x01000000 followed by 20 zero bytes.
    const LOGICAL_ZERO_FULL: &str = "AQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    /// 16 zero bytes.
    const ZERO_MODEL: &str = "AAAAAAAAAAAAAAAAAAAAAA";
    /// 40 zero bytes.
    const ZERO_XREF: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    #[test]
    fn test_full_key_concrete_vector() {
        let full = to_full_key(ZERO_SHORT, true).unwrap();
        assert_eq!(full, LOGICAL_ZERO_FULL);
        assert!(is_full_key(&full).unwrap());
        assert_eq!(to_short_key(&full).unwrap(), ZERO_SHORT);
    }

    #[test]
    fn test_full_key_flags() {
        let logical = to_full_key(ZERO_SHORT, true).unwrap();
        assert_eq!(
            &encoding::decode(&logical).unwrap()[..4],
            &[0x01, 0x00, 0x00, 0x00]
        );
        let physical = to_full_key(ZERO_SHORT, false).unwrap();
        assert_eq!(
            &encoding::decode(&physical).unwrap()[..4],
            &[0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_is_full_key_rejects_malformed() {
        assert!(is_full_key("n*t base64").is_err());
        // valid base64 of the wrong size is false, not an error
        assert!(!is_full_key(ZERO_SHORT).unwrap());
        assert!(!is_xref_key(LOGICAL_ZERO_FULL).unwrap());
        assert!(is_xref_key(ZERO_XREF).unwrap());
    }

    #[test]
    fn test_new_element_key_layout() {
        let text = new_element_key(element_flags::STREAM);
        let bytes = encoding::decode(&text).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..4], &element_flags::STREAM.to_be_bytes());
        assert_ne!(text, new_element_key(element_flags::STREAM));
    }

    #[test]
    fn test_new_element_key_from_is_deterministic() {
        let id = [0x5a; 20];
        let a = new_element_key_from(element_flags::SYSTEM, id);
        let b = new_element_key_from(element_flags::SYSTEM, id);
        assert_eq!(a, b);
        let bytes = encoding::decode(&a).unwrap();
        assert_eq!(&bytes[4..], &id);
    }

    #[test]
    fn test_system_id_small_value() {
        // physical full key whose last 4 bytes are 300 big-endian
        let mut id = [0u8; 20];
        id[16..].copy_from_slice(&300u32.to_be_bytes());
        let full = new_element_key_from(0, id);
        assert_eq!(to_system_id(&full).unwrap(), "rAI");
    }

    #[test]
    fn test_system_id_zero() {
        assert_eq!(to_system_id(LOGICAL_ZERO_FULL).unwrap(), "AA");
    }

    #[test]
    fn test_system_id_keeps_standard_alphabet() {
        // last 4 bytes 0xFFFFFFFF; LEB128 is ff ff ff ff 0f, whose base64
        // contains '/' that must NOT be rewritten to '_'
        let mut id = [0u8; 20];
        id[16..].copy_from_slice(&[0xff, 0xff, 0xff, 0xff]);
        let full = new_element_key_from(0, id);
        assert_eq!(to_system_id(&full).unwrap(), "/////w8");
    }

    #[test]
    fn test_system_id_needs_four_bytes() {
        let short_input = encoding::encode(&[0x01, 0x02]);
        let err = to_system_id(&short_input).unwrap_err();
        assert!(err.is_unexpected_length());
    }

    #[test]
    fn test_xref_concrete_vector() {
        let xref = to_xref_key(ZERO_MODEL, &to_full_key(ZERO_SHORT, false).unwrap()).unwrap();
        assert_eq!(xref, ZERO_XREF);
        let (model_urn, full) = from_xref_key(&xref).unwrap();
        assert_eq!(model_urn, format!("urn:adsk.dtm:{ZERO_MODEL}"));
        assert_eq!(full, to_full_key(ZERO_SHORT, false).unwrap());
    }

    #[test]
    fn test_xref_accepts_urn_prefix() {
        let full = to_full_key(ZERO_SHORT, true).unwrap();
        let bare = to_xref_key(ZERO_MODEL, &full).unwrap();
        let prefixed = to_xref_key(&format!("urn:adsk.dtm:{ZERO_MODEL}"), &full).unwrap();
        assert_eq!(bare, prefixed);
    }

    #[test]
    fn test_short_key_array_counts() {
        let records: Vec<u8> = (0..3).flat_map(|i| [i as u8; 20]).collect();
        let packed = encoding::encode(&records);

        let shorts = from_short_key_array(&packed, false, false).unwrap();
        assert_eq!(shorts.len(), 3);
        for (i, s) in shorts.iter().enumerate() {
            assert_eq!(encoding::decode(s).unwrap(), vec![i as u8; 20]);
        }

        let fulls = from_short_key_array(&packed, true, true).unwrap();
        assert_eq!(fulls.len(), 3);
        for (i, s) in fulls.iter().enumerate() {
            let bytes = encoding::decode(s).unwrap();
            assert_eq!(&bytes[..4], &[0x01, 0x00, 0x00, 0x00]);
            assert_eq!(&bytes[4..], &vec![i as u8; 20][..]);
        }
    }

    #[test]
    fn test_short_key_array_drops_partial_record() {
        let mut records: Vec<u8> = (0..2).flat_map(|i| [i as u8; 20]).collect();
        records.extend_from_slice(&[0xee; 7]);
        let packed = encoding::encode(&records);

        let shorts = from_short_key_array(&packed, false, false).unwrap();
        assert_eq!(shorts.len(), 2);

        let err = KeyCodec::strict()
            .from_short_key_array(&packed, false, false)
            .unwrap_err();
        assert!(err.is_unexpected_length());
    }

    #[test]
    fn test_xref_key_array() {
        let model = [0x10u8; 16];
        let full_a = [0x0au8; 24];
        let full_b = [0x0bu8; 24];
        let mut records = Vec::new();
        records.extend_from_slice(&model);
        records.extend_from_slice(&full_a);
        records.extend_from_slice(&model);
        records.extend_from_slice(&full_b);
        let packed = encoding::encode(&records);

        let (models, fulls) = from_xref_key_array(&packed).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(fulls.len(), 2);
        assert!(models.iter().all(|m| m.starts_with("urn:adsk.dtm:")));
        assert_eq!(encoding::decode(&fulls[0]).unwrap(), full_a);
        assert_eq!(encoding::decode(&fulls[1]).unwrap(), full_b);
    }

    #[test]
    fn test_xref_key_array_empty() {
        let (models, fulls) = from_xref_key_array("").unwrap();
        assert!(models.is_empty());
        assert!(fulls.is_empty());
    }

    #[test]
    fn test_element_guid_grouping() {
        let guid = to_element_guid(ZERO_MODEL).unwrap();
        assert_eq!(guid, "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_element_guid_keeps_excess_bytes() {
        let bytes: Vec<u8> = (0u8..20).collect();
        let guid = to_element_guid(&encoding::encode(&bytes)).unwrap();
        assert_eq!(guid, "00010203-0405-0607-0809-0a0b0c0d0e0f-10111213");
    }

    #[test]
    fn test_strict_rejects_undersized() {
        let codec = KeyCodec::strict();
        let err = codec.to_full_key(ZERO_MODEL, false).unwrap_err();
        assert!(matches!(
            err,
            KeyError::UnexpectedLength {
                what: "short key",
                expected: 20,
                actual: 16,
            }
        ));
        assert!(codec.to_short_key(ZERO_SHORT).is_err());
        assert!(codec.from_xref_key(LOGICAL_ZERO_FULL).is_err());
    }

    #[test]
    fn test_lenient_zero_fills_undersized() {
        // 8-byte input: copied into a zeroed 20-byte id region
        let bytes = [0xaa; 8];
        let full = to_full_key(&encoding::encode(&bytes), false).unwrap();
        let decoded = encoding::decode(&full).unwrap();
        assert_eq!(decoded.len(), 24);
        assert_eq!(&decoded[4..12], &bytes);
        assert!(decoded[12..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_lenient_truncates_oversized() {
        let bytes = [0xbb; 30];
        let full = to_full_key(&encoding::encode(&bytes), false).unwrap();
        let decoded = encoding::decode(&full).unwrap();
        assert_eq!(decoded.len(), 24);
        assert_eq!(&decoded[4..], &bytes[..20]);
    }

    proptest! {
        #[test]
        fn prop_short_full_roundtrip(id in prop::array::uniform20(any::<u8>()), is_logical: bool) {
            let short = encoding::encode(&id);
            let full = to_full_key(&short, is_logical).unwrap();
            prop_assert_eq!(to_short_key(&full).unwrap(), short);
            let flags = u32::from_be_bytes(
                encoding::decode(&full).unwrap()[..4].try_into().unwrap(),
            );
            prop_assert_eq!(flags, if is_logical { 0x0100_0000 } else { 0 });
        }

        #[test]
        fn prop_xref_roundtrip(
            model in prop::array::uniform16(any::<u8>()),
            full in prop::array::uniform24(any::<u8>()),
        ) {
            let model_text = encoding::encode(&model);
            let full_text = encoding::encode(&full);
            let xref = to_xref_key(&model_text, &full_text).unwrap();
            let (model_urn, full_out) = from_xref_key(&xref).unwrap();
            prop_assert_eq!(model_urn, format!("urn:adsk.dtm:{}", model_text));
            prop_assert_eq!(full_out, full_text);
        }

        #[test]
        fn prop_system_id_roundtrip(tail: u32) {
            let mut id = [0u8; 20];
            id[16..].copy_from_slice(&tail.to_be_bytes());
            let full = new_element_key_from(0, id);
            let text = to_system_id(&full).unwrap();
            // standard alphabet, '=' stripped only
            prop_assert!(!text.contains('='));
            let bytes = crate::encoding::decode(&text).unwrap();
            let (value, consumed) = crate::varint::decode_u32(&bytes).unwrap();
            prop_assert_eq!(value, tail);
            prop_assert_eq!(consumed, bytes.len());
        }

        #[test]
        fn prop_web_safe_invariant(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let text = encoding::encode(&bytes);
            prop_assert!(!text.contains('+'));
            prop_assert!(!text.contains('/'));
            prop_assert!(!text.ends_with('='));
            prop_assert_eq!(encoding::decode(&text).unwrap(), bytes);
        }
    }
}
