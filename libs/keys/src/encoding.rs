//! Web-safe base64 encoding and decoding.
//!
//! The platform represents every binary identifier as "web-safe" base64:
//! standard base64 with `+` replaced by `-`, `/` replaced by `_`, and
//! trailing `=` padding stripped. System IDs are the one exception: they
//! use the standard alphabet with only the padding stripped (see
//! [`encode_system_id`]).

use base64::alphabet;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::error::KeyError;

/// Decode engine: URL-safe alphabet, padding accepted but not required.
const WEB_SAFE_INDIFFERENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes raw bytes as unpadded web-safe base64.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes web-safe base64 text into raw bytes.
///
/// Standard-alphabet and padded input are accepted: the text is normalized
/// through the same substitutions [`encode_web_safe`] applies before
/// decoding. Characters outside either alphabet are [`KeyError::InvalidEncoding`].
pub fn decode(text: &str) -> Result<Vec<u8>, KeyError> {
    let normalized: String = text
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    WEB_SAFE_INDIFFERENT
        .decode(normalized.as_bytes())
        .map_err(|e| KeyError::invalid_encoding(e.to_string()))
}

/// Re-encodes base64 text as web-safe base64.
///
/// Pure character substitution (`+` to `-`, `/` to `_`, trailing `=`
/// stripped). Total over any input text, whether or not it originated from
/// this codec.
#[must_use]
pub fn encode_web_safe(text: &str) -> String {
    text.trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Encodes bytes as standard-alphabet base64 with padding stripped.
///
/// Used only for system IDs. The `+`/`/` substitution is deliberately not
/// applied here: the consuming system expects the standard alphabet for
/// this one key shape.
#[must_use]
pub fn encode_system_id(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_roundtrip() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let text = encode(&bytes);
        assert_eq!(decode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_encode_is_web_safe() {
        // 0xff runs produce '/' and '+' in the standard alphabet
        let text = encode(&[0xff, 0xff, 0xff, 0xfb, 0xef]);
        assert!(!text.contains('+'));
        assert!(!text.contains('/'));
        assert!(!text.contains('='));
    }

    #[test]
    fn test_decode_accepts_standard_alphabet() {
        assert_eq!(decode("////").unwrap(), vec![0xff, 0xff, 0xff]);
        assert_eq!(decode("____").unwrap(), vec![0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_decode_accepts_padding() {
        assert_eq!(decode("AQ==").unwrap(), vec![0x01]);
        assert_eq!(decode("AQ").unwrap(), vec![0x01]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode("not base64!!").unwrap_err();
        assert!(err.is_invalid_encoding());
    }

    #[test]
    fn test_encode_web_safe_substitutions() {
        assert_eq!(encode_web_safe("a+b/c=="), "a-b_c");
        assert_eq!(encode_web_safe("AQAA"), "AQAA");
        assert_eq!(encode_web_safe(""), "");
    }

    #[test]
    fn test_system_id_keeps_standard_alphabet() {
        assert_eq!(encode_system_id(&[0xff, 0xff, 0xff]), "////");
        assert_eq!(encode_system_id(&[0x01]), "AQ");
    }
}
