//! Macro for defining fixed-width binary key types.

/// Defines a fixed-width key newtype with a web-safe base64 text form.
///
/// This generates a newtype wrapper around a byte array with:
/// - a `LEN` constant and `from_bytes` / `from_slice` / `as_bytes` accessors
/// - `Display` producing unpadded web-safe base64
/// - strict `parse` / `FromStr` (exact decoded length required)
/// - `Serialize` and `Deserialize` through the text form
///
/// # Example
///
/// ```ignore
/// define_key!(ShortKey, 20, "short key");
/// define_key!(FullKey, 24, "full key");
///
/// let key: ShortKey = "AAAAAAAAAAAAAAAAAAAAAAAAAAA".parse()?;
/// ```
#[macro_export]
macro_rules! define_key {
    ($name:ident, $len:expr, $what:literal) => {
        /// A fixed-width binary key for this identifier shape.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Size of this key in raw bytes.
            pub const LEN: usize = $len;

            /// Human-readable shape name used in error messages.
            pub const WHAT: &'static str = $what;

            /// Wraps a raw byte array.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Copies a slice of exactly [`Self::LEN`] bytes.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, $crate::KeyError> {
                if bytes.len() != $len {
                    return Err($crate::KeyError::UnexpectedLength {
                        what: $what,
                        expected: $len,
                        actual: bytes.len(),
                    });
                }
                let mut buf = [0u8; $len];
                buf.copy_from_slice(bytes);
                Ok(Self(buf))
            }

            /// Returns the raw bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Parses the web-safe base64 text form.
            ///
            /// The decoded length must be exactly [`Self::LEN`].
            pub fn parse(s: &str) -> Result<Self, $crate::KeyError> {
                let bytes = $crate::encoding::decode(s)?;
                Self::from_slice(&bytes)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::encoding::encode(&self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::KeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}
