//! The 20-byte K-Sortable Unique IDentifier embedded in every [`Id`](crate::Id).

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{fmt, str};

use fstr::FStr;
use thiserror::Error;

/// Digit characters used in the Base62 notation, in ascending order.
const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Represents a KSUID: a 32-bit big-endian timestamp followed by a 128-bit random payload.
///
/// The timestamp counts seconds since [`Ksuid::EPOCH`], so the byte order, the order of the
/// 27-character Base62 representation, and the creation time order (to the second) all agree.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Ksuid([u8; 20]);

impl Ksuid {
    /// Nil KSUID (000000000000000000000000000)
    pub const NIL: Self = Self([0x00; 20]);

    /// Max KSUID (aWgEPTl1tmebfsQzFP4bxwgy80V)
    pub const MAX: Self = Self([0xff; 20]);

    /// Unix time in seconds that timestamp zero refers to (2014-05-13T16:53:20Z).
    pub const EPOCH: u64 = 1_400_000_000;

    /// Length of the binary representation.
    pub const BYTE_LEN: usize = 20;

    /// Length of the Base62 string representation.
    pub const STRING_LEN: usize = 27;

    /// Length of the random payload.
    pub const PAYLOAD_LEN: usize = 16;

    /// Creates a KSUID from a timestamp relative to [`Ksuid::EPOCH`] and a random payload.
    pub const fn from_parts(timestamp: u32, payload: [u8; 16]) -> Self {
        let ts = timestamp.to_be_bytes();
        let mut bytes = [0u8; 20];
        let mut i = 0;
        while i < 4 {
            bytes[i] = ts[i];
            i += 1;
        }
        while i < 20 {
            bytes[i] = payload[i - 4];
            i += 1;
        }
        Self(bytes)
    }

    /// Creates a KSUID from its 20-byte binary representation.
    pub fn from_slice(src: &[u8]) -> Result<Self, ParseError> {
        <[u8; 20]>::try_from(src)
            .map(Self)
            .map_err(|_| ParseError::ByteLength { actual: src.len() })
    }

    /// Creates a KSUID from the 27-digit Base62 representation given as ASCII bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ksuidx::Ksuid;
    ///
    /// let x = Ksuid::decode(b"0ujtsYcgvSTl8PAuAdqWYSMnLOv")?;
    /// assert_eq!(x.timestamp(), 107_608_047);
    /// # Ok::<(), ksuidx::ParseError>(())
    /// ```
    pub fn decode(src: &[u8]) -> Result<Self, ParseError> {
        if src.len() != Self::STRING_LEN {
            return Err(ParseError::StringLength { actual: src.len() });
        }

        let mut dst = [0u8; 20];
        for (position, &byte) in src.iter().enumerate() {
            let mut carry = decode_digit(byte).ok_or(ParseError::Digit { byte, position })?;
            for e in dst.iter_mut().rev() {
                let acc = u32::from(*e) * 62 + carry;
                *e = acc as u8;
                carry = acc >> 8;
            }
            if carry != 0 {
                return Err(ParseError::Overflow);
            }
        }
        Ok(Self(dst))
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the timestamp field: seconds elapsed since [`Ksuid::EPOCH`].
    pub const fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Returns the 16-byte random payload.
    pub fn payload(&self) -> &[u8] {
        &self.0[4..]
    }

    /// Returns the creation time encoded in the timestamp field.
    pub fn time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(Self::EPOCH + u64::from(self.timestamp()))
    }

    /// Returns true if this is the nil KSUID.
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Returns the 27-digit Base62 string representation stored in a stack-allocated string type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ksuidx::Ksuid;
    ///
    /// let x = Ksuid::MAX.encode();
    /// assert_eq!(&x as &str, "aWgEPTl1tmebfsQzFP4bxwgy80V");
    /// assert_eq!(format!("{}", x), "aWgEPTl1tmebfsQzFP4bxwgy80V");
    /// ```
    pub fn encode(&self) -> FStr<27> {
        let mut num = self.0;
        let mut buffer = [b'0'; 27];
        for d in buffer.iter_mut().rev() {
            // long division of the big-endian number by 62
            let mut rem = 0u32;
            for e in num.iter_mut() {
                let acc = (rem << 8) | u32::from(*e);
                *e = (acc / 62) as u8;
                rem = acc % 62;
            }
            *d = DIGITS[rem as usize];
        }
        FStr::from_bytes(buffer).unwrap_or_else(|_| unreachable!("Base62 digits are ASCII"))
    }

    /// Appends the 27-digit Base62 representation to `buf`.
    pub fn append_encoded(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.encode().as_bytes());
    }
}

/// Returns the numeric value of a Base62 digit.
const fn decode_digit(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as u32),
        b'A'..=b'Z' => Some((c - b'A') as u32 + 10),
        b'a'..=b'z' => Some((c - b'a') as u32 + 36),
        _ => None,
    }
}

impl fmt::Display for Ksuid {
    /// Returns the 27-digit canonical Base62 string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Ksuid {
    type Err = ParseError;

    /// Creates an object from the 27-digit Base62 string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::decode(src.as_bytes())
    }
}

impl From<Ksuid> for [u8; 20] {
    fn from(src: Ksuid) -> Self {
        src.0
    }
}

impl From<[u8; 20]> for Ksuid {
    fn from(src: [u8; 20]) -> Self {
        Self(src)
    }
}

impl TryFrom<&[u8]> for Ksuid {
    type Error = ParseError;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

impl AsRef<[u8]> for Ksuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Ksuid> for String {
    fn from(src: Ksuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Ksuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Error decoding an invalid binary or string representation of KSUID.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum ParseError {
    /// The binary representation is not 20 bytes long.
    #[error("valid KSUIDs are 20 bytes, got {actual}")]
    ByteLength { actual: usize },

    /// The string representation is not 27 characters long.
    #[error("valid encoded KSUIDs are 27 characters, got {actual}")]
    StringLength { actual: usize },

    /// The string representation contains a character outside the Base62 alphabet.
    #[error("invalid base62 digit {byte:#04x} at position {position}")]
    Digit { byte: u8, position: usize },

    /// The string representation denotes a value greater than [`Ksuid::MAX`].
    #[error("valid encoded KSUIDs are bounded by aWgEPTl1tmebfsQzFP4bxwgy80V")]
    Overflow,
}

impl ParseError {
    /// Returns true if this error was caused by the input length.
    pub fn is_size_error(&self) -> bool {
        matches!(
            self,
            ParseError::ByteLength { .. } | ParseError::StringLength { .. }
        )
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Ksuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Ksuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Ksuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Ksuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a KSUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_slice(value).map_err(de::Error::custom)
        }
    }

}
