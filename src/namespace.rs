//! The 3-byte tag that classifies what an [`Id`](crate::Id) refers to.

use std::{fmt, str};

use crate::Error;

/// A 3-byte namespace tag.
///
/// The bytes are kept verbatim. ASCII is expected by convention but not enforced.
///
/// # Examples
///
/// ```rust
/// use ksuidx::Namespace;
///
/// const USER: Namespace = Namespace::from_static("usr");
///
/// let ns: Namespace = "usr".parse()?;
/// assert_eq!(ns, USER);
/// assert_eq!(ns, "usr");
/// assert_eq!(ns, *b"usr");
/// assert_ne!(ns, "usr!");
/// # Ok::<(), ksuidx::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Namespace([u8; 3]);

impl Namespace {
    /// Namespace applied to identifiers built from a bare KSUID (`unk`).
    pub const UNKNOWN: Self = Self(*b"unk");

    /// Length of a namespace in bytes.
    pub const LEN: usize = 3;

    /// Creates a namespace from exactly 3 bytes.
    pub fn new(src: impl AsRef<[u8]>) -> Result<Self, Error> {
        Self::from_slice(src.as_ref())
    }

    /// Creates a namespace from exactly 3 bytes.
    pub fn from_slice(src: &[u8]) -> Result<Self, Error> {
        <[u8; 3]>::try_from(src)
            .map(Self)
            .map_err(|_| Error::NamespaceSize)
    }

    /// Creates a namespace from a raw 3-byte array.
    pub const fn from_raw_bytes(src: [u8; 3]) -> Self {
        Self(src)
    }

    /// Creates a namespace from a string literal, typically to define a constant.
    ///
    /// # Panics
    ///
    /// Panics if `src` is not exactly 3 bytes long. Use [`Namespace::new`] for input that is not
    /// known in advance.
    pub const fn from_static(src: &'static str) -> Self {
        match src.as_bytes() {
            [a, b, c] => Self([*a, *b, *c]),
            _ => panic!("invalid namespace: valid namespaces are 3 bytes"),
        }
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }

    /// Returns a copy of the underlying byte array.
    pub const fn to_bytes(self) -> [u8; 3] {
        self.0
    }

    /// Returns the namespace as a string slice if it is valid UTF-8.
    pub fn as_str(&self) -> Result<&str, str::Utf8Error> {
        str::from_utf8(&self.0)
    }

    /// Appends the raw bytes to `buf`.
    pub fn append_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0);
    }
}

impl fmt::Display for Namespace {
    /// Writes the raw bytes as text, substituting invalid UTF-8 sequences.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Ok(s) => f.write_str(s),
            Err(_) => f.write_str(&String::from_utf8_lossy(&self.0)),
        }
    }
}

impl str::FromStr for Namespace {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::new(src)
    }
}

impl From<[u8; 3]> for Namespace {
    fn from(src: [u8; 3]) -> Self {
        Self(src)
    }
}

impl From<Namespace> for [u8; 3] {
    fn from(src: Namespace) -> Self {
        src.0
    }
}

impl TryFrom<&[u8]> for Namespace {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

impl TryFrom<&str> for Namespace {
    type Error = Error;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::new(src)
    }
}

impl AsRef<[u8]> for Namespace {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<[u8; 3]> for Namespace {
    fn eq(&self, other: &[u8; 3]) -> bool {
        self.0 == *other
    }
}

impl PartialEq<[u8]> for Namespace {
    fn eq(&self, other: &[u8]) -> bool {
        self.0[..] == *other
    }
}

impl PartialEq<&[u8]> for Namespace {
    fn eq(&self, other: &&[u8]) -> bool {
        self.0[..] == **other
    }
}

impl PartialEq<str> for Namespace {
    fn eq(&self, other: &str) -> bool {
        self.0[..] == *other.as_bytes()
    }
}

impl PartialEq<&str> for Namespace {
    fn eq(&self, other: &&str) -> bool {
        self.0[..] == *other.as_bytes()
    }
}

macro_rules! impl_reversed_eq {
    ($($lhs:ty),*) => {$(
        impl PartialEq<Namespace> for $lhs {
            fn eq(&self, other: &Namespace) -> bool {
                *other == *self
            }
        }
    )*};
}

impl_reversed_eq!([u8; 3], [u8], &[u8], str, &str);
