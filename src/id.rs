use std::time::SystemTime;
use std::{fmt, str};

use crate::{Error, Ksuid, Namespace};

#[cfg(feature = "global_gen")]
use crate::GenerateError;

/// Represents a namespaced KSUID: a 3-byte [`Namespace`] followed by a 20-byte [`Ksuid`].
///
/// Values order by namespace first and then by KSUID, which is the lexicographic order of the
/// 23-byte binary representation.
///
/// # Examples
///
/// ```rust
/// use ksuidx::{Id, Namespace};
///
/// const ORDER: Namespace = Namespace::from_static("ord");
///
/// let id = Id::generate(ORDER)?;
/// let text = id.to_string(); // e.g., "ord0ujtsYcgvSTl8PAuAdqWYSMnLOv"
/// assert_eq!(text.len(), 30);
/// assert!(text.starts_with("ord"));
/// assert_eq!(text.parse::<Id>()?, id);
/// assert_eq!(Id::from_bytes(&id.to_bytes())?, id);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Id {
    ns: Namespace,
    ksuid: Ksuid,
}

impl Id {
    /// Nil ID: the [`Namespace::UNKNOWN`] namespace with the nil KSUID.
    ///
    /// Note that this differs from [`Id::default()`], which has an all-zero namespace.
    pub const NIL: Self = Self::from_parts(Namespace::UNKNOWN, Ksuid::NIL);

    /// Length of the binary representation.
    pub const BYTE_LEN: usize = 23;

    /// Length of the string representation.
    pub const STRING_LEN: usize = 30;

    /// Creates an ID from a namespace and a KSUID.
    pub const fn from_parts(ns: Namespace, ksuid: Ksuid) -> Self {
        Self { ns, ksuid }
    }

    /// Generates a new ID in `ns` from the current time, using the global generator.
    ///
    /// # Panics
    ///
    /// Panics if the global generator fails to produce a KSUID, which happens only when the
    /// operating system cannot supply entropy or the system clock is outside the KSUID range. Use
    /// [`Id::generate`] to handle these conditions.
    #[cfg(feature = "global_gen")]
    #[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
    pub fn new(ns: Namespace) -> Self {
        Self::generate(ns).unwrap_or_else(|err| {
            tracing::error!(%err, namespace = %ns, "could not generate KSUID");
            panic!("ksuidx: could not generate KSUID: {err}")
        })
    }

    /// Generates a new ID in `ns` from the current time, using the global generator.
    #[cfg(feature = "global_gen")]
    #[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
    pub fn generate(ns: Namespace) -> Result<Self, GenerateError> {
        crate::ksuid().map(|ksuid| Self::from_parts(ns, ksuid))
    }

    /// Generates a new ID in `ns` from the time passed, using the global generator.
    #[cfg(feature = "global_gen")]
    #[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
    pub fn generate_with_time(ns: Namespace, time: SystemTime) -> Result<Self, GenerateError> {
        crate::ksuid_with_time(time).map(|ksuid| Self::from_parts(ns, ksuid))
    }

    /// Creates an ID from its 23-byte binary representation or from a bare 20-byte KSUID.
    ///
    /// Input of any length other than 23 bytes is handed to [`Ksuid::from_slice`] as a whole and
    /// gets the [`Namespace::UNKNOWN`] namespace if it decodes.
    pub fn from_bytes(src: &[u8]) -> Result<Self, Error> {
        match src.len() {
            Self::BYTE_LEN => {
                let (ns, ksuid) = src.split_at(Namespace::LEN);
                Ok(Self::from_parts(
                    Namespace::from_slice(ns)?,
                    Ksuid::from_slice(ksuid)?,
                ))
            }
            _ => Ok(Self::from(Ksuid::from_slice(src)?)),
        }
    }

    /// Creates an ID from its 30-character string representation or from a bare 27-character
    /// KSUID string.
    pub fn parse(src: &str) -> Result<Self, Error> {
        Self::decode(src.as_bytes())
    }

    /// Creates an ID from its 30-byte text representation or from a bare 27-byte KSUID string.
    ///
    /// Any other length fails with [`Error::StringSize`] before the content is looked at.
    pub fn decode(src: &[u8]) -> Result<Self, Error> {
        match src.len() {
            Ksuid::STRING_LEN => Ok(Self::from(Ksuid::decode(src)?)),
            Self::STRING_LEN => {
                let (ns, ksuid) = src.split_at(Namespace::LEN);
                Ok(Self::from_parts(
                    Namespace::from_slice(ns)?,
                    Ksuid::decode(ksuid)?,
                ))
            }
            _ => Err(Error::StringSize),
        }
    }

    /// Returns the namespace.
    pub const fn namespace(&self) -> Namespace {
        self.ns
    }

    /// Returns the embedded KSUID.
    pub const fn ksuid(&self) -> Ksuid {
        self.ksuid
    }

    /// Returns the creation time encoded in the embedded KSUID.
    pub fn time(&self) -> SystemTime {
        self.ksuid.time()
    }

    /// Returns the raw KSUID timestamp: seconds elapsed since [`Ksuid::EPOCH`].
    pub const fn timestamp(&self) -> u32 {
        self.ksuid.timestamp()
    }

    /// Returns true if this is [`Id::NIL`].
    pub fn is_nil(&self) -> bool {
        self.ns == Namespace::UNKNOWN && self.ksuid.is_nil()
    }

    /// Returns the 23-byte binary representation.
    pub fn to_bytes(&self) -> [u8; 23] {
        let mut bytes = [0u8; 23];
        let (ns, ksuid) = bytes.split_at_mut(Namespace::LEN);
        ns.copy_from_slice(self.ns.as_bytes());
        ksuid.copy_from_slice(self.ksuid.as_bytes());
        bytes
    }

    /// Appends the 23-byte binary representation to `buf`.
    pub fn append_bytes(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_bytes());
    }

    /// Appends the 30-byte text representation to `buf`, copying the namespace bytes verbatim.
    pub fn append_encoded(&self, buf: &mut Vec<u8>) {
        self.ns.append_to(buf);
        self.ksuid.append_encoded(buf);
    }
}

impl fmt::Display for Id {
    /// Returns the namespace followed by the 27-digit Base62 representation of the KSUID.
    ///
    /// A namespace that is not valid UTF-8 is written lossily, so its string form does not parse
    /// back into the same `Id`. Use [`Id::append_encoded`] or [`Id::to_bytes`] to keep such
    /// namespaces byte for byte.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ns, f)?;
        f.write_str(&self.ksuid.encode())
    }
}

impl str::FromStr for Id {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse(src)
    }
}

impl From<Ksuid> for Id {
    /// Wraps a bare KSUID with the [`Namespace::UNKNOWN`] namespace.
    fn from(src: Ksuid) -> Self {
        Self::from_parts(Namespace::UNKNOWN, src)
    }
}

impl From<Id> for [u8; 23] {
    fn from(src: Id) -> Self {
        src.to_bytes()
    }
}

impl From<Id> for String {
    fn from(src: Id) -> Self {
        src.to_string()
    }
}

impl TryFrom<&[u8]> for Id {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(src)
    }
}

impl TryFrom<&str> for Id {
    type Error = Error;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::parse(src)
    }
}

impl TryFrom<String> for Id {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        Self::parse(&src)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    //! Human-readable formats carry the 30-character string; `""` stands for [`Id::NIL`] and
    //! `null` for [`Id::default()`]. Compact formats carry the 23 raw bytes.

    use super::{fmt, Id};
    use serde::{de, Deserializer, Serializer};

    /// Human-readable formats use the [`Display`](fmt::Display) form, so an `Id` whose namespace
    /// is not valid UTF-8 serializes lossily and fails to deserialize back. Compact formats keep
    /// every namespace intact.
    impl serde::Serialize for Id {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.to_string())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Id {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_option(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Id;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a namespaced KSUID representation")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Self::Value::default())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Self::Value::default())
        }

        fn visit_some<D: Deserializer<'de>>(
            self,
            deserializer: D,
        ) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_str(self)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            if value.is_empty() {
                return Ok(Self::Value::NIL);
            }
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_bytes(value).map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::Id;
    use crate::{Error, Generator, Ksuid, Namespace, ParseError};
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::{Duration, UNIX_EPOCH};

    const BLA: Namespace = Namespace::from_static("bla");

    /// Returns a generator with a fixed seed
    fn seeded() -> Generator<StdRng> {
        Generator::new(StdRng::seed_from_u64(0x5eed))
    }

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [(&'static str, [u8; 3], &'static str)] {
        &[
            (
                "bla0ujtsYcgvSTl8PAuAdqWYSMnLOv",
                [b'b', b'l', b'a'],
                "0ujtsYcgvSTl8PAuAdqWYSMnLOv",
            ),
            (
                "unk000000000000000000000000000",
                [b'u', b'n', b'k'],
                "000000000000000000000000000",
            ),
            (
                "zzzaWgEPTl1tmebfsQzFP4bxwgy80V",
                [b'z'; 3],
                "aWgEPTl1tmebfsQzFP4bxwgy80V",
            ),
            (
                "   000000000000000000000000000",
                [b' '; 3],
                "000000000000000000000000000",
            ),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (text, ns, ksuid) in prepare_cases() {
            let e = Id::from_parts(Namespace::from(*ns), ksuid.parse().unwrap());
            assert_eq!(Ok(e), text.parse());
            assert_eq!(&e.to_string(), text);
            assert_eq!(e.namespace(), *ns);
            assert_eq!(&e.ksuid().to_string(), ksuid);

            let bytes = e.to_bytes();
            assert_eq!(bytes[..3], ns[..]);
            assert_eq!(bytes[3..], e.ksuid().as_bytes()[..]);
            assert_eq!(Id::from_bytes(&bytes), Ok(e));
        }
    }

    /// Applies unknown namespace to bare KSUIDs
    #[test]
    fn applies_unknown_namespace_to_bare_ksuids() {
        let ksuid = seeded().generate().unwrap();

        let from_bytes = Id::from_bytes(ksuid.as_bytes()).unwrap();
        assert_eq!(from_bytes.namespace(), Namespace::UNKNOWN);
        assert_eq!(from_bytes.ksuid(), ksuid);

        let from_str = Id::parse(&ksuid.to_string()).unwrap();
        assert_eq!(from_str.namespace(), Namespace::UNKNOWN);
        assert_eq!(from_str, from_bytes);
        assert_eq!(from_str, Id::from(ksuid));
        assert!(from_str.to_string().starts_with("unk"));
    }

    /// Returns error to string of wrong length
    #[test]
    fn returns_error_to_string_of_wrong_length() {
        let cases = [
            "",
            "blah",
            "invalid-ksuid",
            "bla0ujtsYcgvSTl8PAuAdqWYSMnLO",
            "bla0ujtsYcgvSTl8PAuAdqWYSMnLOv ",
            "0ujtsYcgvSTl8PAuAdqWYSMnLOv0",
        ];
        for e in cases {
            assert_eq!(e.parse::<Id>(), Err(Error::StringSize));
        }
    }

    /// Propagates KSUID errors on string content
    #[test]
    fn propagates_ksuid_errors_on_string_content() {
        assert_eq!(
            Id::parse("bla0ujtsYcgvSTl8PAuAdqWYSMnL-v"),
            Err(Error::Ksuid(ParseError::Digit {
                byte: b'-',
                position: 25
            }))
        );
        assert_eq!(
            Id::parse("0ujtsYcgvSTl8PAuAdqWYSMnL-v"),
            Err(Error::Ksuid(ParseError::Digit {
                byte: b'-',
                position: 25
            }))
        );
        assert_eq!(
            Id::parse("blazzzzzzzzzzzzzzzzzzzzzzzzzzz"),
            Err(Error::Ksuid(ParseError::Overflow))
        );
    }

    /// Delegates binary length check to KSUID decoder
    #[test]
    fn delegates_binary_length_check_to_ksuid_decoder() {
        for len in [0usize, 3, 5, 19, 21, 22, 24] {
            assert_eq!(
                Id::from_bytes(&vec![0u8; len]),
                Err(Error::Ksuid(ParseError::ByteLength { actual: len }))
            );
        }
    }

    /// Treats namespace bytes verbatim
    #[test]
    fn treats_namespace_bytes_verbatim() {
        let mut bytes = [0u8; 23];
        bytes[..3].copy_from_slice(&[0xff, 0x00, 0x80]);
        let e = Id::from_bytes(&bytes).unwrap();
        assert_eq!(e.namespace(), [0xff, 0x00, 0x80]);
        assert_eq!(e.to_bytes(), bytes);

        let mut text = Vec::new();
        e.append_encoded(&mut text);
        assert_eq!(text.len(), Id::STRING_LEN);
        assert_eq!(Id::decode(&text), Ok(e));
    }

    /// Builds identical output through both binary paths
    #[test]
    fn builds_identical_output_through_both_binary_paths() {
        let mut g = seeded();
        for _ in 0..100 {
            let e = Id::from_parts(BLA, g.generate().unwrap());
            let mut buf = Vec::new();
            e.append_bytes(&mut buf);
            assert_eq!(buf, e.to_bytes());

            let mut buf = b"prefix".to_vec();
            e.append_bytes(&mut buf);
            assert_eq!(buf[6..], e.to_bytes());

            let mut buf = Vec::new();
            e.append_encoded(&mut buf);
            assert_eq!(buf, e.to_string().as_bytes());
        }
    }

    /// Compares both namespace and KSUID
    #[test]
    fn compares_both_namespace_and_ksuid() {
        let ksuid = seeded().generate().unwrap();
        let a = Id::from_parts(BLA, ksuid);
        let b = Id::from_parts(Namespace::from_static("eek"), ksuid);
        let c = Id::from_parts(BLA, Ksuid::from_parts(ksuid.timestamp(), [0u8; 16]));
        assert_eq!(a, Id::from_parts(BLA, ksuid));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    /// Sorts by namespace and then by time
    #[test]
    fn sorts_by_namespace_and_then_by_time() {
        let mut g = seeded();
        let mut cases = Vec::new();
        for ns in ["aaa", "bla", "zzz"] {
            for secs in [1_500_000_000u64, 1_600_000_000, 1_700_000_000] {
                let t = UNIX_EPOCH + Duration::from_secs(secs);
                cases.push(Id::from_parts(
                    Namespace::new(ns).unwrap(),
                    g.generate_with_time(t).unwrap(),
                ));
            }
        }

        for pair in cases.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].to_bytes() < pair[1].to_bytes());
            assert!(pair[0].to_string() < pair[1].to_string());
        }
    }

    /// Detects nil ID only
    #[test]
    fn detects_nil_id_only() {
        assert!(Id::NIL.is_nil());
        assert!(Id::from(Ksuid::NIL).is_nil());
        assert!(!Id::default().is_nil());
        assert!(!Id::from_parts(BLA, Ksuid::NIL).is_nil());
        assert!(!Id::from(seeded().generate().unwrap()).is_nil());
        assert_eq!(Id::parse("unk000000000000000000000000000"), Ok(Id::NIL));
    }

    /// Extracts time from embedded KSUID
    #[test]
    fn extracts_time_from_embedded_ksuid() {
        let t = UNIX_EPOCH + Duration::from_secs(1_507_608_047);
        let e = Id::from_parts(BLA, seeded().generate_with_time(t).unwrap());
        assert_eq!(e.time(), t);
        assert_eq!(e.timestamp(), 107_608_047);
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        let mut g = seeded();
        for _ in 0..100 {
            let e = Id::from_parts(BLA, g.generate().unwrap());
            assert_eq!(Id::try_from(&<[u8; 23]>::from(e)[..]), Ok(e));
            assert_eq!(Id::try_from(String::from(e)), Ok(e));
            assert_eq!(Id::try_from(e.to_string().as_str()), Ok(e));
        }
    }
}
