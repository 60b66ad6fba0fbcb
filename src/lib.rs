//! Namespaced, sortable identifiers built on KSUID
//!
//! ```rust
//! use ksuidx::{Id, Namespace};
//!
//! const USER: Namespace = Namespace::from_static("usr");
//!
//! let id = Id::generate(USER)?;
//! println!("{}", id); // e.g., "usr0ujtsYcgvSTl8PAuAdqWYSMnLOv"
//! println!("{:?}", id.to_bytes()); // as 23-byte array
//! # Ok::<(), ksuidx::GenerateError>(())
//! ```
//!
//! See [KSUID](https://github.com/segmentio/ksuid) for the embedded identifier.
//!
//! # Field and byte layout
//!
//! An [`Id`] is 23 bytes long:
//!
//! ```text
//!  0       3               7                                              23
//! +-------+---------------+-----------------------------------------------+
//! |  ns   |   timestamp   |                    payload                    |
//! +-------+---------------+-----------------------------------------------+
//! ```
//!
//! Where:
//!
//! - The 3-byte `ns` field holds the [`Namespace`] tag verbatim. ASCII is expected but not
//!   enforced.
//! - The 32-bit big-endian `timestamp` field counts seconds since [`Ksuid::EPOCH`]
//!   (2014-05-13T16:53:20Z), which lasts until the year 2150.
//! - The 128-bit `payload` field is filled with random bits from a cryptographically strong
//!   random number generator.
//!
//! The last 20 bytes form a plain KSUID. The textual form is the 3 namespace characters followed
//! by the 27-digit Base62 encoding of the KSUID, 30 characters in total. Bare KSUIDs (20 bytes or
//! 27 characters) are accepted wherever an [`Id`] is decoded and get [`Namespace::UNKNOWN`].
//!
//! ```rust
//! use ksuidx::{Id, Namespace};
//!
//! let id: Id = "0ujtsYcgvSTl8PAuAdqWYSMnLOv".parse()?;
//! assert_eq!(id.namespace(), Namespace::UNKNOWN);
//! assert_eq!(id.to_string(), "unk0ujtsYcgvSTl8PAuAdqWYSMnLOv");
//! # Ok::<(), ksuidx::Error>(())
//! ```
//!
//! # Crate features
//!
//! - `global_gen` (default): the process-wide generator behind [`Id::new`], [`Id::generate`],
//!   and [`ksuid()`], seeded from the operating system.
//! - `serde` (default): `Serialize` and `Deserialize` implementations. Human-readable formats
//!   use the string form, in which `""` denotes [`Id::NIL`] and `null` denotes [`Id::default()`].

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod ksuid;
pub use ksuid::{Ksuid, ParseError};

mod namespace;
pub use namespace::Namespace;

mod id;
pub use id::Id;

pub mod generator;
pub use generator::{GenerateError, Generator};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{ksuid, ksuid_with_time};
