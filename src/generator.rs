//! KSUID generator and related types.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use thiserror::Error;

use crate::Ksuid;

/// Represents a KSUID generator that combines a timestamp with a 128-bit random payload drawn
/// from the random number generator it owns.
///
/// The type lets callers choose the random number generator and the clock. Wrap it in a mutex to
/// share one instance between threads, or use the process-wide generator behind
/// [`Id::generate`](crate::Id::generate) instead.
///
/// # Examples
///
/// ```rust
/// use ksuidx::Generator;
///
/// let mut g = Generator::new(rand::rngs::OsRng);
/// println!("{}", g.generate()?);
/// # Ok::<(), ksuidx::GenerateError>(())
/// ```
///
/// # Generator functions
///
/// | Flavor                 | Timestamp              |
/// | ---------------------- | ---------------------- |
/// | [`generate`]           | Now                    |
/// | [`generate_with_time`] | Argument (`SystemTime`) |
/// | [`generate_core`]      | Argument (KSUID seconds) |
///
/// All of them return an error instead of panicking when the random number generator fails or the
/// timestamp cannot be represented.
///
/// [`generate`]: Generator::generate
/// [`generate_with_time`]: Generator::generate_with_time
/// [`generate_core`]: Generator::generate_core
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Generator<R> {
    /// The random number generator used by the generator.
    rng: R,
}

impl<R: RngCore> Generator<R> {
    /// Creates a generator instance.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a new KSUID object from the current system time.
    pub fn generate(&mut self) -> Result<Ksuid, GenerateError> {
        self.generate_with_time(SystemTime::now())
    }

    /// Generates a new KSUID object from the time passed.
    ///
    /// Times earlier than [`Ksuid::EPOCH`] or later than about 136 years after it are rejected
    /// with [`GenerateError::TimestampRange`].
    pub fn generate_with_time(&mut self, time: SystemTime) -> Result<Ksuid, GenerateError> {
        self.generate_core(to_ksuid_timestamp(time)?)
    }

    /// Generates a new KSUID object from a timestamp relative to [`Ksuid::EPOCH`].
    pub fn generate_core(&mut self, timestamp: u32) -> Result<Ksuid, GenerateError> {
        let mut payload = [0u8; Ksuid::PAYLOAD_LEN];
        self.rng.try_fill_bytes(&mut payload)?;
        Ok(Ksuid::from_parts(timestamp, payload))
    }
}

/// Converts a system time into seconds since [`Ksuid::EPOCH`].
fn to_ksuid_timestamp(time: SystemTime) -> Result<u32, GenerateError> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| d.as_secs().checked_sub(Ksuid::EPOCH))
        .and_then(|secs| u32::try_from(secs).ok())
        .ok_or(GenerateError::TimestampRange(time))
}

/// Error generating a new KSUID.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The time cannot be represented as a 32-bit count of seconds since [`Ksuid::EPOCH`].
    #[error("time {0:?} is outside the range of KSUID timestamps")]
    TimestampRange(SystemTime),

    /// The random number generator could not supply the payload.
    #[error("could not read random payload: {0}")]
    Entropy(#[from] rand::Error),
}
