//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;
use std::time::SystemTime;

use crate::generator::{GenerateError, Generator};
use crate::Ksuid;
use inner::{GlobalGenInner, GlobalGenRng};

/// Runs `f` with the process-wide global generator, creating one if none exists or if the process
/// ID has changed since it was created.
fn with_global_gen<T>(
    f: impl FnOnce(&mut Generator<GlobalGenRng>) -> Result<T, GenerateError>,
) -> Result<T, GenerateError> {
    static G: sync::OnceLock<sync::Mutex<Option<GlobalGenInner>>> = sync::OnceLock::new();

    // the generator holds no state that a panicking holder could leave inconsistent
    let mut guard = G
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(sync::PoisonError::into_inner);

    let inner = match guard.take() {
        Some(inner) if inner.is_current() => inner,
        _ => GlobalGenInner::new()?,
    };
    f(&mut guard.insert(inner).generator)
}

/// Generates a KSUID object from the current system time.
///
/// This function employs a global generator seeded from the operating system. On Unix, this
/// function resets the generator when the process ID changes (i.e., upon process forks) so that
/// forked processes do not produce identical payloads.
///
/// # Examples
///
/// ```rust
/// let ksuid = ksuidx::ksuid()?;
/// println!("{}", ksuid); // e.g., "0ujtsYcgvSTl8PAuAdqWYSMnLOv"
/// println!("{:?}", ksuid.as_bytes()); // as 20-byte big-endian array
/// # Ok::<(), ksuidx::GenerateError>(())
/// ```
pub fn ksuid() -> Result<Ksuid, GenerateError> {
    with_global_gen(|g| g.generate())
}

/// Generates a KSUID object from the time passed using the global generator.
pub fn ksuid_with_time(time: SystemTime) -> Result<Ksuid, GenerateError> {
    with_global_gen(|g| g.generate_with_time(time))
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Core;

    use crate::generator::Generator;

    /// The type alias for the random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    pub type GlobalGenRng = ReseedingRng<ChaCha12Core, OsRng>;

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        pub generator: Generator<GlobalGenRng>,
    }

    impl GlobalGenInner {
        /// Creates a generator seeded from the operating system.
        pub fn new() -> Result<Self, rand::Error> {
            let core = ChaCha12Core::from_rng(OsRng)?;
            tracing::debug!(pid = std::process::id(), "seeded global KSUID generator");
            Ok(Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: Generator::new(ReseedingRng::new(core, 1024 * 64, OsRng)),
            })
        }

        /// Returns false if the process ID has changed since this instance was created.
        pub fn is_current(&self) -> bool {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                tracing::debug!(
                    old_pid = self.pid,
                    pid = std::process::id(),
                    "process ID changed; discarding global KSUID generator"
                );
                return false;
            }
            true
        }
    }
}
