//! Document identifier generation.
//!
//! Identifiers are 128 random bits laid out as a version 4 UUID and rendered in
//! the lowercase hyphenated `8-4-4-4-12` form. The random bytes come from a
//! [`RandomSource`], which defaults to the operating system CSPRNG and can be
//! replaced with a deterministic source in tests.

use std::{
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use uuid::Builder;

/// A provider of random bytes used to mint document identifiers.
pub trait RandomSource: Send + Sync + Debug {
    /// Fills `dest` entirely with random bytes.
    ///
    /// Implementations must not return partially filled buffers. A source that
    /// cannot produce randomness has to panic: an identifier space built on bad
    /// randomness breaks every uniqueness guarantee of the store.
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Random source backed by the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        if let Err(err) = getrandom::getrandom(dest) {
            panic!("operating system randomness is unavailable: {err}");
        }
    }
}

/// Deterministic splitmix64 stream.
///
/// Produces the same identifiers for the same seed, which makes fixture data
/// reproducible. Not suitable for production stores.
#[derive(Debug)]
pub struct SeededRandom {
    state: AtomicU64,
}

impl SeededRandom {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a stream starting at `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: AtomicU64::new(seed) }
    }

    fn next_u64(&self) -> u64 {
        let mut z = self
            .state
            .fetch_add(Self::GAMMA, Ordering::Relaxed)
            .wrapping_add(Self::GAMMA);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RandomSource for SeededRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

/// Mints identifiers for documents inserted without one.
///
/// Cloning is cheap; clones share the same random source.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    source: Arc<dyn RandomSource>,
}

impl IdGenerator {
    /// Creates a generator drawing bytes from `source`.
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self { source: Arc::new(source) }
    }

    /// Returns a fresh identifier.
    ///
    /// # Panics
    ///
    /// Panics if the random source cannot produce bytes.
    pub fn new_id(&self) -> String {
        let mut bytes = [0u8; 16];
        self.source.fill_bytes(&mut bytes);

        Builder::from_random_bytes(bytes)
            .into_uuid()
            .hyphenated()
            .to_string()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(OsRandom)
    }
}

/// Returns a fresh identifier from the operating system random source.
pub fn new_id() -> String {
    IdGenerator::default().new_id()
}
