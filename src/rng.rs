//! Seeded random number streams.
//!
//! Every synthetic draw in the crate (the coastal coin, projection noise,
//! estimator jitter, panel metric jitter) goes through a named stream
//! derived from a single master seed, so an entire session is reproducible
//! from `(seed, inputs)` alone.

use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// Named stream, seeded lazily from the master generator.
    ///
    /// Streams are independent once created: draws on one never disturb
    /// another. Creation order of *new* streams does affect their seeds,
    /// so callers that care about reproducibility should use stable names
    /// and a stable first-use order.
    pub fn stream(&mut self, name: &str) -> StreamRng<'_> {
        let entry = self.streams.entry(name.to_string()).or_insert_with(|| {
            let mut seed = [0u8; 32];
            self.master.fill_bytes(&mut seed);
            ChaCha8Rng::from_seed(seed)
        });
        StreamRng { inner: entry }
    }
}

pub struct StreamRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for StreamRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
