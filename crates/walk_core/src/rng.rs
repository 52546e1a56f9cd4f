//! Deterministic per-particle random streams.
//!
//! Every particle owns a private generator keyed by `(seed, particle_index)`.
//! Derivation hashes the pair instead of advancing a shared generator, so
//! streams can be created in any order, on any thread, and a particle's
//! randomness never depends on how many other particles exist.

use rand::{Error, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Counter-based splitmix stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stream {
    /// Upper 64 bits store the stream id; lower 64 bits store the rolling
    /// counter.
    state: u128,
}

impl Stream {
    /// Construct the stream for particle `particle_index` under `seed`.
    pub fn from(seed: i64, particle_index: u64) -> Self {
        let mut stream_id = (seed as u64)
            .wrapping_mul(0xA0761D6478BD642F)
            .wrapping_add(0xE7037ED1A0B428DB);
        stream_id = mix64(stream_id);
        stream_id = mix64(stream_id ^ particle_index.wrapping_mul(0x8E9D5A8F6A09E667));
        let counter = mix64(stream_id ^ 0xD1342543DE82EF95);
        Self {
            state: (u128::from(stream_id) << 64) | u128::from(counter),
        }
    }

    pub fn stream_id(&self) -> u64 {
        (self.state >> 64) as u64
    }

    /// Advance the stream and return the next `u64` sample.
    pub fn next_u64(&mut self) -> u64 {
        let stream_id = self.stream_id();
        let counter = (self.state as u64).wrapping_add(0x9E3779B97F4A7C15);
        self.state = (u128::from(stream_id) << 64) | u128::from(counter);
        mix64(stream_id ^ counter)
    }
}

impl RngCore for Stream {
    fn next_u32(&mut self) -> u32 {
        (Stream::next_u64(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        Stream::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = Stream::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Maps `(seed, particle_index)` to a fresh, independent generator.
///
/// Implementations must be pure: equal inputs give bit-identical streams.
pub trait StreamDeriver: Sync {
    type Stream: RngCore + Send;

    fn derive(&self, seed: i64, particle_index: u64) -> Self::Stream;
}

/// Derives [`Stream`] instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitMixDeriver;

impl StreamDeriver for SplitMixDeriver {
    type Stream = Stream;

    fn derive(&self, seed: i64, particle_index: u64) -> Stream {
        Stream::from(seed, particle_index)
    }
}

/// Derives ChaCha8 generators keyed by the seed, with the particle index as
/// the ChaCha stream id.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChaChaDeriver;

impl StreamDeriver for ChaChaDeriver {
    type Stream = ChaCha8Rng;

    fn derive(&self, seed: i64, particle_index: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        rng.set_stream(particle_index);
        rng
    }
}

/// Generator family used for particle streams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    #[default]
    SplitMix,
    ChaCha,
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
