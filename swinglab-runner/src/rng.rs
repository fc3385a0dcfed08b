//! Deterministic per-asset RNG.
//!
//! A master seed is expanded into per-(config, symbol, episode) sub-seeds via
//! BLAKE3, so results do not depend on which rayon worker processes which
//! asset or in what order.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Order-independent sub-seed for one asset and episode.
    pub fn sub_seed(&self, config_hash: &str, symbol: &str, episode: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(config_hash.as_bytes());
        hasher.update(symbol.as_bytes());
        hasher.update(&episode.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    pub fn rng_for(&self, config_hash: &str, symbol: &str, episode: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(config_hash, symbol, episode))
    }
}
