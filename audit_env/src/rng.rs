//! Seeded draw stream shared by election generation and every audit test.

use crate::error::EnvError;
use crate::mt19937::Mt19937;
use rand::{Error, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 2^32, the scale that maps a raw word onto `[0, 1)`.
const WORD_SCALE: f64 = 4_294_967_296.0;

/// Frozen generator algorithms.
///
/// Changing the behaviour of an existing variant breaks every seed recorded
/// against it; new behaviour gets a new variant instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RngAlgorithm {
    /// Mersenne Twister seeded with the low 32 bits of the seed
    #[default]
    Mt19937,

    /// ChaCha with 8 rounds, seeded through `seed_from_u64`
    ChaCha8,
}

impl RngAlgorithm {
    /// Returns the canonical algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            RngAlgorithm::Mt19937 => "mt19937",
            RngAlgorithm::ChaCha8 => "chacha8",
        }
    }

    /// Returns the contract version of this algorithm's draw stream.
    pub fn contract_version(&self) -> u32 {
        match self {
            RngAlgorithm::Mt19937 => 1,
            RngAlgorithm::ChaCha8 => 1,
        }
    }
}

impl std::fmt::Display for RngAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for RngAlgorithm {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mt19937" | "mt" | "mersenne" => Ok(RngAlgorithm::Mt19937),
            "chacha8" | "chacha" => Ok(RngAlgorithm::ChaCha8),
            _ => Err(EnvError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Mt(Mt19937),
    ChaCha(ChaCha8Rng),
}

/// A single, advanceable stream of deterministic draws.
///
/// The stream is an ordinary owned value: callers pass it by `&mut` through
/// each phase that consumes entropy, so the order of operations is visible in
/// the code and two streams never interfere.
#[derive(Debug, Clone)]
pub struct SimRng {
    /// Seed the stream was created from
    seed: u64,

    /// Algorithm backing the stream
    algorithm: RngAlgorithm,

    backend: Backend,

    /// Number of 32-bit words consumed so far
    words_drawn: u64,
}

impl SimRng {
    /// Creates a stream for `seed` using the given algorithm.
    pub fn new(seed: u64, algorithm: RngAlgorithm) -> Self {
        let backend = match algorithm {
            RngAlgorithm::Mt19937 => Backend::Mt(Mt19937::seed_from_u64(seed)),
            RngAlgorithm::ChaCha8 => Backend::ChaCha(ChaCha8Rng::seed_from_u64(seed)),
        };

        Self {
            seed,
            algorithm,
            backend,
            words_drawn: 0,
        }
    }

    /// Returns the seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the backing algorithm.
    pub fn algorithm(&self) -> RngAlgorithm {
        self.algorithm
    }

    /// Returns how many 32-bit words have been consumed.
    pub fn words_drawn(&self) -> u64 {
        self.words_drawn
    }

    /// Draws one raw 32-bit word.
    pub fn next_word(&mut self) -> u32 {
        self.words_drawn += 1;
        match &mut self.backend {
            Backend::Mt(mt) => mt.next_u32(),
            Backend::ChaCha(chacha) => chacha.next_u32(),
        }
    }

    /// Draws a float in `[0, 1)` from one word.
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.next_word()) / WORD_SCALE
    }

    /// Draws an integer in `[0, n)` from one word.
    ///
    /// Computed as `floor(next_unit() * n)`. For `n` above 2^32 only 2^32
    /// distinct values are reachable.
    pub fn below(&mut self, n: u64) -> Result<u64, EnvError> {
        if n == 0 {
            return Err(EnvError::EmptyPopulation);
        }
        let scaled = (self.next_unit() * n as f64).floor() as u64;
        Ok(scaled.min(n - 1))
    }

    /// Draws `k` distinct values from `[0, n)` in draw order.
    ///
    /// Sparse partial Fisher–Yates: step `i` swaps position `i` with a
    /// position drawn from `[i, n)` and emits the value landing at `i`.
    /// Consumes exactly `k` words and `O(k)` memory regardless of `n`.
    pub fn sample_without_replacement(&mut self, n: u64, k: u64) -> Result<Vec<u64>, EnvError> {
        if k > n {
            return Err(EnvError::oversized(k, n));
        }

        // Positions that have been swapped away from their identity value
        let mut displaced: HashMap<u64, u64> = HashMap::with_capacity(k as usize);
        let mut picked = Vec::with_capacity(k as usize);

        for i in 0..k {
            let j = i + self.below(n - i)?;
            let at_i = displaced.get(&i).copied().unwrap_or(i);
            let at_j = displaced.get(&j).copied().unwrap_or(j);
            picked.push(at_j);
            displaced.insert(j, at_i);
            displaced.remove(&i);
        }

        Ok(picked)
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_word());
        let hi = u64::from(self.next_word());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_stream() {
        for algorithm in [RngAlgorithm::Mt19937, RngAlgorithm::ChaCha8] {
            let mut a = SimRng::new(42, algorithm);
            let mut b = SimRng::new(42, algorithm);

            for _ in 0..100 {
                assert_eq!(a.next_word(), b.next_word());
            }
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SimRng::new(12345, RngAlgorithm::Mt19937);
        let mut b = SimRng::new(54321, RngAlgorithm::Mt19937);

        let wa: Vec<u32> = (0..10).map(|_| a.next_word()).collect();
        let wb: Vec<u32> = (0..10).map(|_| b.next_word()).collect();
        assert_ne!(wa, wb);
    }

    #[test]
    fn test_mt_backend_matches_reference() {
        let mut rng = SimRng::new(5489, RngAlgorithm::Mt19937);
        assert_eq!(rng.next_word(), 3499211612);
    }

    #[test]
    fn test_chacha_backend_first_words() {
        let mut rng = SimRng::new(42, RngAlgorithm::ChaCha8);
        let words: Vec<u32> = (0..3).map(|_| rng.next_word()).collect();

        assert_eq!(words, vec![962419617, 2928721845, 628724104]);
        assert_eq!(rng.algorithm(), RngAlgorithm::ChaCha8);
    }

    #[test]
    fn test_below_mapping_is_frozen() {
        let mut mt = SimRng::new(12345, RngAlgorithm::Mt19937);
        let draws: Vec<u64> = [10, 100, 1000].iter().map(|&n| mt.below(n).unwrap()).collect();
        assert_eq!(draws, vec![9, 89, 316]);

        let mut chacha = SimRng::new(12345, RngAlgorithm::ChaCha8);
        let draws: Vec<u64> = [10, 100, 1000]
            .iter()
            .map(|&n| chacha.below(n).unwrap())
            .collect();
        assert_eq!(draws, vec![6, 7, 468]);
    }

    #[test]
    fn test_sample_order_is_frozen() {
        let mut mt = SimRng::new(12345, RngAlgorithm::Mt19937);
        assert_eq!(
            mt.sample_without_replacement(10_000, 5).unwrap(),
            vec![9296, 8901, 3165, 1309, 1842]
        );

        let mut chacha = SimRng::new(12345, RngAlgorithm::ChaCha8);
        assert_eq!(
            chacha.sample_without_replacement(10_000, 5).unwrap(),
            vec![6693, 737, 4686, 427, 4096]
        );
    }

    #[test]
    fn test_rng_core_words_little_endian() {
        let mut rng = SimRng::new(12345, RngAlgorithm::Mt19937);
        assert_eq!(rng.next_u64(), 16420456181932970466);
        assert_eq!(rng.words_drawn(), 2);

        let mut rng = SimRng::new(12345, RngAlgorithm::Mt19937);
        let mut buf = [0u8; 6];
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [226, 81, 251, 237, 229, 45]);
        assert_eq!(rng.words_drawn(), 2);
    }

    #[test]
    fn test_algorithm_serde_names() {
        for algorithm in [RngAlgorithm::Mt19937, RngAlgorithm::ChaCha8] {
            let json = serde_json::to_string(&algorithm).unwrap();
            assert_eq!(json, format!("\"{}\"", algorithm.name()));
            assert_eq!(serde_json::from_str::<RngAlgorithm>(&json).unwrap(), algorithm);
            assert_eq!(algorithm.contract_version(), 1);
        }
    }

    #[test]
    fn test_unit_range() {
        let mut rng = SimRng::new(0, RngAlgorithm::Mt19937);
        for _ in 0..1000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_below_bounds_and_empty() {
        let mut rng = SimRng::new(7, RngAlgorithm::ChaCha8);
        for n in 1..200u64 {
            assert!(rng.below(n).unwrap() < n);
        }
        assert_eq!(rng.below(0), Err(EnvError::EmptyPopulation));
    }

    #[test]
    fn test_sample_distinct_and_in_range() {
        let mut rng = SimRng::new(12345, RngAlgorithm::Mt19937);
        let sample = rng.sample_without_replacement(10_000, 500).unwrap();

        assert_eq!(sample.len(), 500);
        let unique: HashSet<u64> = sample.iter().copied().collect();
        assert_eq!(unique.len(), 500);
        assert!(sample.iter().all(|&v| v < 10_000));
    }

    #[test]
    fn test_full_sample_is_permutation() {
        let mut rng = SimRng::new(99, RngAlgorithm::Mt19937);
        let mut sample = rng.sample_without_replacement(257, 257).unwrap();
        sample.sort_unstable();

        assert_eq!(sample, (0..257).collect::<Vec<u64>>());
    }

    #[test]
    fn test_sample_consumes_one_word_per_value() {
        let mut rng = SimRng::new(1, RngAlgorithm::Mt19937);
        rng.sample_without_replacement(1_000, 37).unwrap();
        assert_eq!(rng.words_drawn(), 37);
    }

    #[test]
    fn test_oversized_sample_rejected() {
        let mut rng = SimRng::new(1, RngAlgorithm::Mt19937);
        let err = rng.sample_without_replacement(10, 11).unwrap_err();

        assert_eq!(err, EnvError::oversized(11, 10));
        assert_eq!(rng.words_drawn(), 0);
    }

    #[test]
    fn test_empty_sample_from_empty_population() {
        let mut rng = SimRng::new(1, RngAlgorithm::Mt19937);
        assert!(rng.sample_without_replacement(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("MT19937".parse::<RngAlgorithm>().unwrap(), RngAlgorithm::Mt19937);
        assert_eq!("chacha".parse::<RngAlgorithm>().unwrap(), RngAlgorithm::ChaCha8);
        assert!(matches!(
            "xorshift".parse::<RngAlgorithm>(),
            Err(EnvError::UnknownAlgorithm(_))
        ));
    }
}
