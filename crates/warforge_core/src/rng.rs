//! Seeded, forkable pseudo-random streams.
//!
//! The generator is SplitMix64. Every float, integer, choice and shuffle in
//! the engine is derived from [`SeededRng::next`], so a seed fully determines
//! everything downstream of it.

use rand::RngCore;
use warforge_data::RngCursor;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;
const MIX_1: u64 = 0xbf58_476d_1ce4_e5b9;
const MIX_2: u64 = 0x94d0_49bb_1331_11eb;
const F64_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// SplitMix64 finaliser.
pub(crate) fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(MIX_1);
    z = (z ^ (z >> 27)).wrapping_mul(MIX_2);
    z ^ (z >> 31)
}

/// Map the top 53 bits of `bits` onto `[0, 1)`.
pub(crate) fn unit_f64(bits: u64) -> f64 {
    (bits >> 11) as f64 * F64_SCALE
}

/// Rolling `h * 31 + c` hash used to reduce text seeds and fork keys.
///
/// Zero is a fixed point of the stream, so it maps to one.
pub fn hash_str(text: &str) -> u64 {
    let hash = text
        .chars()
        .fold(0u64, |h, c| (h << 5).wrapping_sub(h).wrapping_add(c as u64));
    if hash == 0 {
        1
    } else {
        hash
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    seed: u64,
    state: u64,
    draws: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            state: seed,
            draws: 0,
        }
    }

    /// Seed from arbitrary text via [`hash_str`].
    pub fn from_text(text: &str) -> Self {
        Self::new(hash_str(text))
    }

    /// Resume a stream exactly where [`SeededRng::cursor`] left it.
    pub fn from_cursor(cursor: RngCursor) -> Self {
        Self {
            seed: cursor.seed,
            state: cursor.state,
            draws: cursor.draws,
        }
    }

    pub fn cursor(&self) -> RngCursor {
        RngCursor {
            seed: self.seed,
            state: self.state,
            draws: self.draws,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn seed_hex(&self) -> String {
        format!("{:x}", self.seed)
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Rewind to the first draw.
    pub fn reset(&mut self) {
        self.state = self.seed;
        self.draws = 0;
    }

    fn step(&mut self) -> u64 {
        self.draws += 1;
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix64(self.state)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        let bits = self.step();
        unit_f64(bits)
    }

    /// Uniform integer in `[min, max]`, both inclusive.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            // Still consume a draw so stream positions do not depend on range shape.
            self.next();
            return min;
        }
        let span = (max - min + 1) as f64;
        min + (self.next() * span).floor() as i64
    }

    /// Uniform float in `[min, max)`.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    pub fn next_bool(&mut self, probability: f64) -> bool {
        self.next() < probability
    }

    /// Uniformly chosen element, or `None` without drawing when `items` is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_int(0, items.len() as i64 - 1) as usize;
        items.get(idx)
    }

    /// In-place Fisher-Yates.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int(0, i as i64) as usize;
            items.swap(i, j);
        }
    }

    /// Box-Muller transform; consumes two draws.
    pub fn next_gaussian(&mut self, mean: f64, stddev: f64) -> f64 {
        let u1 = self.next().max(f64::MIN_POSITIVE);
        let u2 = self.next();
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        z0 * stddev + mean
    }

    /// Derive an independent stream from this stream's seed and `key`.
    ///
    /// Forking reads only the seed, never the current state, so it can be
    /// called at any point without disturbing or depending on prior draws.
    pub fn fork(&self, key: &str) -> SeededRng {
        SeededRng::from_text(&format!("{}-{key}", self.seed))
    }
}

impl From<u64> for SeededRng {
    fn from(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl From<&str> for SeededRng {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn test_text_seed_matches_hash() {
        let mut a = SeededRng::from_text("operation-nightfall");
        let mut b = SeededRng::new(hash_str("operation-nightfall"));
        assert_eq!(a.next_int(0, 1000), b.next_int(0, 1000));
    }

    #[test]
    fn test_empty_text_hash_is_one() {
        assert_eq!(hash_str(""), 1);
        assert_eq!(hash_str("a"), 97);
        assert_eq!(hash_str("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_next_is_half_open() {
        let mut rng = SeededRng::new(7);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_int_inclusive_bounds() {
        let mut rng = SeededRng::new(99);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2_000 {
            let v = rng.next_int(-2, 2);
            assert!((-2..=2).contains(&v));
            seen_min |= v == -2;
            seen_max |= v == 2;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_pick_empty_does_not_draw() {
        let mut rng = SeededRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SeededRng::new(3);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_fork_independent_of_draws() {
        let mut parent = SeededRng::new(5);
        let before = parent.fork("entities");
        parent.next();
        parent.next();
        let after = parent.fork("entities");
        assert_eq!(before, after);
        assert_ne!(parent.fork("entities").seed(), parent.fork("narrative").seed());
    }

    #[test]
    fn test_cursor_resumes_stream() {
        let mut original = SeededRng::new(11);
        for _ in 0..5 {
            original.next();
        }
        let mut resumed = SeededRng::from_cursor(original.cursor());
        for _ in 0..20 {
            assert_eq!(original.next().to_bits(), resumed.next().to_bits());
        }
        assert_eq!(original.draws(), 25);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut rng = SeededRng::new(8);
        let first = rng.next();
        rng.next();
        rng.reset();
        assert_eq!(rng.next().to_bits(), first.to_bits());
    }

    #[test]
    fn test_gaussian_is_finite_and_centered() {
        let mut rng = SeededRng::new(21);
        let n = 5_000;
        let mean: f64 = (0..n).map(|_| rng.next_gaussian(10.0, 2.0)).sum::<f64>() / n as f64;
        assert!((mean - 10.0).abs() < 0.2);
    }

    #[test]
    fn test_rng_core_interop() {
        use rand::Rng;
        let mut rng = SeededRng::new(4);
        let v: u8 = rng.gen_range(10..20);
        assert!((10..20).contains(&v));
        let mut buf = [0u8; 13];
        rng.fill_bytes(&mut buf);
        assert!(buf.iter().any(|b| *b != 0));
    }

    #[test]
    fn test_seed_hex() {
        assert_eq!(SeededRng::new(255).seed_hex(), "ff");
    }
}
