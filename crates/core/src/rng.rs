//! RNG module - injectable random source for tile values and targets
//!
//! Every draw the engine makes goes through [`RandomSource`], so tests can pin
//! the exact sequence of values while the game itself uses [`SimpleRng`].

/// Source of uniformly distributed `u32` values.
pub trait RandomSource {
    /// Generate next random u32
    fn next_u32(&mut self) -> u32;

    /// Generate a value in the inclusive range `[lo, hi]`.
    ///
    /// Returns `lo` when the range is empty or degenerate.
    fn next_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = hi - lo;
        if span == u32::MAX {
            return self.next_u32();
        }
        lo + self.next_u32() % (span + 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would stay on the c-only orbit; nudge it.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current internal state (reseeding with it resumes the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Low bits of a power-of-two LCG have short periods; fold the high half in.
        self.state ^ (self.state >> 16)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.state(), 1);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_next_inclusive_stays_in_range() {
        let mut rng = SimpleRng::new(7);
        let mut seen = [false; 9];
        for _ in 0..2000 {
            let v = rng.next_inclusive(1, 9);
            assert!((1..=9).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        // Every value in a small range shows up over enough draws.
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_next_inclusive_degenerate_range() {
        let mut rng = SimpleRng::new(7);
        assert_eq!(rng.next_inclusive(5, 5), 5);
        assert_eq!(rng.next_inclusive(9, 3), 9);
    }

    #[test]
    fn test_borrowed_source_advances_owner() {
        fn draw<R: RandomSource>(mut source: R) -> u32 {
            source.next_u32()
        }

        let mut rng = SimpleRng::new(99);
        let mut reference = SimpleRng::new(99);
        assert_eq!(draw(&mut rng), reference.next_u32());
        assert_eq!(rng.state(), reference.state());
    }
}
