//! Energy-dispersal scrambling (C1)
//!
//! Both scramble and descramble are the same XOR-with-keystream operation,
//! so `Scrambler::apply` is its own inverse - there is deliberately no
//! separate `descramble` entry point.

/// A reusable keystream of scrambler bytes, XORed byte-for-byte onto (or
/// off of) the payload. Self-inverse.
pub trait Scrambler {
    /// XOR `data` in place against `len` bytes of fresh keystream.
    fn apply(&mut self, data: &mut [u8]);
}

/// Legacy scrambler: `random.seed(seed); random.randint(0, 255)` per byte,
/// using CPython's Mersenne Twister so this interoperates byte-for-byte
/// with `original_source/ofdm_codec.py`.
pub struct LegacyScrambler {
    mt: Mt19937,
}

impl LegacyScrambler {
    pub fn new(seed: u64) -> Self {
        Self {
            mt: Mt19937::from_python_seed(seed),
        }
    }
}

impl Scrambler for LegacyScrambler {
    fn apply(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.mt.randbelow_256();
        }
    }
}

/// Modern scrambler: a counter-based SplitMix64 keystream, reseeded from
/// `seed` and reset per symbol so decode is order-independent (spec §4.1).
pub struct ModernScrambler {
    state: u64,
}

impl ModernScrambler {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl Scrambler for ModernScrambler {
    fn apply(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.next_u64() as u8;
        }
    }
}

/// Reconstruct a scrambler for the given profile and seed.
pub fn for_profile(profile: crate::config::Profile, seed: u64) -> Box<dyn Scrambler> {
    match profile {
        crate::config::Profile::Legacy => Box::new(LegacyScrambler::new(seed)),
        crate::config::Profile::Modern => Box::new(ModernScrambler::new(seed)),
    }
}

/// A from-scratch reimplementation of CPython's Mersenne Twister
/// (`_randommodule.c`), just the slice this codec needs: `seed(int)` and
/// `randint(0, 255)` by way of `getrandbits`.
struct Mt19937 {
    state: [u32; Self::N],
    index: usize,
}

impl Mt19937 {
    const N: usize = 624;
    const M: usize = 397;
    const MATRIX_A: u32 = 0x9908_b0df;
    const UPPER_MASK: u32 = 0x8000_0000;
    const LOWER_MASK: u32 = 0x7fff_ffff;

    /// CPython seeds from an arbitrary-precision integer by splitting it
    /// into 32-bit little-endian words and running `init_by_array`. A `u64`
    /// seed (as used by this codec) never needs more than two words.
    fn from_python_seed(seed: u64) -> Self {
        let key = if seed == 0 {
            vec![0u32]
        } else if seed <= u32::MAX as u64 {
            vec![seed as u32]
        } else {
            vec![seed as u32, (seed >> 32) as u32]
        };
        let mut mt = Self {
            state: [0; Self::N],
            index: Self::N,
        };
        mt.init_by_array(&key);
        mt
    }

    fn init_genrand(&mut self, s: u32) {
        self.state[0] = s;
        for i in 1..Self::N {
            let prev = self.state[i - 1];
            self.state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.index = Self::N;
    }

    fn init_by_array(&mut self, key: &[u32]) {
        self.init_genrand(19_650_218);
        let mut i = 1usize;
        let mut j = 0usize;
        let mut k = Self::N.max(key.len());
        while k > 0 {
            let prev = self.state[i - 1];
            self.state[i] = (self.state[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= Self::N {
                self.state[0] = self.state[Self::N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
            k -= 1;
        }
        k = Self::N - 1;
        while k > 0 {
            let prev = self.state[i - 1];
            self.state[i] = (self.state[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_566_083_941))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= Self::N {
                self.state[0] = self.state[Self::N - 1];
                i = 1;
            }
            k -= 1;
        }
        self.state[0] = 0x8000_0000;
    }

    fn twist(&mut self) {
        for i in 0..Self::N {
            let y = (self.state[i] & Self::UPPER_MASK) | (self.state[(i + 1) % Self::N] & Self::LOWER_MASK);
            let mut next = self.state[(i + Self::M) % Self::N] ^ (y >> 1);
            if y & 1 != 0 {
                next ^= Self::MATRIX_A;
            }
            self.state[i] = next;
        }
        self.index = 0;
    }

    fn genrand_uint32(&mut self) -> u32 {
        if self.index >= Self::N {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    /// `getrandbits(k)` for `k <= 32`, matching `_randommodule.c`.
    fn getrandbits(&mut self, k: u32) -> u32 {
        self.genrand_uint32() >> (32 - k)
    }

    /// `random.randint(0, 255)` is `randrange(0, 256)`, which CPython
    /// implements as `_randbelow(256)`: draw `getrandbits(256.bit_length())`
    /// = `getrandbits(9)` and reject draws `>= 256`, redrawing until one
    /// fits. 256 being a power of two does NOT exempt it from rejection -
    /// `bit_length()` of 256 is 9, not 8, so draws 256..511 (half the time)
    /// get thrown away.
    fn randbelow_256(&mut self) -> u8 {
        loop {
            let r = self.getrandbits(9);
            if r < 256 {
                return r as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `python3 -c "import random; random.seed(1); print([random.randint(0,255) for _ in range(8)])"`
    /// -> `[68, 32, 130, 60, 253, 230, 241, 194]`
    #[test]
    fn legacy_scrambler_matches_cpython_seed_1() {
        let mut scrambler = LegacyScrambler::new(1);
        let mut data = [0u8; 8];
        scrambler.apply(&mut data);
        assert_eq!(data, [68, 32, 130, 60, 253, 230, 241, 194]);
    }

    #[test]
    fn legacy_scrambler_is_self_inverse() {
        let original = b"hello ofdm world".to_vec();
        let mut buf = original.clone();
        LegacyScrambler::new(42).apply(&mut buf);
        assert_ne!(buf, original);
        LegacyScrambler::new(42).apply(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn modern_scrambler_is_self_inverse() {
        let original = b"modern payload bytes".to_vec();
        let mut buf = original.clone();
        ModernScrambler::new(7).apply(&mut buf);
        assert_ne!(buf, original);
        ModernScrambler::new(7).apply(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn modern_scrambler_differs_by_seed() {
        let mut a = vec![0u8; 16];
        let mut b = vec![0u8; 16];
        ModernScrambler::new(1).apply(&mut a);
        ModernScrambler::new(2).apply(&mut b);
        assert_ne!(a, b);
    }
}
