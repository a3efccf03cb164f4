//! Deterministic pseudo-random stream used to initialize weights.
//!
//! The stream is a linear congruential recurrence over `u128` followed by a
//! non-standard output transform: of each normalized state `x` only the
//! digits past the third decimal place are kept, `1000x - floor(1000x)`.
//! Seeding the same way always reproduces the same values bit for bit.

use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use rand::{RngCore, SeedableRng};

use crate::prelude::*;

/// Seed of the stream the network helpers fall back to.
pub const DEFAULT_SEED: u64 = 73;

/// Constants of the recurrence `state = (state * multiplier + increment) % modulus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcgParams {
    modulus: u128,
    multiplier: u128,
    increment: u128,
    warmup: usize,
}

impl LcgParams {
    /// Rejects moduli that are trivial or too wide for the `u128` modular arithmetic.
    pub fn new(modulus: u128, multiplier: u128, increment: u128, warmup: usize) -> Result<Self> {
        if modulus < 2 || modulus >= 1 << 127 {
            return Err(Error::InvalidModulus { modulus });
        }
        Ok(Self {
            modulus,
            multiplier,
            increment,
            warmup,
        })
    }

    pub fn modulus(&self) -> u128 {
        self.modulus
    }

    pub fn multiplier(&self) -> u128 {
        self.multiplier
    }

    pub fn increment(&self) -> u128 {
        self.increment
    }

    /// Number of steps taken before the first value is emitted.
    pub fn warmup(&self) -> usize {
        self.warmup
    }
}

impl Default for LcgParams {
    /// Modulus 2^107 - 1, multiplier 2^61 - 1, 20 warm-up steps.
    fn default() -> Self {
        Self {
            modulus: (1 << 107) - 1,
            multiplier: (1 << 61) - 1,
            increment: 15_485_863,
            warmup: 20,
        }
    }
}

/// An infinite stream of values in `[0, 1)`.
///
/// Every draw advances the state permanently. Cloning forks the stream: the
/// clone and the original then yield the same values independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    state: u128,
    params: LcgParams,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, LcgParams::default())
    }

    pub fn with_params(seed: u64, params: LcgParams) -> Self {
        let mut gen = Self {
            state: seed as u128 % params.modulus,
            params,
        };
        for _ in 0..params.warmup {
            gen.step();
        }
        debug!("seeded generator with {seed} after {} warm-up steps", params.warmup);
        gen
    }

    pub fn params(&self) -> &LcgParams {
        &self.params
    }

    fn step(&mut self) {
        let LcgParams {
            modulus,
            multiplier,
            increment,
            ..
        } = self.params;
        self.state = add_mod(
            mul_mod(self.state, multiplier, modulus),
            increment % modulus,
            modulus,
        );
    }

    /// Advances the state once and returns the next value in `[0, 1)`.
    pub fn next_value(&mut self) -> f64 {
        self.step();
        let x = ratio(self.state, self.params.modulus + 1);
        let scaled = 1000.0 * x;
        scaled - scaled.trunc()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Iterator for Generator {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// The `n`-th value (0-based) of a freshly seeded default stream.
pub fn nth_value(seed: u64, n: usize) -> f64 {
    let mut gen = Generator::new(seed);
    for _ in 0..n {
        gen.step();
    }
    gen.next_value()
}

/// `n / d` for `n < d <= 2^127`, rounded once to the nearest `f64` (ties to even).
///
/// Converting both operands to `f64` first would round three times.
fn ratio(n: u128, d: u128) -> f64 {
    if n == 0 {
        return 0.0;
    }

    // binary long division; `r < d <= 2^127` keeps `r << 1` in range
    let mut r = n;
    let mut shift = 0;
    loop {
        shift += 1;
        r <<= 1;
        if r >= d {
            r -= d;
            break;
        }
    }
    // leading bit, 52 more mantissa bits and one rounding bit
    let mut q: u64 = 1;
    for _ in 0..53 {
        r <<= 1;
        q <<= 1;
        if r >= d {
            r -= d;
            q |= 1;
        }
    }

    let mut mantissa = q >> 1;
    let round = q & 1 == 1;
    if round && (r != 0 || mantissa & 1 == 1) {
        mantissa += 1;
    }
    // n / d is about mantissa * 2^-(shift + 52), and shift <= 127 stays in the normal range
    let scale = f64::from_bits(((1023 - (shift + 52)) as u64) << 52);
    mantissa as f64 * scale
}

// Both operands are below `m < 2^127`, so the sum cannot overflow.
fn add_mod(a: u128, b: u128, m: u128) -> u128 {
    let sum = a + b;
    if sum >= m {
        sum - m
    } else {
        sum
    }
}

fn mul_mod(a: u128, b: u128, m: u128) -> u128 {
    let (mut a, mut b) = (a % m, b % m);
    let mut acc = 0;
    while b > 0 {
        if b & 1 == 1 {
            acc = add_mod(acc, a, m);
        }
        a = add_mod(a, a, m);
        b >>= 1;
    }
    acc
}

/// Lets the stream drive `rand` distributions.
///
/// A `u64` carries the top 53 bits of the fraction, so `gen::<f64>()` stays in `[0, 1)`.
impl RngCore for Generator {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        ((self.next_value() * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Generator {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    /// Uses the seed as-is so `seed_from_u64(s)` matches `Generator::new(s)`.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// A handle to one stream shared between owners, possibly across threads.
///
/// Draws are serialized by a mutex, so the values handed out form one
/// gap-free sequence no matter how callers interleave.
#[derive(Debug, Clone, Default)]
pub struct SharedGenerator {
    inner: Arc<Mutex<Generator>>,
}

impl SharedGenerator {
    pub fn new(seed: u64) -> Self {
        Self::from(Generator::new(seed))
    }

    /// Runs `f` with exclusive access to the stream.
    ///
    /// Everything `f` draws is contiguous in the sequence, e.g. all values of one matrix.
    pub fn with<T>(&self, f: impl FnOnce(&mut Generator) -> T) -> T {
        let mut gen = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut gen)
    }

    pub fn next_value(&self) -> f64 {
        self.with(Generator::next_value)
    }
}

impl From<Generator> for SharedGenerator {
    fn from(gen: Generator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(gen)),
        }
    }
}
