//! Pluggable randomness for the stochastic effects.

/// Source of pseudo random numbers consumed by sparkle, twinkle, fire and meteor.
///
/// Hardware targets wire their true RNG here; tests and the preview use
/// [`XorShift32`] with a fixed seed for reproducible frames.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Low byte of the next word
    #[allow(clippy::cast_possible_truncation)]
    fn next_u8(&mut self) -> u8 {
        (self.next_u32() & 0xFF) as u8
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

pub const DEFAULT_SEED: u32 = 12345;

/// Marsaglia xorshift generator (13, 17, 5).
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// A zero seed would lock the generator at zero, so it is replaced by one.
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
