//! 8-bit fixed point helpers shared by the effects.

/// Triangle approximation of a sine wave, centred on 128.
///
/// Built with signed intermediates and truncated to `u8`, so the two peaks
/// (indices 64 and 192) wrap to zero.
pub const SIN8: [u8; 256] = build_sin8();

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn build_sin8() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let angle = i as i32;
        let result = if angle < 128 {
            if angle < 64 { angle * 4 } else { (128 - angle) * 4 }
        } else {
            let angle = angle - 128;
            if angle < 64 {
                -(angle * 4)
            } else {
                -((128 - angle) * 4)
            }
        };
        table[i] = ((result + 256) / 2) as u8;
        i += 1;
    }
    table
}

/// Sine lookup with an implicitly wrapping index
#[inline]
pub const fn sin8(theta: u8) -> u8 {
    SIN8[theta as usize]
}

/// Position of pixel `index` on a 0..256 circle spread over `len` pixels.
///
/// Returns the untruncated value; callers add their phase and wrap.
#[inline]
pub const fn spread(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index * 256 / len }
}

/// Wrap a `usize` into the low byte
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn wrap8(value: usize) -> u8 {
    (value & 0xFF) as u8
}
