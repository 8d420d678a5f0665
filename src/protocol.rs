//! WS2812B bitstream encoding for a serial peripheral clocked at three
//! times the LED bit rate.
//!
//! Every LED bit becomes a three-bit symbol (`100` for zero, `110` for
//! one), so one 8-bit sample occupies three bytes on the wire. The
//! peripheral swaps bytes inside each 16-bit word, which is compensated by
//! XOR-ing every destination index with 1.

use alloc::vec::Vec;

use crate::color::{PixelColor, PixelFormat};

const SYMBOL_ZERO: u32 = 0b100;
const SYMBOL_ONE: u32 = 0b110;

/// Encoded bytes per 8-bit color sample
pub const BYTES_PER_SAMPLE: usize = 3;

/// Default serial clock: 385 ns per symbol bit
pub const DEFAULT_BIT_RATE: u32 = 2_600_000;

/// Minimum low time that latches a frame
pub const RESET_TIME_US: u64 = 50;

/// Symbol lookup: sample value to its three wire bytes, MSB first
pub static SAMPLE_LUT: [[u8; BYTES_PER_SAMPLE]; 256] = build_lut();

#[allow(clippy::cast_possible_truncation)]
const fn build_lut() -> [[u8; BYTES_PER_SAMPLE]; 256] {
    let mut lut = [[0u8; BYTES_PER_SAMPLE]; 256];
    let mut value = 0;
    while value < 256 {
        let mut bits: u32 = 0;
        let mut bit = 0;
        while bit < 8 {
            let symbol = if value & (0x80 >> bit) != 0 {
                SYMBOL_ONE
            } else {
                SYMBOL_ZERO
            };
            bits = (bits << 3) | symbol;
            bit += 1;
        }
        lut[value] = [(bits >> 16) as u8, (bits >> 8) as u8, bits as u8];
        value += 1;
    }
    lut
}

/// Number of zero bytes needed to hold the line low for the reset time.
#[allow(clippy::cast_possible_truncation)]
pub const fn reset_bytes(bit_rate: u32) -> usize {
    let bits = RESET_TIME_US * bit_rate as u64 / 1_000_000 + 1;
    bits.div_ceil(8) as usize
}

/// Encoded size of one pixel
pub const fn bytes_per_pixel(format: PixelFormat) -> usize {
    format.channels() * BYTES_PER_SAMPLE
}

/// Total transmission buffer size for a strip
pub const fn frame_len(pixel_count: usize, format: PixelFormat, bit_rate: u32) -> usize {
    pixel_count * bytes_per_pixel(format) + reset_bytes(bit_rate)
}

/// Encode `pixels` into `out`, replacing its contents.
///
/// Samples go out in `G, R, B, [W]` order. A pixel whose mask entry is
/// `false` encodes as black. The trailing reset run is rewritten to zero on
/// every call.
pub fn encode_frame(
    pixels: &[PixelColor],
    mask: Option<&[bool]>,
    format: PixelFormat,
    reset: usize,
    out: &mut Vec<u8>,
) {
    let stride = bytes_per_pixel(format);
    let body = pixels.len() * stride;
    out.clear();
    // the swapped index of an odd-length body spills one byte past it
    out.resize((body + reset).max(body.next_multiple_of(2)), 0);

    for (i, pixel) in pixels.iter().enumerate() {
        let visible = mask.is_none_or(|m| m.get(i).copied().unwrap_or(false));
        let pixel = if visible { *pixel } else { PixelColor::BLACK };
        let samples = [pixel.g, pixel.r, pixel.b, pixel.w];
        let base = i * stride;

        for (c, sample) in samples.iter().take(format.channels()).enumerate() {
            let pattern = &SAMPLE_LUT[*sample as usize];
            for (j, byte) in pattern.iter().enumerate() {
                out[(base + c * BYTES_PER_SAMPLE + j) ^ 1] = *byte;
            }
        }
    }
}
