use crate::color::{Hsv, Rgb};

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// `value * scale / 255`, truncating
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn scale_channel(value: u8, scale: u8) -> u8 {
    ((value as u16 * scale as u16) / 255) as u8
}

/// Weighted average of two components, `amount_of_b` out of 255
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn blend_channel(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let inv = 255 - amount_of_b as u16;
    ((a as u16 * inv + b as u16 * amount_of_b as u16) / 255) as u8
}

/// HSV to RGB on an 8-bit hue circle split into six 43-step regions.
///
/// Zero saturation yields a grey of the requested value.
#[allow(clippy::cast_possible_truncation)]
pub const fn hsv2rgb(hsv: Hsv) -> Rgb {
    let Hsv { hue, sat, val } = hsv;
    if sat == 0 {
        return Rgb {
            r: val,
            g: val,
            b: val,
        };
    }

    let region = hue / 43;
    let remainder = (hue - region * 43) as u16 * 6;
    let v = val as u16;
    let s = sat as u16;

    let p = ((v * (255 - s)) >> 8) as u8;
    let q = ((v * (255 - ((s * remainder) >> 8))) >> 8) as u8;
    let t = ((v * (255 - ((s * (255 - remainder)) >> 8))) >> 8) as u8;

    let (r, g, b) = match region {
        0 => (val, t, p),
        1 => (q, val, p),
        2 => (p, val, t),
        3 => (p, q, val),
        4 => (t, p, val),
        _ => (val, p, q),
    };
    Rgb { r, g, b }
}
