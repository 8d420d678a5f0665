mod utils;

use serde::{Deserialize, Serialize};
use smart_leds::{RGB8, RGBW, White, hsv::Hsv as HSV};
pub use utils::{blend_channel, hsv2rgb, rgb_from_u32, scale_channel};

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Wire layout of a strip: how many 8-bit components each pixel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum PixelFormat {
    #[default]
    Rgb = 3,
    Rgbw = 4,
}

impl PixelFormat {
    /// Number of color components per pixel
    pub const fn channels(self) -> usize {
        self as usize
    }

    pub const fn has_white(self) -> bool {
        matches!(self, Self::Rgbw)
    }
}

/// Four-component pixel value. `w` stays zero on RGB-only strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct PixelColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl PixelColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, w: 0 }
    }

    /// Build a color from a packed `0xRRGGBB` value
    pub const fn from_u32(color: u32) -> Self {
        let rgb = rgb_from_u32(color);
        Self::rgb(rgb.r, rgb.g, rgb.b)
    }

    /// Convert an 8-bit HSV triple using the integer six-region formula.
    pub const fn from_hsv(hue: u8, sat: u8, val: u8) -> Self {
        let rgb = hsv2rgb(Hsv { hue, sat, val });
        Self::rgb(rgb.r, rgb.g, rgb.b)
    }

    /// Scale every component by `brightness / 255`.
    ///
    /// Full brightness returns the color unchanged; everything else
    /// truncates towards zero.
    #[must_use]
    pub const fn scale(self, brightness: u8) -> Self {
        if brightness == 255 {
            return self;
        }
        Self {
            r: scale_channel(self.r, brightness),
            g: scale_channel(self.g, brightness),
            b: scale_channel(self.b, brightness),
            w: scale_channel(self.w, brightness),
        }
    }

    /// Linear blend towards `other`. `amount` 0 keeps `self`, 255 yields `other`.
    #[must_use]
    pub const fn blend(self, other: Self, amount: u8) -> Self {
        Self {
            r: blend_channel(self.r, other.r, amount),
            g: blend_channel(self.g, other.g, amount),
            b: blend_channel(self.b, other.b, amount),
            w: blend_channel(self.w, other.w, amount),
        }
    }

    /// RGB complement with the white component dropped
    #[must_use]
    pub const fn complement(self) -> Self {
        Self::rgb(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Multiply every component by a float factor, truncating.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scale_f32(self, factor: f32) -> Self {
        let apply = |v: u8| (f32::from(v) * factor) as u8;
        Self {
            r: apply(self.r),
            g: apply(self.g),
            b: apply(self.b),
            w: apply(self.w),
        }
    }

    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0 && self.w == 0
    }

    /// Component value by index in `R, G, B, W` order
    pub const fn component(self, index: usize) -> u8 {
        match index {
            0 => self.r,
            1 => self.g,
            2 => self.b,
            _ => self.w,
        }
    }
}

impl From<Rgb> for PixelColor {
    fn from(value: Rgb) -> Self {
        Self::rgb(value.r, value.g, value.b)
    }
}

impl From<PixelColor> for Rgb {
    fn from(value: PixelColor) -> Self {
        Rgb {
            r: value.r,
            g: value.g,
            b: value.b,
        }
    }
}

impl From<RGBW<u8>> for PixelColor {
    fn from(value: RGBW<u8>) -> Self {
        Self::new(value.r, value.g, value.b, value.a.0)
    }
}

impl From<PixelColor> for RGBW<u8> {
    fn from(value: PixelColor) -> Self {
        RGBW {
            r: value.r,
            g: value.g,
            b: value.b,
            a: White(value.w),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_full_brightness_is_identity() {
        let color = PixelColor::new(1, 2, 3, 4);
        assert_eq!(color.scale(255), color);
    }

    #[test]
    fn scale_truncates() {
        let color = PixelColor::new(255, 100, 3, 200);
        assert_eq!(color.scale(128), PixelColor::new(128, 50, 1, 100));
        assert_eq!(color.scale(0), PixelColor::BLACK);
    }

    #[test]
    fn complement_drops_white() {
        let color = PixelColor::new(10, 20, 30, 40);
        assert_eq!(color.complement(), PixelColor::rgb(245, 235, 225));
    }

    #[test]
    fn format_channels() {
        assert_eq!(PixelFormat::Rgb.channels(), 3);
        assert_eq!(PixelFormat::Rgbw.channels(), 4);
    }
}
