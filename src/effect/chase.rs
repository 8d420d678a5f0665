//! Position based effects: trails, chases and wipes

use super::{Effect, RenderContext};
use crate::color::PixelColor;

const TRAIL_LENGTH: usize = 5;

/// A short fading trail rotating around the strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CyclicEffect {
    offset: usize,
}

impl Effect for CyclicEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        let len = leds.len();
        if len == 0 {
            return;
        }
        if ctx.step(Self::DIVISOR) {
            self.offset = (self.offset + 1) % len;
        }

        leds.fill(PixelColor::BLACK);
        let trail = TRAIL_LENGTH.min(len);
        for i in 0..trail {
            let fade = (255 - i * 255 / trail) as u8;
            leds[(self.offset + i) % len] = ctx.color.scale(fade);
        }
    }
}

/// Every third pixel lit, marching one position per interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TheaterChaseEffect {
    offset: usize,
}

impl Effect for TheaterChaseEffect {
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.offset = (self.offset + 1) % 3;
        }
        for (i, led) in leds.iter_mut().enumerate() {
            *led = if (i + self.offset) % 3 == 0 {
                ctx.color
            } else {
                PixelColor::BLACK
            };
        }
    }
}

/// Fills the strip one pixel per interval, then wipes it back to black
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorWipeEffect {
    pixel: usize,
    clearing: bool,
}

impl Effect for ColorWipeEffect {
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            if self.pixel < leds.len() {
                self.pixel += 1;
            } else {
                self.clearing = !self.clearing;
                self.pixel = 0;
            }
        }

        let (fill, rest) = if self.clearing {
            (PixelColor::BLACK, ctx.color)
        } else {
            (ctx.color, PixelColor::BLACK)
        };
        for (i, led) in leds.iter_mut().enumerate() {
            *led = if i < self.pixel { fill } else { rest };
        }
    }
}
