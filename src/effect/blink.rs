//! Whole-strip on/off style effects

use super::{Effect, RenderContext};
use crate::{color::PixelColor, gamma::gamma8};

const BREATHE_STEP: u8 = 5;

/// Alternates between the base color and black every interval.
///
/// Starts lit: the first render of a fresh state shows the base color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlinkEffect {
    lit: bool,
}

impl Effect for BlinkEffect {
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.lit = !self.lit;
        }
        leds.fill(if self.lit { ctx.color } else { PixelColor::BLACK });
    }
}

/// Triangle brightness ramp, gamma corrected before scaling the base color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreatheEffect {
    brightness: u8,
    increasing: bool,
}

impl BreatheEffect {
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    fn advance(&mut self) {
        if self.increasing {
            self.brightness = self.brightness.saturating_add(BREATHE_STEP);
            if self.brightness >= 250 {
                self.brightness = 255;
                self.increasing = false;
            }
        } else if self.brightness <= BREATHE_STEP {
            self.brightness = 0;
            self.increasing = true;
        } else {
            self.brightness -= BREATHE_STEP;
        }
    }
}

impl Effect for BreatheEffect {
    const DIVISOR: u32 = 4;

    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.advance();
        }
        leds.fill(ctx.color.scale(gamma8(self.brightness)));
    }
}
