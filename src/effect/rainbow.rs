use super::{Effect, RenderContext};
use crate::{
    color::PixelColor,
    math8::{spread, wrap8},
};

/// Full hue circle spread across the strip, rotating one step per interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RainbowEffect {
    offset: u8,
}

impl Effect for RainbowEffect {
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.offset = self.offset.wrapping_add(1);
        }
        let len = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            let hue = wrap8(spread(i, len) + usize::from(self.offset));
            *led = PixelColor::from_hsv(hue, 255, ctx.brightness);
        }
    }
}
