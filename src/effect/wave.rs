//! Sine table driven effects

use super::{Effect, RenderContext};
use crate::{
    color::PixelColor,
    math8::{sin8, spread, wrap8},
};

/// Brightness wave travelling along the strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveEffect {
    position: u8,
}

impl Effect for WaveEffect {
    const DIVISOR: u32 = 4;

    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.position = self.position.wrapping_add(1);
        }
        let len = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            let theta = wrap8(spread(i, len) + usize::from(self.position));
            *led = ctx.color.scale(sin8(theta));
        }
    }
}

/// Base color drifting towards its complement and back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradientEffect {
    phase: u32,
}

impl Effect for GradientEffect {
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.phase = self.phase.wrapping_add(1);
        }
        let complement = ctx.color.complement();
        let len = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            let theta = wrap8(spread(i, len).wrapping_add(self.phase as usize));
            *led = ctx.color.blend(complement, sin8(theta));
        }
    }
}

/// Pulse growing outwards from the middle of the strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseEffect {
    phase: u32,
}

impl Effect for PulseEffect {
    const DIVISOR: u32 = 8;

    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.phase = self.phase.wrapping_add(1);
        }
        let len = leds.len();
        let center = len / 2;
        let width = usize::from(wrap8(self.phase as usize % (len / 2 + 10)));

        leds.fill(PixelColor::BLACK);
        for (i, led) in leds.iter_mut().enumerate() {
            let dist = i.abs_diff(center);
            if dist <= width {
                let brightness = (255 - dist * 255 / (width + 1)) as u8;
                *led = ctx.color.scale(brightness);
            }
        }
    }
}

/// Short sine ripples marching along the strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningLightsEffect {
    phase: u32,
}

impl Effect for RunningLightsEffect {
    const DIVISOR: u32 = 4;

    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.phase = self.phase.wrapping_add(1);
        }
        for (i, led) in leds.iter_mut().enumerate() {
            let theta = wrap8(i.wrapping_mul(32).wrapping_add((self.phase as usize).wrapping_mul(4)));
            *led = ctx.color.scale(sin8(theta));
        }
    }
}
