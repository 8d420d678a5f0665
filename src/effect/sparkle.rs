//! Random glitter effects

use super::{Effect, RenderContext};
use crate::color::PixelColor;

/// One in `SPARKLE_ODDS` pixels lights up on each step
const SPARKLE_ODDS: u32 = 20;
const TWINKLE_ODDS: u32 = 50;
const TWINKLE_DECAY: u8 = 245;

/// Fresh random pixels every step, the rest black
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SparkleEffect;

impl Effect for SparkleEffect {
    const DIVISOR: u32 = 2;

    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if !ctx.step(Self::DIVISOR) {
            return;
        }
        for led in leds.iter_mut() {
            *led = if ctx.random.next_u32() % SPARKLE_ODDS == 0 {
                ctx.color
            } else {
                PixelColor::BLACK
            };
        }
    }
}

/// Random pixels light up and slowly fade out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwinkleEffect;

impl Effect for TwinkleEffect {
    const DIVISOR: u32 = 4;

    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if !ctx.step(Self::DIVISOR) {
            return;
        }
        for led in leds.iter_mut() {
            *led = led.scale(TWINKLE_DECAY);
        }
        for led in leds.iter_mut() {
            if ctx.random.next_u32() % TWINKLE_ODDS == 0 {
                *led = ctx.color;
            }
        }
    }
}
