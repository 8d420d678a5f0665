//! Moving heads with fading tails

use super::{Effect, RenderContext};
use crate::color::PixelColor;

const COMET_FADE: u8 = 200;
const METEOR_DECAY: u8 = 192;
/// Chance out of 256 that a meteor trail pixel decays on a step
const METEOR_DECAY_CHANCE: u8 = 64;

/// Draw `length` pixels behind `head` with linearly descending brightness.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_tail(leds: &mut [PixelColor], color: PixelColor, head: i32, length: i32) {
    let len = leds.len() as i32;
    for i in 0..length {
        let pos = head - i;
        if (0..len).contains(&pos) {
            let brightness = (255 - i * 255 / length) as u8;
            leds[pos as usize] = color.scale(brightness);
        }
    }
}

/// Comet entering from before the first pixel and leaving past the last.
///
/// The whole buffer fades on each step, so previous positions leave a
/// motion blur behind the drawn tail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CometEffect {
    head: i32,
}

impl Effect for CometEffect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        let len = leds.len() as i32;
        let tail = (len / 4).max(3);

        if ctx.step(Self::DIVISOR) {
            self.head += 1;
            if self.head >= len + tail {
                self.head = -tail;
            }
            for led in leds.iter_mut() {
                *led = led.scale(COMET_FADE);
            }
        }
        draw_tail(leds, ctx.color, self.head, tail);
    }
}

/// Meteor whose trail decays randomly, leaving sparkling debris
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeteorEffect {
    head: i32,
}

impl Effect for MeteorEffect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if !ctx.step(Self::DIVISOR) {
            return;
        }
        let len = leds.len() as i32;
        let size = (len / 8).max(3);

        for led in leds.iter_mut() {
            if ctx.random.next_u8() < METEOR_DECAY_CHANCE {
                *led = led.scale(METEOR_DECAY);
            }
        }

        self.head += 1;
        if self.head >= len * 2 {
            self.head = 0;
        }
        draw_tail(leds, ctx.color, self.head, size);
    }
}
