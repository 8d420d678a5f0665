use super::{Effect, RenderContext};
use crate::color::PixelColor;

/// Every pixel shows the base color, unscaled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolidEffect;

impl Effect for SolidEffect {
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        leds.fill(ctx.color);
    }
}
