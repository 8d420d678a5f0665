//! Heat diffusion fire simulation

use super::{Effect, RenderContext};
use crate::color::PixelColor;

/// Number of simulated heat cells; pixels beyond stay dark
pub const FIRE_CELLS: usize = 64;

const COOLING: usize = 550;
/// Chance out of 256 that a new spark ignites on a step
const SPARKING: u8 = 120;
const SPARK_ZONE: usize = 7;

/// Cells cool by a random amount, heat rises by averaging with the two
/// cells below, and sparks ignite near the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireEffect {
    heat: [u8; FIRE_CELLS],
}

impl Default for FireEffect {
    fn default() -> Self {
        Self {
            heat: [0; FIRE_CELLS],
        }
    }
}

impl FireEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn simulate(&mut self, len: usize, ctx: &mut RenderContext<'_>) {
        let cooling_range = (COOLING / len.max(1) + 2) as u32;
        for cell in &mut self.heat {
            let cooldown = (u32::from(ctx.random.next_u8()) % cooling_range) as u8;
            *cell = cell.saturating_sub(cooldown);
        }

        for i in (2..FIRE_CELLS).rev() {
            let below = u16::from(self.heat[i - 1]);
            let further = u16::from(self.heat[i - 2]);
            self.heat[i] = ((below + 2 * further) / 3) as u8;
        }

        if ctx.random.next_u8() < SPARKING {
            let pos = usize::from(ctx.random.next_u8()) % SPARK_ZONE.min(FIRE_CELLS);
            let boost = 160 + u16::from(ctx.random.next_u8()) % 96;
            self.heat[pos] = (u16::from(self.heat[pos]) + boost).min(255) as u8;
        }
    }
}

/// Black to red, red to yellow, yellow to white
fn heat_color(heat: u8) -> PixelColor {
    match heat {
        0..85 => PixelColor::rgb(heat * 3, 0, 0),
        85..170 => PixelColor::rgb(255, (heat - 85) * 3, 0),
        _ => PixelColor::rgb(255, 255, (heat - 170) * 3),
    }
}

impl Effect for FireEffect {
    const DIVISOR: u32 = 2;

    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        if ctx.step(Self::DIVISOR) {
            self.simulate(leds.len(), ctx);
        }
        for (i, led) in leds.iter_mut().enumerate() {
            let heat = self.heat.get(i).copied().unwrap_or(0);
            *led = heat_color(heat).scale(ctx.brightness);
        }
    }
}
