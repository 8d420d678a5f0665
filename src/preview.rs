//! Hardware-free single strip simulation.
//!
//! Runs the same effect engine as the driver with a seedable generator and
//! exposes frames as RGBA bytes for a canvas or a test harness.

use alloc::{string::String, vec, vec::Vec};

use crate::{
    color::{PixelColor, PixelFormat},
    config::{EffectConfig, clamp_speed},
    effect::EffectState,
    engine::EffectEngine,
    random::XorShift32,
};

#[derive(Debug)]
pub struct PixelPreview {
    format: PixelFormat,
    engine: EffectEngine,
    random: XorShift32,
    config: EffectConfig,
    state: Option<EffectState>,
    tick: u32,
    buffer: Vec<PixelColor>,
}

impl PixelPreview {
    pub fn new(led_count: u16, format: PixelFormat, update_rate_hz: u32) -> Self {
        Self::with_engine(led_count, format, EffectEngine::new(update_rate_hz))
    }

    pub fn with_engine(led_count: u16, format: PixelFormat, engine: EffectEngine) -> Self {
        Self {
            format,
            engine,
            random: XorShift32::default(),
            config: EffectConfig::default(),
            state: None,
            tick: 0,
            buffer: vec![PixelColor::BLACK; usize::from(led_count)],
        }
    }

    pub fn led_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    pub fn effect(&self) -> &str {
        &self.config.effect
    }

    /// Select an effect. Switching to a different name (ignoring case)
    /// restarts its animation.
    pub fn set_effect(&mut self, effect: &str) {
        if !self.config.effect.eq_ignore_ascii_case(effect) {
            self.config.effect = String::from(effect);
            self.state = None;
        }
    }

    pub fn set_color(&mut self, color: PixelColor) {
        self.config.color = color;
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.config.brightness = brightness;
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.config.speed = clamp_speed(speed);
    }

    pub fn set_random_seed(&mut self, seed: u32) {
        self.random.reseed(seed);
    }

    /// Compute the next frame
    pub fn tick(&mut self) {
        self.engine.compute(
            &mut self.buffer,
            &self.config,
            &mut self.state,
            self.tick,
            &mut self.random,
        );
        self.tick = self.tick.wrapping_add(1);
    }

    /// Back to tick zero with a black strip and fresh state
    pub fn reset(&mut self) {
        self.tick = 0;
        self.state = None;
        self.buffer.fill(PixelColor::BLACK);
    }

    pub fn pixels(&self) -> &[PixelColor] {
        &self.buffer
    }

    /// Four bytes per LED; the last is W on RGBW strips and opaque alpha otherwise
    pub fn frame_rgba(&self) -> Vec<u8> {
        self.buffer
            .iter()
            .flat_map(|p| {
                let alpha = if self.format.has_white() { p.w } else { 255 };
                [p.r, p.g, p.b, alpha]
            })
            .collect()
    }

    pub fn effect_names(&self) -> Vec<String> {
        self.engine.effects().into_iter().map(|e| e.id).collect()
    }
}
