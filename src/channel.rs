//! A single LED strip and its buffers.
//!
//! Each buffer has exactly one writer: the effect engine fills the logical
//! buffer, output scaling fills the scaled buffer, and encoding produces
//! the transmission bytes from the scaled buffer.

use alloc::{string::String, vec, vec::Vec};

use crate::{
    color::{PixelColor, PixelFormat},
    config::{ChannelConfig, EffectConfig, clamp_speed},
    effect::EffectState,
    engine::EffectEngine,
    filter::{apply_output_scaling, predicted_current_ma},
    protocol,
    random::RandomSource,
};

/// Identifier handed out by the driver, increasing and never reused
pub type ChannelId = u32;

#[derive(Debug)]
pub struct PixelChannel {
    id: ChannelId,
    config: ChannelConfig,
    effect: EffectConfig,
    state: Option<EffectState>,
    logical: Vec<PixelColor>,
    scaled: Vec<PixelColor>,
    reset_bytes: usize,
}

impl PixelChannel {
    pub fn new(id: ChannelId, config: ChannelConfig) -> Self {
        let len = usize::from(config.pixel_count);
        Self {
            id,
            reset_bytes: protocol::reset_bytes(config.bit_rate),
            config,
            effect: EffectConfig::default(),
            state: None,
            logical: vec![PixelColor::BLACK; len],
            scaled: vec![PixelColor::BLACK; len],
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn format(&self) -> PixelFormat {
        self.config.format
    }

    pub fn pixel_count(&self) -> usize {
        self.logical.len()
    }

    pub fn effect(&self) -> &EffectConfig {
        &self.effect
    }

    /// Animation state of the active effect, if it rendered at least once
    pub fn state(&self) -> Option<&EffectState> {
        self.state.as_ref()
    }

    /// Replace the effect configuration wholesale.
    ///
    /// Speed is clamped and a mask of the wrong length is dropped.
    pub fn set_effect(&mut self, effect: EffectConfig) {
        self.effect = effect.normalized(self.pixel_count());
    }

    pub fn set_effect_id(&mut self, effect: &str) {
        self.effect.effect = String::from(effect);
    }

    pub fn set_color(&mut self, color: PixelColor) {
        self.effect.color = color;
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.effect.brightness = brightness;
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.effect.speed = clamp_speed(speed);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.effect.enabled = enabled;
    }

    /// Install a per pixel mask. Returns `false` and keeps the current mask
    /// when the length does not match the strip.
    pub fn set_mask(&mut self, mask: Vec<bool>) -> bool {
        if mask.len() != self.pixel_count() {
            return false;
        }
        self.effect.mask = Some(mask);
        true
    }

    pub fn clear_mask(&mut self) {
        self.effect.mask = None;
    }

    /// Logical colors as last computed
    pub fn pixels(&self) -> &[PixelColor] {
        &self.logical
    }

    /// Direct access for `RAW` mode, where the caller owns the frame
    pub fn pixels_mut(&mut self) -> &mut [PixelColor] {
        &mut self.logical
    }

    /// Colors after brightness and current limiting
    pub fn scaled_pixels(&self) -> &[PixelColor] {
        &self.scaled
    }

    /// Run the effect engine, or go dark when disabled.
    pub fn render(&mut self, engine: &EffectEngine, tick: u32, random: &mut dyn RandomSource) {
        if self.effect.enabled {
            engine.compute(&mut self.logical, &self.effect, &mut self.state, tick, random);
        } else {
            self.logical.fill(PixelColor::BLACK);
        }
    }

    /// Predicted draw of the logical buffer, mask ignored
    pub fn predicted_current_ma(&self, per_component_ma: u32) -> u32 {
        predicted_current_ma(&self.logical, self.config.format, per_component_ma)
    }

    /// Refresh the scaled buffer from the logical one.
    pub fn apply_scaling(&mut self, factor: f32) {
        apply_output_scaling(&self.logical, &mut self.scaled, self.effect.brightness, factor);
    }

    /// Size of the encoded frame including the reset run
    pub fn frame_len(&self) -> usize {
        protocol::frame_len(self.pixel_count(), self.config.format, self.config.bit_rate)
    }

    /// Encode the scaled buffer into wire bytes, masking as configured.
    pub fn encode(&self, out: &mut Vec<u8>) {
        protocol::encode_frame(
            &self.scaled,
            self.effect.mask.as_deref(),
            self.config.format,
            self.reset_bytes,
            out,
        );
    }
}
