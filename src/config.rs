//! Driver, channel and effect configuration
//!
//! Everything here can arrive from a remote configuration surface, so
//! out-of-range values are normalized instead of rejected.

use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    color::{PixelColor, PixelFormat},
    effect::EffectId,
    protocol::DEFAULT_BIT_RATE,
};

pub const DEFAULT_UPDATE_RATE_HZ: u32 = 60;
/// Current drawn by one color component at full value
pub const CURRENT_PER_COMPONENT_MA: u32 = 20;
/// Budget held back for the controller itself
pub const SYSTEM_RESERVE_MA: u32 = 400;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 10;
pub const DEFAULT_SPEED: u8 = 5;
pub const DEFAULT_COLOR: PixelColor = PixelColor::rgb(100, 100, 100);

/// Procedural effect attached directly to an [`EffectConfig`]
///
/// Called with the logical buffer and the current tick.
pub type CustomEffectFn = Arc<dyn Fn(&mut [PixelColor], u32) + Send + Sync>;

/// Global driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Orchestrator tick rate in Hz
    pub update_rate_hz: u32,
    /// Total current budget in mA, `None` for unlimited
    pub current_limit_ma: Option<u32>,
    /// Part of the budget reserved for the rest of the system
    pub system_reserve_ma: u32,
    /// Draw of one component at value 255
    pub current_per_component_ma: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            update_rate_hz: DEFAULT_UPDATE_RATE_HZ,
            current_limit_ma: None,
            system_reserve_ma: SYSTEM_RESERVE_MA,
            current_per_component_ma: CURRENT_PER_COMPONENT_MA,
        }
    }
}

impl DriverConfig {
    #[must_use]
    pub fn with_update_rate(mut self, rate_hz: u32) -> Self {
        self.update_rate_hz = rate_hz.max(1);
        self
    }

    #[must_use]
    pub fn with_current_limit(mut self, limit_ma: Option<u32>) -> Self {
        self.current_limit_ma = limit_ma;
        self
    }

    #[must_use]
    pub fn with_system_reserve(mut self, reserve_ma: u32) -> Self {
        self.system_reserve_ma = reserve_ma;
        self
    }
}

/// Immutable hardware descriptor of one strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Output pin or transport specific line identifier
    pub pin: u32,
    pub pixel_count: u16,
    pub format: PixelFormat,
    /// Serial clock of the encoded bitstream
    pub bit_rate: u32,
    pub name: String,
}

impl ChannelConfig {
    pub fn new(pin: u32, pixel_count: u16) -> Self {
        Self {
            pin,
            pixel_count,
            format: PixelFormat::Rgb,
            bit_rate: DEFAULT_BIT_RATE,
            name: String::new(),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_bit_rate(mut self, bit_rate: u32) -> Self {
        self.bit_rate = bit_rate;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = String::from(name);
        self
    }
}

/// Desired animation of one channel
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Effect name, matched case-insensitively
    pub effect: String,
    pub color: PixelColor,
    pub brightness: u8,
    /// 1 (slowest) to 10 (fastest)
    pub speed: u8,
    pub enabled: bool,
    /// Per pixel output enable; ignored unless its length equals the pixel count
    pub mask: Option<Vec<bool>>,
    #[serde(skip)]
    pub custom: Option<CustomEffectFn>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            effect: String::from(EffectId::Solid.as_str()),
            color: DEFAULT_COLOR,
            brightness: 255,
            speed: DEFAULT_SPEED,
            enabled: true,
            mask: None,
            custom: None,
        }
    }
}

impl fmt::Debug for EffectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectConfig")
            .field("effect", &self.effect)
            .field("color", &self.color)
            .field("brightness", &self.brightness)
            .field("speed", &self.speed)
            .field("enabled", &self.enabled)
            .field("mask", &self.mask.as_ref().map(Vec::len))
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl EffectConfig {
    pub fn new(effect: &str) -> Self {
        Self {
            effect: String::from(effect),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: PixelColor) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = clamp_speed(speed);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Attach a procedural effect and select it
    #[must_use]
    pub fn with_custom<F>(mut self, effect: F) -> Self
    where
        F: Fn(&mut [PixelColor], u32) + Send + Sync + 'static,
    {
        self.effect = String::from(crate::effect::EFFECT_NAME_CUSTOM);
        self.custom = Some(Arc::new(effect));
        self
    }

    /// Clamp speed and drop a mask that does not fit `pixel_count`.
    #[must_use]
    pub fn normalized(mut self, pixel_count: usize) -> Self {
        self.speed = clamp_speed(self.speed);
        if self.mask.as_ref().is_some_and(|m| m.len() != pixel_count) {
            self.mask = None;
        }
        self
    }
}

pub fn clamp_speed(speed: u8) -> u8 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn default_config_is_sane() {
        let c = DriverConfig::default();
        assert_eq!(c.update_rate_hz, 60);
        assert_eq!(c.current_limit_ma, None);
        assert!(c.system_reserve_ma > 0);
        assert!(c.current_per_component_ma > 0);
    }

    #[test]
    fn default_effect_is_dim_white_solid() {
        let e = EffectConfig::default();
        assert_eq!(e.effect, "SOLID");
        assert_eq!(e.color, PixelColor::rgb(100, 100, 100));
        assert_eq!(e.brightness, 255);
        assert_eq!(e.speed, 5);
        assert!(e.enabled);
    }

    #[test]
    fn normalize_clamps_speed_and_drops_bad_mask() {
        let mut e = EffectConfig::new("BLINK").with_mask(vec![true; 3]);
        e.speed = 42;
        let e = e.normalized(8);
        assert_eq!(e.speed, 10);
        assert!(e.mask.is_none());

        let e = EffectConfig::new("BLINK").with_mask(vec![true; 8]).normalized(8);
        assert_eq!(e.mask.map(|m| m.len()), Some(8));
    }

    #[test]
    fn serde_roundtrip() {
        let c = DriverConfig::default().with_current_limit(Some(2000));
        let json = serde_json::to_string(&c).unwrap();
        let c2: DriverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn effect_config_from_partial_json() {
        let e: EffectConfig = serde_json::from_str(r#"{"effect":"rainbow","speed":9}"#).unwrap();
        assert_eq!(e.effect, "rainbow");
        assert_eq!(e.speed, 9);
        assert_eq!(e.brightness, 255);
        assert!(e.custom.is_none());
    }

    #[test]
    fn postcard_roundtrip() {
        let c = ChannelConfig::new(18, 60).with_format(PixelFormat::Rgbw);
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: ChannelConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c, c2);
    }
}
