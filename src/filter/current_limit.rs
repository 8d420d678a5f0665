//! Aggregate power budgeting across all channels

use crate::{
    color::{PixelColor, PixelFormat},
    config::DriverConfig,
};

/// Predicted draw of a logical buffer in mA.
///
/// Each active component contributes `value * per_component_ma / 255`,
/// truncated per component.
pub fn predicted_current_ma(pixels: &[PixelColor], format: PixelFormat, per_component_ma: u32) -> u32 {
    let components = format.channels();
    pixels
        .iter()
        .map(|pixel| {
            (0..components)
                .map(|c| u32::from(pixel.component(c)) * per_component_ma / 255)
                .sum::<u32>()
        })
        .sum()
}

/// Uniform attenuation keeping `total_ma` within `limit_ma - reserve_ma`.
///
/// - no limit: `1.0`
/// - total fits the available budget: `1.0`
/// - nothing available: `0.0`
/// - otherwise `available / total`
#[allow(clippy::cast_precision_loss)]
pub fn compute_scale_factor(total_ma: u32, limit_ma: Option<u32>, reserve_ma: u32) -> f32 {
    let Some(limit) = limit_ma else {
        return 1.0;
    };
    let available = limit.saturating_sub(reserve_ma);
    if total_ma <= available {
        return 1.0;
    }
    if available == 0 {
        return 0.0;
    }
    available as f32 / total_ma as f32
}

/// Current budget shared by every channel of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentLimiter {
    limit_ma: Option<u32>,
    reserve_ma: u32,
    per_component_ma: u32,
}

impl CurrentLimiter {
    pub const fn new(limit_ma: Option<u32>, reserve_ma: u32, per_component_ma: u32) -> Self {
        Self {
            limit_ma,
            reserve_ma,
            per_component_ma,
        }
    }

    pub fn from_config(config: &DriverConfig) -> Self {
        Self::new(
            config.current_limit_ma,
            config.system_reserve_ma,
            config.current_per_component_ma,
        )
    }

    pub const fn limit_ma(&self) -> Option<u32> {
        self.limit_ma
    }

    pub fn set_limit_ma(&mut self, limit_ma: Option<u32>) {
        self.limit_ma = limit_ma;
    }

    pub const fn reserve_ma(&self) -> u32 {
        self.reserve_ma
    }

    /// Budget left for the LEDs, zero when the reserve eats everything
    pub fn available_ma(&self) -> Option<u32> {
        self.limit_ma.map(|limit| limit.saturating_sub(self.reserve_ma))
    }

    pub fn predict(&self, pixels: &[PixelColor], format: PixelFormat) -> u32 {
        predicted_current_ma(pixels, format, self.per_component_ma)
    }

    pub fn scale_factor(&self, total_ma: u32) -> f32 {
        compute_scale_factor(total_ma, self.limit_ma, self.reserve_ma)
    }
}

impl Default for CurrentLimiter {
    fn default() -> Self {
        Self::from_config(&DriverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_scales() {
        assert_eq!(compute_scale_factor(u32::MAX, None, 400), 1.0);
    }

    #[test]
    fn within_budget_is_exactly_one() {
        assert_eq!(compute_scale_factor(500, Some(1000), 400), 1.0);
        assert_eq!(compute_scale_factor(600, Some(1000), 400), 1.0);
    }

    #[test]
    fn reserve_above_limit_blacks_out() {
        assert_eq!(compute_scale_factor(10, Some(300), 400), 0.0);
        assert_eq!(compute_scale_factor(10, Some(0), 0), 0.0);
    }

    #[test]
    fn zero_draw_fits_any_budget() {
        assert_eq!(compute_scale_factor(0, Some(0), 400), 1.0);
    }

    #[test]
    fn over_budget_is_proportional() {
        let factor = compute_scale_factor(120, Some(100), 20);
        assert!((factor - 80.0 / 120.0).abs() < f32::EPSILON);
    }

    #[test]
    fn white_pixel_draw() {
        let white = [PixelColor::WHITE];
        assert_eq!(predicted_current_ma(&white, PixelFormat::Rgb, 20), 60);
        let rgbw = [PixelColor::new(255, 255, 255, 255)];
        assert_eq!(predicted_current_ma(&rgbw, PixelFormat::Rgbw, 20), 80);
        assert_eq!(predicted_current_ma(&rgbw, PixelFormat::Rgb, 20), 60);
    }
}
