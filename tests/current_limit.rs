mod tests {
    use myrtio_pixel_driver::{
        ChannelConfig, CurrentLimiter, EffectEngine, PixelChannel, PixelColor, PixelFormat,
        XorShift32, compute_scale_factor, filter::predicted_current_ma,
    };

    fn white_channel(id: u32) -> PixelChannel {
        let mut channel = PixelChannel::new(id, ChannelConfig::new(id, 1));
        channel.set_color(PixelColor::WHITE);
        channel
    }

    #[test]
    fn test_prediction_per_component() {
        assert_eq!(predicted_current_ma(&[PixelColor::WHITE], PixelFormat::Rgb, 20), 60);
        assert_eq!(
            predicted_current_ma(&[PixelColor::new(255, 255, 255, 255)], PixelFormat::Rgbw, 20),
            80
        );
        // white component ignored on RGB strips
        assert_eq!(
            predicted_current_ma(&[PixelColor::new(0, 0, 0, 255)], PixelFormat::Rgb, 20),
            0
        );
        // 127 * 20 / 255 truncates to 9
        assert_eq!(predicted_current_ma(&[PixelColor::rgb(127, 0, 0)], PixelFormat::Rgb, 20), 9);
    }

    #[test]
    fn test_scale_factor_cases() {
        assert_eq!(compute_scale_factor(5_000, None, 400), 1.0);
        assert_eq!(compute_scale_factor(80, Some(100), 20), 1.0);
        assert_eq!(compute_scale_factor(120, Some(100), 20), 80.0 / 120.0);
        assert_eq!(compute_scale_factor(1, Some(300), 400), 0.0);
        assert_eq!(compute_scale_factor(0, Some(0), 400), 1.0);
    }

    #[test]
    fn test_limit_shared_across_channels() {
        let engine = EffectEngine::default();
        let limiter = CurrentLimiter::new(Some(100), 20, 20);
        let mut random = XorShift32::default();
        let mut channels = vec![white_channel(0), white_channel(1)];

        for channel in &mut channels {
            channel.render(&engine, 0, &mut random);
        }
        let total: u32 = channels.iter().map(|c| c.predicted_current_ma(20)).sum();
        assert_eq!(total, 120);

        let factor = limiter.scale_factor(total);
        assert!((factor - 80.0 / 120.0).abs() < f32::EPSILON);
        for channel in &mut channels {
            channel.apply_scaling(factor);
            assert_eq!(channel.scaled_pixels()[0], PixelColor::rgb(170, 170, 170));
            assert_eq!(channel.pixels()[0], PixelColor::WHITE);
        }
    }

    #[test]
    fn test_limit_below_reserve_blacks_out() {
        let engine = EffectEngine::default();
        let limiter = CurrentLimiter::new(Some(10), 20, 20);
        let mut channel = white_channel(0);
        channel.render(&engine, 0, &mut XorShift32::default());

        assert_eq!(limiter.available_ma(), Some(0));
        channel.apply_scaling(limiter.scale_factor(channel.predicted_current_ma(20)));
        assert!(channel.scaled_pixels()[0].is_black());
    }

    #[test]
    fn test_masked_pixels_still_counted() {
        let engine = EffectEngine::default();
        let mut channel = PixelChannel::new(0, ChannelConfig::new(0, 2));
        channel.set_color(PixelColor::WHITE);
        assert!(channel.set_mask(vec![true, false]));
        channel.render(&engine, 0, &mut XorShift32::default());
        assert_eq!(channel.predicted_current_ma(20), 120);
    }
}
