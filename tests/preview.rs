mod tests {
    use myrtio_pixel_driver::{PixelColor, PixelFormat, PixelPreview};

    #[test]
    fn test_preview_matches_blink_cadence() {
        let mut preview = PixelPreview::new(4, PixelFormat::Rgb, 60);
        preview.set_effect("blink");
        preview.set_color(PixelColor::BLUE);
        preview.set_speed(10);

        let mut lit = Vec::new();
        for _ in 0..13 {
            preview.tick();
            lit.push(preview.pixels()[0] == PixelColor::BLUE);
        }
        assert_eq!(preview.tick_count(), 13);
        assert!(lit[0] && lit[5]);
        assert!(!lit[6] && !lit[11]);
        assert!(lit[12]);
    }

    #[test]
    fn test_rgba_frame_alpha() {
        let mut preview = PixelPreview::new(2, PixelFormat::Rgb, 60);
        preview.set_color(PixelColor::new(1, 2, 3, 4));
        preview.tick();
        assert_eq!(preview.frame_rgba(), vec![1, 2, 3, 255, 1, 2, 3, 255]);

        let mut preview = PixelPreview::new(1, PixelFormat::Rgbw, 60);
        preview.set_color(PixelColor::new(1, 2, 3, 4));
        preview.tick();
        assert_eq!(preview.frame_rgba(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_seeded_preview_is_deterministic() {
        let run = || {
            let mut preview = PixelPreview::new(32, PixelFormat::Rgb, 60);
            preview.set_effect("FIRE");
            preview.set_random_seed(42);
            for _ in 0..20 {
                preview.tick();
            }
            preview.pixels().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_reset_and_listing() {
        let mut preview = PixelPreview::new(3, PixelFormat::Rgb, 60);
        preview.set_color(PixelColor::WHITE);
        preview.tick();
        preview.reset();
        assert_eq!(preview.tick_count(), 0);
        assert!(preview.pixels().iter().all(|p| p.is_black()));
        assert_eq!(preview.led_count(), 3);
        assert!(preview.effect_names().iter().any(|n| n == "RUNNING_LIGHTS"));
    }
}
