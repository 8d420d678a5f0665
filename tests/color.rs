mod tests {
    use myrtio_pixel_driver::{PixelColor, PixelFormat};

    #[test]
    fn test_blend_colors() {
        let red = PixelColor::RED;
        let blue = PixelColor::BLUE;
        assert_eq!(red.blend(blue, 0), red);
        assert_eq!(red.blend(blue, 255), blue);
        assert_eq!(red.blend(blue, 128), PixelColor::rgb(127, 0, 128));
        assert_eq!(
            PixelColor::BLACK.blend(PixelColor::WHITE, 128),
            PixelColor::rgb(128, 128, 128)
        );
    }

    #[test]
    fn test_scale() {
        let color = PixelColor::new(200, 100, 50, 10);
        assert_eq!(color.scale(255), color);
        assert_eq!(color.scale(0), PixelColor::BLACK);
        assert_eq!(color.scale(128), PixelColor::new(100, 50, 25, 5));
    }

    #[test]
    fn test_scale_f32_truncates() {
        let color = PixelColor::WHITE.scale_f32(80.0 / 120.0);
        assert_eq!(color, PixelColor::rgb(170, 170, 170));
        assert_eq!(PixelColor::WHITE.scale_f32(0.0), PixelColor::BLACK);
    }

    #[test]
    fn test_from_hsv() {
        assert_eq!(PixelColor::from_hsv(0, 255, 255), PixelColor::RED);
        assert_eq!(PixelColor::from_hsv(85, 255, 255), PixelColor::rgb(3, 255, 0));
        assert_eq!(PixelColor::from_hsv(42, 0, 77), PixelColor::rgb(77, 77, 77));
        assert_eq!(PixelColor::from_hsv(200, 255, 0), PixelColor::BLACK);
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(PixelColor::from_u32(0x00FF_8000), PixelColor::rgb(255, 128, 0));
        assert_eq!(PixelColor::from_u32(0), PixelColor::BLACK);
    }

    #[test]
    fn test_complement_drops_white() {
        let color = PixelColor::new(255, 0, 100, 40);
        assert_eq!(color.complement(), PixelColor::new(0, 255, 155, 0));
    }

    #[test]
    fn test_components() {
        let color = PixelColor::new(1, 2, 3, 4);
        let components: Vec<u8> = (0..4).map(|i| color.component(i)).collect();
        assert_eq!(components, vec![1, 2, 3, 4]);
        assert!(PixelColor::BLACK.is_black());
        assert!(!PixelColor::new(0, 0, 0, 1).is_black());
    }

    #[test]
    fn test_pixel_format() {
        assert_eq!(PixelFormat::default(), PixelFormat::Rgb);
        assert_eq!(PixelFormat::Rgb.channels(), 3);
        assert_eq!(PixelFormat::Rgbw.channels(), 4);
        assert!(PixelFormat::Rgbw.has_white());
        assert!(!PixelFormat::Rgb.has_white());
    }
}
