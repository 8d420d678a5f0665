mod tests {
    use myrtio_pixel_driver::{
        gamma::{GAMMA8, gamma8},
        math8::{SIN8, sin8, spread, wrap8},
    };

    #[test]
    fn test_sin8() {
        assert_eq!(sin8(0), 128);
        assert_eq!(sin8(32), 192);
        assert_eq!(sin8(96), 192);
        assert_eq!(sin8(128), 128);
        assert_eq!(sin8(160), 64);
        assert_eq!(sin8(224), 64);
    }

    #[test]
    fn test_sin8_peaks_wrap() {
        assert_eq!(SIN8[63], 254);
        assert_eq!(SIN8[64], 0);
        assert_eq!(SIN8[191], 2);
        assert_eq!(SIN8[192], 0);
    }

    #[test]
    fn test_spread() {
        assert_eq!(spread(0, 8), 0);
        assert_eq!(spread(4, 8), 128);
        assert_eq!(spread(7, 8), 224);
        assert_eq!(spread(3, 0), 0);
        assert_eq!(wrap8(256 + 7), 7);
    }

    #[test]
    fn test_gamma8() {
        assert_eq!(gamma8(0), 0);
        assert_eq!(gamma8(128), 37);
        assert_eq!(gamma8(255), 255);
        assert!(GAMMA8.windows(2).all(|w| w[0] <= w[1]));
    }
}
