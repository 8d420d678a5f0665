use crate::color::PixelColor;

/// Fill `scaled` from `logical`, applying `brightness / 255` and then the
/// current limiting `factor` if it attenuates.
///
/// Both steps truncate; the factor is skipped entirely at 1.0 so an
/// unlimited budget never touches the brightness result.
pub fn apply_output_scaling(
    logical: &[PixelColor],
    scaled: &mut [PixelColor],
    brightness: u8,
    factor: f32,
) {
    let brightness_scale = f32::from(brightness) / 255.0;
    for (out, pixel) in scaled.iter_mut().zip(logical) {
        let mut value = pixel.scale_f32(brightness_scale);
        if factor < 1.0 {
            value = value.scale_f32(factor);
        }
        *out = value;
    }
}
