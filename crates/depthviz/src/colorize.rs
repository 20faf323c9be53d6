use image::{ImageBuffer, Rgb};

use crate::normalize::DepthMap16;

/// A 16-bit RGB visualization buffer.
pub type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// Map a normalized depth map through the reversed spectral palette.
///
/// Near depth renders red, far depth blue. The 8-bit palette samples are
/// widened to the 16-bit range so the output matches the bit depth of the
/// grayscale path.
pub fn colorize_spectral(depth: &DepthMap16) -> Rgb16Image {
    Rgb16Image::from_fn(depth.width(), depth.height(), |x, y| {
        let value = depth.get_pixel(x, y)[0];
        let t = value as f64 / u16::MAX as f64;
        let color = colorous::SPECTRAL.eval_continuous(1.0 - t);
        Rgb([widen(color.r), widen(color.g), widen(color.b)])
    })
}

/// Replicate a single-channel depth map into three identical channels.
pub fn replicate_channels(depth: &DepthMap16) -> Rgb16Image {
    Rgb16Image::from_fn(depth.width(), depth.height(), |x, y| {
        let value = depth.get_pixel(x, y)[0];
        Rgb([value, value, value])
    })
}

fn widen(sample: u8) -> u16 {
    sample as u16 * 257
}

#[cfg(test)]
mod tests {
    use super::{colorize_spectral, replicate_channels};
    use crate::normalize::DepthMap16;

    #[test]
    fn replicated_channels_are_identical() {
        let depth = DepthMap16::from_raw(2, 1, vec![0u16, 65535]).unwrap();
        let rgb = replicate_channels(&depth);

        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [65535, 65535, 65535]);
    }

    #[test]
    fn palette_endpoints_differ() {
        let depth = DepthMap16::from_raw(2, 1, vec![0u16, 65535]).unwrap();
        let rgb = colorize_spectral(&depth);

        assert_eq!(rgb.dimensions(), (2, 1));
        assert_ne!(rgb.get_pixel(0, 0), rgb.get_pixel(1, 0));
    }

    #[test]
    fn palette_is_reversed() {
        // high values (near) land on the red end, low values (far) on the blue end
        let depth = DepthMap16::from_raw(1, 1, vec![65535u16]).unwrap();
        let near = colorize_spectral(&depth).get_pixel(0, 0).0;
        assert!(near[0] > near[2]);

        let depth = DepthMap16::from_raw(1, 1, vec![0u16]).unwrap();
        let far = colorize_spectral(&depth).get_pixel(0, 0).0;
        assert!(far[2] > far[0]);
    }
}
