use image::{Rgb, RgbImage};

use crate::{colorize::Rgb16Image, error::DepthVizError};

/// Expand an 8-bit image into the 16-bit range.
///
/// Each sample is multiplied by 255, the reference arithmetic for the top
/// pane of a composite (peak value 65025, not 65535).
pub fn expand_to_sixteen_bits(image: &RgbImage) -> Rgb16Image {
    Rgb16Image::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        Rgb([
            pixel[0] as u16 * 255,
            pixel[1] as u16 * 255,
            pixel[2] as u16 * 255,
        ])
    })
}

/// Stack one image on top of another.
///
/// # Errors
///
/// Returns [`DepthVizError::WidthMismatch`] when the panes do not share
/// the same width.
pub fn stack_vertical(top: &Rgb16Image, bottom: &Rgb16Image) -> Result<Rgb16Image, DepthVizError> {
    if top.width() != bottom.width() {
        return Err(DepthVizError::WidthMismatch(top.width(), bottom.width()));
    }

    let mut data = Vec::with_capacity(top.as_raw().len() + bottom.as_raw().len());
    data.extend_from_slice(top.as_raw());
    data.extend_from_slice(bottom.as_raw());

    Rgb16Image::from_raw(top.width(), top.height() + bottom.height(), data)
        .ok_or(DepthVizError::WidthMismatch(top.width(), bottom.width()))
}
