use crate::error::DepthVizError;

/// Patch size of the DINOv2 backbone. Inference dimensions must be a
/// multiple of this stride.
pub const PATCH_SIZE: u32 = 14;

/// The resolution an image is resized to before inference.
///
/// Both sides are positive multiples of [`PATCH_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceSize {
    /// Target height in pixels.
    pub height: u32,
    /// Target width in pixels.
    pub width: u32,
}

impl InferenceSize {
    /// Derive the inference size from raw image dimensions.
    ///
    /// The height rounds to the nearest multiple of the patch size; the
    /// width is first scaled by the unrounded aspect ratio and then rounded
    /// independently. Rounding is half-to-even, so the derivation matches
    /// the reference arithmetic exactly:
    ///
    /// ```
    /// use depthviz::sizing::InferenceSize;
    ///
    /// let size = InferenceSize::from_image_size(100, 200).unwrap();
    /// assert_eq!(size.height, 98);
    /// assert_eq!(size.width, 406);
    /// ```
    ///
    /// Inputs smaller than half a patch would round down to zero and are
    /// clamped up to a single patch instead.
    ///
    /// # Errors
    ///
    /// Returns [`DepthVizError::InvalidImageSize`] when either dimension
    /// is zero.
    pub fn from_image_size(height: u32, width: u32) -> Result<Self, DepthVizError> {
        if height == 0 || width == 0 {
            return Err(DepthVizError::InvalidImageSize(height, width));
        }

        let patch = PATCH_SIZE as f64;
        let aspect_ratio = width as f64 / height as f64;

        let new_height = ((height as f64 / patch).round_ties_even() * patch) as u32;
        let new_width = ((width as f64 * aspect_ratio / patch).round_ties_even() * patch) as u32;

        Ok(Self {
            height: new_height.max(PATCH_SIZE),
            width: new_width.max(PATCH_SIZE),
        })
    }

    /// The aspect ratio of the raw input this size was derived from.
    pub fn aspect_ratio(height: u32, width: u32) -> f64 {
        width as f64 / height as f64
    }
}
