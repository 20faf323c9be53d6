use image::{ImageBuffer, Luma};

use crate::error::DepthVizError;

/// A raw, scale-free depth map at the inference resolution.
pub type DepthMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// A depth map rescaled to the unsigned 16-bit range.
pub type DepthMap16 = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Scale factor mapping normalized depth into the 16-bit range.
const DEPTH_SCALE: f32 = 65536.0;

/// Find the smallest and largest finite values in a depth map.
///
/// Non-finite samples are skipped; a map without any finite sample reports
/// an empty range (min == max).
///
/// # Errors
///
/// Returns [`DepthVizError::EmptyDepthMap`] when the map holds no samples.
pub fn find_min_max(depth: &DepthMap) -> Result<(f32, f32), DepthVizError> {
    if depth.as_raw().is_empty() {
        return Err(DepthVizError::EmptyDepthMap);
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &value in depth.as_raw() {
        if value.is_finite() {
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
        }
    }

    if !min.is_finite() || !max.is_finite() {
        return Ok((0.0, 0.0));
    }

    Ok((min, max))
}

/// Rescale a raw depth map to the unsigned 16-bit range.
///
/// Applies `(d - min) / (max - min) * 65536.0` and casts with saturation,
/// so the global minimum maps to 0 and the global maximum to 65535. The
/// map is monotonic: deeper stays deeper.
///
/// A constant-depth map (max == min) carries no relief to display and
/// produces a uniform zero map instead of dividing by zero. Non-finite
/// samples clamp to 0.
///
/// # Errors
///
/// Returns [`DepthVizError::EmptyDepthMap`] when the map holds no samples.
pub fn normalize_depth(depth: &DepthMap) -> Result<DepthMap16, DepthVizError> {
    let (min, max) = find_min_max(depth)?;
    let range = max - min;

    let data = if range > 0.0 {
        depth
            .as_raw()
            .iter()
            .map(|&value| {
                if value.is_finite() {
                    ((value - min) / range * DEPTH_SCALE) as u16
                } else {
                    0
                }
            })
            .collect()
    } else {
        vec![0u16; depth.as_raw().len()]
    };

    // from_raw only fails on a length mismatch, which the map above preserves
    DepthMap16::from_raw(depth.width(), depth.height(), data)
        .ok_or(DepthVizError::EmptyDepthMap)
}

#[cfg(test)]
mod tests {
    use super::{find_min_max, normalize_depth, DepthMap};
    use crate::error::DepthVizError;

    #[test]
    fn extremes_map_to_full_range() -> Result<(), DepthVizError> {
        let depth = DepthMap::from_raw(2, 2, vec![3.0f32, 5.0, 4.0, 9.0]).unwrap();
        let normalized = normalize_depth(&depth)?;

        let values = normalized.as_raw();
        assert_eq!(values[0], 0);
        assert_eq!(values[3], 65535);
        assert!(values[1] > values[0] && values[1] < values[3]);
        Ok(())
    }

    #[test]
    fn normalization_is_monotonic() -> Result<(), DepthVizError> {
        let samples = vec![0.25f32, 1.5, 7.75, 7.8, 100.0, 1000.0];
        let depth = DepthMap::from_raw(3, 2, samples.clone()).unwrap();
        let normalized = normalize_depth(&depth)?;

        let values = normalized.as_raw();
        for window in values.windows(2) {
            assert!(window[0] <= window[1]);
        }
        Ok(())
    }

    #[test]
    fn constant_depth_yields_uniform_zero() -> Result<(), DepthVizError> {
        let depth = DepthMap::from_raw(4, 1, vec![5.0f32; 4]).unwrap();
        let normalized = normalize_depth(&depth)?;
        assert!(normalized.as_raw().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn non_finite_samples_are_ignored_and_clamped() -> Result<(), DepthVizError> {
        let depth =
            DepthMap::from_raw(4, 1, vec![f32::NAN, 1.0, 2.0, f32::INFINITY]).unwrap();

        let (min, max) = find_min_max(&depth)?;
        assert_eq!((min, max), (1.0, 2.0));

        let normalized = normalize_depth(&depth)?;
        let values = normalized.as_raw();
        assert_eq!(values[0], 0);
        assert_eq!(values[1], 0);
        assert_eq!(values[2], 65535);
        assert_eq!(values[3], 0);
        Ok(())
    }

    #[test]
    fn all_nan_map_is_uniform_zero() -> Result<(), DepthVizError> {
        let depth = DepthMap::from_raw(2, 1, vec![f32::NAN, f32::NAN]).unwrap();
        let normalized = normalize_depth(&depth)?;
        assert!(normalized.as_raw().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn empty_map_is_an_error() {
        let depth = DepthMap::from_raw(0, 0, vec![]).unwrap();
        assert!(matches!(
            normalize_depth(&depth),
            Err(DepthVizError::EmptyDepthMap)
        ));
    }
}
