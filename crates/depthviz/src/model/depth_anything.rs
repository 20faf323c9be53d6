use std::sync::Arc;

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::depth_anything_v2::{DepthAnythingV2, DepthAnythingV2Config};
use candle_transformers::models::dinov2::DinoVisionTransformer;
use image::{imageops, RgbImage};

use crate::{
    config::{EncoderKind, Precision},
    error::DepthVizError,
    model::{DepthEstimator, WeightFiles},
    normalize::DepthMap,
    sizing::InferenceSize,
};

// taken these from: https://huggingface.co/spaces/depth-anything/Depth-Anything-V2/blob/main/depth_anything_v2/dpt.py#L207
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Pretrained Depth Anything V2 network running on candle.
///
/// Built once at startup and shared read-only across the batch; the weights
/// are loaded at the requested precision and never recast afterwards.
pub struct DepthAnything {
    model: DepthAnythingV2,
    device: Device,
    dtype: DType,
}

impl DepthAnything {
    /// Load the backbone and depth head weights for an encoder variant.
    pub fn new(
        encoder: EncoderKind,
        precision: Precision,
        weights: &WeightFiles,
        device: Device,
    ) -> Result<Self, DepthVizError> {
        let dtype = precision.dtype();

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights.dinov2], dtype, &device)? };
        let dinov2 = Arc::new(build_dinov2(encoder, vb)?);

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights.depth_head], dtype, &device)? };
        let model = DepthAnythingV2::new(dinov2, head_config(encoder), vb)?;

        Ok(Self {
            model,
            device,
            dtype,
        })
    }
}

impl DepthEstimator for DepthAnything {
    fn infer(&self, image: &RgbImage, target: InferenceSize) -> Result<DepthMap, DepthVizError> {
        let input = image_to_tensor(image, target, &self.device)?.to_dtype(self.dtype)?;
        let output = self.model.forward(&input)?;
        tensor_to_depth_map(&output, target)
    }
}

// depth, embedding dimension and attention heads of each DINOv2 variant
fn build_dinov2(
    encoder: EncoderKind,
    vb: VarBuilder,
) -> Result<DinoVisionTransformer, candle_core::Error> {
    let (depth, embed_dim, num_heads) = match encoder {
        EncoderKind::VitSmall => (12, 384, 6),
        EncoderKind::VitBase => (12, 768, 12),
        EncoderKind::VitLarge => (24, 1024, 16),
        EncoderKind::VitGiant => (40, 1536, 24),
    };
    DinoVisionTransformer::new(vb, depth, embed_dim, num_heads)
}

fn head_config(encoder: EncoderKind) -> DepthAnythingV2Config {
    match encoder {
        EncoderKind::VitSmall => DepthAnythingV2Config::vit_small(),
        EncoderKind::VitBase => DepthAnythingV2Config::vit_base(),
        EncoderKind::VitLarge => DepthAnythingV2Config::vit_large(),
        EncoderKind::VitGiant => DepthAnythingV2Config::vit_giant(),
    }
}

/// Resize an image to the inference size and convert it into a normalized
/// `NCHW` tensor, scaled to `[0, 1]` and standardized per channel.
fn image_to_tensor(
    image: &RgbImage,
    target: InferenceSize,
    device: &Device,
) -> Result<Tensor, candle_core::Error> {
    let resized = imageops::resize(
        image,
        target.width,
        target.height,
        imageops::FilterType::CatmullRom,
    );

    let (height, width) = (target.height as usize, target.width as usize);
    let mut data = vec![0.0f32; height * width * 3];
    for (idx, pixel) in resized.pixels().enumerate() {
        for channel in 0..3 {
            let value = pixel[channel] as f32 / 255.0;
            data[idx * 3 + channel] =
                (value - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel];
        }
    }

    let tensor = Tensor::from_vec(data, (height, width, 3), device)?;
    tensor.permute((2, 0, 1))?.unsqueeze(0)
}

/// Convert the forward output back into a depth map at the inference size.
fn tensor_to_depth_map(
    output: &Tensor,
    target: InferenceSize,
) -> Result<DepthMap, DepthVizError> {
    let (_, _, rows, cols) = output.dims4()?;
    let data = output.to_dtype(DType::F32)?.flatten_all()?.to_vec1::<f32>()?;

    let depth =
        DepthMap::from_raw(cols as u32, rows as u32, data).ok_or(DepthVizError::EmptyDepthMap)?;

    if (rows as u32, cols as u32) == (target.height, target.width) {
        return Ok(depth);
    }

    // the head may emit at patch resolution, bring it back to the inference size
    Ok(resize_depth_bilinear(&depth, target))
}

/// Bilinear resampling of a raw depth map.
///
/// Raw depth has no fixed range, so the generic image resampler (which
/// clamps f32 samples to `[0, 1]`) cannot be used here.
fn resize_depth_bilinear(depth: &DepthMap, target: InferenceSize) -> DepthMap {
    let (src_width, src_height) = depth.dimensions();
    let scale_x = src_width as f32 / target.width as f32;
    let scale_y = src_height as f32 / target.height as f32;
    let max_x = (src_width - 1) as isize;
    let max_y = (src_height - 1) as isize;

    let sample = |x: isize, y: isize| -> f32 {
        depth.get_pixel(x.clamp(0, max_x) as u32, y.clamp(0, max_y) as u32)[0]
    };

    DepthMap::from_fn(target.width, target.height, |dst_x, dst_y| {
        let src_x = (dst_x as f32 + 0.5) * scale_x - 0.5;
        let src_y = (dst_y as f32 + 0.5) * scale_y - 0.5;
        let x0 = src_x.floor();
        let y0 = src_y.floor();
        let tx = src_x - x0;
        let ty = src_y - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = sample(x0, y0) * (1.0 - tx) + sample(x0 + 1, y0) * tx;
        let bottom = sample(x0, y0 + 1) * (1.0 - tx) + sample(x0 + 1, y0 + 1) * tx;
        image::Luma([top * (1.0 - ty) + bottom * ty])
    })
}

#[cfg(test)]
mod tests {
    use super::{
        image_to_tensor, resize_depth_bilinear, tensor_to_depth_map, IMAGENET_MEAN, IMAGENET_STD,
    };
    use crate::normalize::DepthMap;
    use crate::sizing::InferenceSize;
    use candle_core::{Device, Tensor};
    use image::{Rgb, RgbImage};

    #[test]
    fn image_to_tensor_is_normalized_nchw() -> Result<(), candle_core::Error> {
        let device = Device::Cpu;
        let image = RgbImage::from_pixel(14, 14, Rgb([128, 64, 255]));
        let target = InferenceSize {
            height: 14,
            width: 14,
        };

        let tensor = image_to_tensor(&image, target, &device)?;
        assert_eq!(tensor.dims(), &[1, 3, 14, 14]);

        let values = tensor.flatten_all()?.to_vec1::<f32>()?;
        let expected_r = (128.0 / 255.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let expected_b = (255.0 / 255.0 - IMAGENET_MEAN[2]) / IMAGENET_STD[2];
        assert!((values[0] - expected_r).abs() < 1e-6);
        assert!((values[2 * 14 * 14] - expected_b).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn depth_map_matches_target_resolution() -> Result<(), crate::error::DepthVizError> {
        let device = Device::Cpu;
        let target = InferenceSize {
            height: 2,
            width: 2,
        };

        let output = Tensor::from_vec(vec![0.0f32, 1.0, 2.0, 3.0], (1, 1, 2, 2), &device)?;
        let depth = tensor_to_depth_map(&output, target)?;
        assert_eq!(depth.dimensions(), (2, 2));
        assert_eq!(depth.as_raw(), &vec![0.0, 1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn coarse_output_is_resized_to_target() -> Result<(), crate::error::DepthVizError> {
        let device = Device::Cpu;
        let target = InferenceSize {
            height: 14,
            width: 14,
        };

        let output = Tensor::from_vec(vec![1.0f32; 4], (1, 1, 2, 2), &device)?;
        let depth = tensor_to_depth_map(&output, target)?;
        assert_eq!(depth.dimensions(), (14, 14));
        Ok(())
    }

    #[test]
    fn depth_resampling_preserves_unbounded_values() {
        // raw depth regularly exceeds 1.0; resampling must not clamp it
        let depth = DepthMap::from_raw(2, 2, vec![10.0f32; 4]).unwrap();
        let resized = resize_depth_bilinear(
            &depth,
            InferenceSize {
                height: 4,
                width: 4,
            },
        );
        assert_eq!(resized.dimensions(), (4, 4));
        assert!(resized.as_raw().iter().all(|&v| (v - 10.0).abs() < 1e-6));
    }
}
