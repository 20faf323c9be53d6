use std::path::{Path, PathBuf};

use candle_core::Device;
use image::RgbImage;

use crate::{
    config::EncoderKind, error::DepthVizError, normalize::DepthMap, sizing::InferenceSize,
};

/// candle adapter for the Depth Anything V2 network.
pub mod depth_anything;

pub use depth_anything::DepthAnything;

/// Capability boundary to the depth estimation network.
///
/// The network internals are opaque to the pipeline: one operation turns an
/// image into a raw depth map at the requested inference size. Precision is
/// fixed when the estimator is built.
pub trait DepthEstimator {
    /// Run single-image inference, returning a depth map at `target`
    /// resolution.
    fn infer(&self, image: &RgbImage, target: InferenceSize) -> Result<DepthMap, DepthVizError>;
}

/// Pick the inference device once at startup: CUDA if available, else
/// Metal, else CPU.
pub fn select_device() -> Device {
    if candle_core::utils::cuda_is_available() {
        match Device::new_cuda(0) {
            Ok(device) => return device,
            Err(e) => log::warn!("Failed to initialize CUDA, falling back: {e}"),
        }
    }
    if candle_core::utils::metal_is_available() {
        match Device::new_metal(0) {
            Ok(device) => return device,
            Err(e) => log::warn!("Failed to initialize Metal, falling back: {e}"),
        }
    }
    Device::Cpu
}

/// The pair of safetensors files a model is loaded from.
#[derive(Debug, Clone)]
pub struct WeightFiles {
    /// DINOv2 backbone weights.
    pub dinov2: PathBuf,
    /// Depth head weights.
    pub depth_head: PathBuf,
}

const CHECKPOINT_DIR: &str = "checkpoints";
const DINOV2_HUB_REPO: &str = "lmz/candle-dino-v2";
const DEPTH_HUB_REPO: &str = "jeroenvlek/depth-anything-v2-safetensors";

/// The templated local checkpoint paths for an encoder variant.
pub fn default_weight_paths(encoder: EncoderKind) -> (PathBuf, PathBuf) {
    let dir = Path::new(CHECKPOINT_DIR);
    (
        dir.join(format!("dinov2_{}14.safetensors", encoder.name())),
        dir.join(format!("depth_anything_v2_{}.safetensors", encoder.name())),
    )
}

/// Resolve the weight files for an encoder variant.
///
/// An explicit override must exist on disk. Without an override the
/// templated path under `checkpoints/` is used when present, and fetched
/// from the Hugging Face hub otherwise.
///
/// # Errors
///
/// Returns [`DepthVizError::CheckpointNotFound`] for a missing override and
/// [`DepthVizError::WeightsFetch`] when the hub download fails.
pub fn resolve_weights(
    encoder: EncoderKind,
    dinov2_override: Option<&Path>,
    depth_override: Option<&Path>,
) -> Result<WeightFiles, DepthVizError> {
    let (dinov2_default, depth_default) = default_weight_paths(encoder);

    Ok(WeightFiles {
        dinov2: resolve_file(
            dinov2_override,
            dinov2_default,
            DINOV2_HUB_REPO,
            &format!("dinov2_{}14.safetensors", encoder.name()),
        )?,
        depth_head: resolve_file(
            depth_override,
            depth_default,
            DEPTH_HUB_REPO,
            &format!("depth_anything_v2_{}.safetensors", encoder.name()),
        )?,
    })
}

fn resolve_file(
    explicit: Option<&Path>,
    default_path: PathBuf,
    repo: &str,
    filename: &str,
) -> Result<PathBuf, DepthVizError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(DepthVizError::CheckpointNotFound(path.to_path_buf()));
        }
        return Ok(path.to_path_buf());
    }

    if default_path.exists() {
        return Ok(default_path);
    }

    log::info!(
        "Checkpoint {} not found, fetching {filename} from {repo}",
        default_path.display()
    );
    let api = hf_hub::api::sync::Api::new()?;
    Ok(api.model(repo.to_string()).get(filename)?)
}
