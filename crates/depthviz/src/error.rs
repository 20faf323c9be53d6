use std::path::PathBuf;

/// An error type for the depthviz pipeline.
#[derive(thiserror::Error, Debug)]
pub enum DepthVizError {
    /// Error when a flag value cannot be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error when an explicitly requested weight file does not exist.
    #[error("Checkpoint file does not exist: {0}")]
    CheckpointNotFound(PathBuf),

    /// Error when fetching weights from the Hugging Face hub.
    #[error("Failed to fetch model weights from the hub. {0}")]
    WeightsFetch(#[from] hf_hub::api::sync::ApiError),

    /// Error when an image has degenerate dimensions.
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(u32, u32),

    /// Error when decoding an input image. Recoverable: the batch skips it.
    #[error("Failed to decode the image {0}. {1}")]
    ImageDecode(PathBuf, image::ImageError),

    /// Error when encoding an output image.
    #[error("Failed to encode the image {0}. {1}")]
    ImageEncode(PathBuf, image::ImageError),

    /// Error when two panes to stack do not share the same width.
    #[error("Images must share the same width to be stacked: {0} vs {1}")]
    WidthMismatch(u32, u32),

    /// Error when a depth map holds no samples.
    #[error("Depth map holds no samples")]
    EmptyDepthMap,

    /// Error when building or running the model.
    #[error("Inference failed. {0}")]
    Inference(#[from] candle_core::Error),

    /// Error to manipulate a file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),
}

impl DepthVizError {
    /// Whether the batch loop may skip the current image and continue.
    ///
    /// Only input-side decode failures are recoverable; configuration,
    /// model and output errors abort the whole run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DepthVizError::ImageDecode(_, _))
    }
}
