#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// visualization of depth maps through a color palette.
pub mod colorize;

/// stacking of input and depth panes into one output image.
pub mod compose;

/// run configuration and flag value types.
pub mod config;

/// resolution of input paths into file lists.
pub mod enumerate;

/// Error types for the pipeline.
pub mod error;

/// depth estimation models and the capability boundary to them.
pub mod model;

/// rescaling of raw depth maps into a displayable range.
pub mod normalize;

/// the per-image batch pipeline.
pub mod pipeline;

/// derivation of inference dimensions.
pub mod sizing;

pub use crate::config::{EncoderKind, Precision, RunConfig};
pub use crate::error::DepthVizError;
pub use crate::model::{DepthAnything, DepthEstimator};
pub use crate::pipeline::{run, RunSummary};
pub use crate::sizing::InferenceSize;
