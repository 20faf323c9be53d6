use std::{fmt, path::PathBuf, str::FromStr};

use candle_core::DType;

use crate::error::DepthVizError;

/// Network size variant of the depth estimation backbone.
///
/// Each variant selects a DINOv2 geometry and the matching decoder
/// channel/feature configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderKind {
    /// ViT-Small, 384-dim embeddings.
    VitSmall,
    /// ViT-Base, 768-dim embeddings.
    VitBase,
    /// ViT-Large, 1024-dim embeddings.
    VitLarge,
    /// ViT-Giant, 1536-dim embeddings.
    VitGiant,
}

impl EncoderKind {
    /// The short name used in flag values and checkpoint file names.
    pub fn name(&self) -> &'static str {
        match self {
            EncoderKind::VitSmall => "vits",
            EncoderKind::VitBase => "vitb",
            EncoderKind::VitLarge => "vitl",
            EncoderKind::VitGiant => "vitg",
        }
    }
}

impl FromStr for EncoderKind {
    type Err = DepthVizError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "vits" => Ok(EncoderKind::VitSmall),
            "vitb" => Ok(EncoderKind::VitBase),
            "vitl" => Ok(EncoderKind::VitLarge),
            "vitg" => Ok(EncoderKind::VitGiant),
            _ => Err(DepthVizError::InvalidArgument(format!(
                "unknown encoder `{value}`, expected one of: vits, vitb, vitl, vitg"
            ))),
        }
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric precision of the forward pass.
///
/// Chosen once at startup; the loaded weights are never recast afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Half precision floats.
    Fp16,
    /// Single precision floats.
    Fp32,
}

impl Precision {
    /// The tensor dtype the weights are loaded at.
    pub fn dtype(&self) -> DType {
        match self {
            Precision::Fp16 => DType::F16,
            Precision::Fp32 => DType::F32,
        }
    }
}

impl FromStr for Precision {
    type Err = DepthVizError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fp16" => Ok(Precision::Fp16),
            "fp32" => Ok(Precision::Fp32),
            _ => Err(DepthVizError::InvalidArgument(format!(
                "unknown precision `{value}`, expected fp16 or fp32"
            ))),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Fp16 => f.write_str("fp16"),
            Precision::Fp32 => f.write_str("fp32"),
        }
    }
}

/// The resolved set of options for one process invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to an image, a txt file listing images, or a directory to walk.
    pub img_path: PathBuf,
    /// Directory where the rendered depth maps are written.
    pub outdir: PathBuf,
    /// Network size variant.
    pub encoder: EncoderKind,
    /// Numeric precision of the forward pass.
    pub precision: Precision,
    /// Write the depth map alone instead of stacking it under the input.
    pub pred_only: bool,
    /// Map the depth values through the spectral palette.
    pub color: bool,
    /// Optional override for the depth head weights.
    pub depth_weights: Option<PathBuf>,
    /// Optional override for the DINOv2 backbone weights.
    pub dinov2_weights: Option<PathBuf>,
}
