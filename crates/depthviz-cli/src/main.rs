use std::path::PathBuf;

use argh::FromArgs;

use depthviz::{
    model::{self, DepthAnything},
    pipeline, EncoderKind, Precision, RunConfig,
};

#[derive(FromArgs, Debug)]
/// Estimate depth maps for a batch of images and render them as PNG files.
struct Args {
    /// path to an image, a txt file listing images, or a directory to walk
    #[argh(option, short = 'i', default = "PathBuf::from(\"inputpics\")")]
    img_path: PathBuf,

    /// directory where the rendered depth maps are written
    #[argh(option, short = 'o', default = "PathBuf::from(\"outputpics\")")]
    outdir: PathBuf,

    /// network size variant: vits, vitb, vitl or vitg
    #[argh(option, default = "String::from(\"vitl\")")]
    encoder: String,

    /// numeric precision of the forward pass: fp32 or fp16
    #[argh(option, default = "String::from(\"fp16\")")]
    precision: String,

    /// write the depth map alone instead of stacking it under the input
    #[argh(switch)]
    pred_only: bool,

    /// map the depth values through the spectral palette
    #[argh(switch)]
    color: bool,

    /// override for the depth head weights (safetensors)
    #[argh(option)]
    checkpoint: Option<PathBuf>,

    /// override for the DINOv2 backbone weights (safetensors)
    #[argh(option)]
    dinov2: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let config = RunConfig {
        img_path: args.img_path,
        outdir: args.outdir,
        encoder: args.encoder.parse::<EncoderKind>()?,
        precision: args.precision.parse::<Precision>()?,
        pred_only: args.pred_only,
        color: args.color,
        depth_weights: args.checkpoint,
        dinov2_weights: args.dinov2,
    };

    // device and precision are fixed here, before the first image
    let device = model::select_device();
    log::info!("Using {:?} at {}", device, config.precision);

    let weights = model::resolve_weights(
        config.encoder,
        config.dinov2_weights.as_deref(),
        config.depth_weights.as_deref(),
    )?;
    let model = DepthAnything::new(config.encoder, config.precision, &weights, device)?;

    let summary = pipeline::run(&config, &model)?;
    println!(
        "Done: {} images written, {} skipped",
        summary.processed, summary.skipped
    );

    Ok(())
}
