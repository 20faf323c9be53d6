use std::{
    fs,
    path::{Path, PathBuf},
};

use image::imageops;

use crate::{
    colorize, compose,
    config::RunConfig,
    enumerate,
    error::DepthVizError,
    model::DepthEstimator,
    normalize,
    sizing::InferenceSize,
};

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Images rendered and written.
    pub processed: usize,
    /// Images skipped because they could not be read.
    pub skipped: usize,
}

/// Run the pipeline over every image the config resolves to.
///
/// Processing is strictly sequential, one image at a time, sharing the
/// estimator read-only. Images that fail to decode are skipped with a
/// warning; configuration, inference and write failures abort the run.
///
/// An empty input list is not an error: nothing is written, not even the
/// output directory.
pub fn run(config: &RunConfig, model: &dyn DepthEstimator) -> Result<RunSummary, DepthVizError> {
    let paths = enumerate::collect_image_paths(&config.img_path)?;
    if paths.is_empty() {
        println!("No images found under {}", config.img_path.display());
        return Ok(RunSummary::default());
    }

    fs::create_dir_all(&config.outdir)?;

    let mut summary = RunSummary::default();
    for (k, path) in paths.iter().enumerate() {
        println!("Progress {}/{}: {}", k + 1, paths.len(), path.display());

        match process_image(path, config, model) {
            Ok(()) => summary.processed += 1,
            Err(err) if err.is_recoverable() => {
                log::warn!("Skipping {}: {err}", path.display());
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

/// Render a single image and write the result.
fn process_image(
    path: &Path,
    config: &RunConfig,
    model: &dyn DepthEstimator,
) -> Result<(), DepthVizError> {
    let image = image::open(path)
        .map_err(|err| DepthVizError::ImageDecode(path.to_path_buf(), err))?
        .into_rgb8();

    let (width, height) = image.dimensions();
    let target = InferenceSize::from_image_size(height, width)?;
    println!(
        "Aspect ratio: {}, inference size: {}x{}",
        InferenceSize::aspect_ratio(height, width),
        target.height,
        target.width
    );

    let depth = model.infer(&image, target)?;
    let depth = normalize::normalize_depth(&depth)?;

    let viz = if config.color {
        colorize::colorize_spectral(&depth)
    } else {
        colorize::replicate_channels(&depth)
    };

    let result = if config.pred_only {
        viz
    } else {
        let top = imageops::resize(
            &image,
            target.width,
            target.height,
            imageops::FilterType::CatmullRom,
        );
        compose::stack_vertical(&compose::expand_to_sixteen_bits(&top), &viz)?
    };

    let out_path = output_path(path, &config.outdir);
    result
        .save(&out_path)
        .map_err(|err| DepthVizError::ImageEncode(out_path.clone(), err))?;

    Ok(())
}

/// The output file for an input, named after its base name.
///
/// Inputs sharing a base name across subdirectories land on the same output
/// file and silently overwrite each other.
pub fn output_path(input: &Path, outdir: &Path) -> PathBuf {
    outdir
        .join(input.file_stem().unwrap_or_default())
        .with_extension("png")
}
