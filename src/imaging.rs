use crate::config::ImageConfig;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ImageTaskError {
    #[error("unknown fit mode: {0}")]
    UnknownFit(String),

    #[error("unknown anchor: {0}")]
    UnknownAnchor(String),

    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("image task failed to join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// How a resize maps the source onto the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Fill the box, cropping overflow (aspect preserved).
    Cover,
    /// Fit inside the box (aspect preserved, box may not be filled).
    Contain,
    /// Stretch to the exact box (aspect ignored).
    Fill,
}

impl FromStr for Fit {
    type Err = ImageTaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cover" => Ok(Fit::Cover),
            "contain" | "inside" => Ok(Fit::Contain),
            "fill" => Ok(Fit::Fill),
            other => Err(ImageTaskError::UnknownFit(other.to_string())),
        }
    }
}

/// Which part of the source survives a cover crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    North,
    South,
    East,
    West,
}

impl FromStr for Anchor {
    type Err = ImageTaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" | "centre" => Ok(Anchor::Center),
            "top" | "north" => Ok(Anchor::North),
            "bottom" | "south" => Ok(Anchor::South),
            "right" | "east" => Ok(Anchor::East),
            "left" | "west" => Ok(Anchor::West),
            other => Err(ImageTaskError::UnknownAnchor(other.to_string())),
        }
    }
}

/// Smallest scaled dimensions that cover the target box, aspect preserved.
fn cover_dimensions(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let scale = f64::max(
        target_w as f64 / src_w as f64,
        target_h as f64 / src_h as f64,
    );

    let w = (src_w as f64 * scale).round() as u32;
    let h = (src_h as f64 * scale).round() as u32;

    (w.max(target_w), h.max(target_h))
}

/// Top-left corner of the target box within the scaled image.
fn crop_offset(anchor: Anchor, scaled: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let slack_x = scaled.0.saturating_sub(target.0);
    let slack_y = scaled.1.saturating_sub(target.1);

    match anchor {
        Anchor::Center => (slack_x / 2, slack_y / 2),
        Anchor::North => (slack_x / 2, 0),
        Anchor::South => (slack_x / 2, slack_y),
        Anchor::West => (0, slack_y / 2),
        Anchor::East => (slack_x, slack_y / 2),
    }
}

fn apply_fit(img: DynamicImage, fit: Fit, anchor: Anchor, width: u32, height: u32) -> DynamicImage {
    match fit {
        Fit::Contain => img.resize(width, height, FilterType::Lanczos3),
        Fit::Fill => img.resize_exact(width, height, FilterType::Lanczos3),
        Fit::Cover => {
            let (sw, sh) = cover_dimensions(img.width(), img.height(), width, height);
            let scaled = img.resize_exact(sw, sh, FilterType::Lanczos3);
            let (x, y) = crop_offset(anchor, (sw, sh), (width, height));
            scaled.crop_imm(x, y, width, height)
        }
    }
}

fn output_format(ext: &str) -> Result<ImageFormat, ImageTaskError> {
    ImageFormat::from_extension(ext).ok_or_else(|| ImageTaskError::UnknownFormat(ext.to_string()))
}

fn run_task(
    input: PathBuf,
    output: PathBuf,
    format: ImageFormat,
    resize: Option<(Fit, Anchor, u32, u32)>,
) -> Result<(), ImageTaskError> {
    let mut img = image::open(&input)?;

    if let Some((fit, anchor, width, height)) = resize {
        img = apply_fit(img, fit, anchor, width, height);
    }

    img.save_with_format(&output, format)?;

    tracing::debug!(output = %output.display(), "image written");

    Ok(())
}

/// Re-encodes `source_dir/input` to the configured output format.
///
/// Decode and encode failures from the image library propagate unchanged.
pub async fn convert_image(
    input: &str,
    output: impl AsRef<Path>,
    config: &ImageConfig,
) -> Result<(), ImageTaskError> {
    let format = output_format(&config.output_format)?;
    let input = Path::new(&config.source_dir).join(input);
    let output = output.as_ref().to_path_buf();

    tokio::task::spawn_blocking(move || run_task(input, output, format, None)).await?
}

/// Resizes `source_dir/input` to the configured dimensions, fit and anchor,
/// re-encoded to the configured format.
pub async fn resize_image(
    input: &str,
    output: impl AsRef<Path>,
    config: &ImageConfig,
) -> Result<(), ImageTaskError> {
    let fit = config.fit.parse()?;
    let anchor = config.position.parse()?;
    let format = output_format(&config.output_format)?;
    let input = Path::new(&config.source_dir).join(input);
    let output = output.as_ref().to_path_buf();
    let (width, height) = (config.width, config.height);

    tokio::task::spawn_blocking(move || {
        run_task(input, output, format, Some((fit, anchor, width, height)))
    })
    .await?
}

/// Thumbnail variant of [`resize_image`] using the separate thumb geometry.
pub async fn make_thumbnail(
    input: &str,
    output: impl AsRef<Path>,
    config: &ImageConfig,
) -> Result<(), ImageTaskError> {
    make_thumbnail_sized(input, output, config.thumb_width, config.thumb_height, config).await
}

/// Same as [`make_thumbnail`] with caller-supplied dimensions.
pub async fn make_thumbnail_sized(
    input: &str,
    output: impl AsRef<Path>,
    width: u32,
    height: u32,
    config: &ImageConfig,
) -> Result<(), ImageTaskError> {
    let fit = config.thumb_fit.parse()?;
    let anchor = config.thumb_position.parse()?;
    let format = output_format(&config.thumb_format)?;
    let input = Path::new(&config.source_dir).join(input);
    let output = output.as_ref().to_path_buf();

    tokio::task::spawn_blocking(move || {
        run_task(input, output, format, Some((fit, anchor, width, height)))
    })
    .await?
}
