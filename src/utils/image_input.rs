//! Loading of the profile image picked by the user.
//!
//! The file is read asynchronously, then decoded and checked: size,
//! recognised format, dimensions. A load may fail or find no data; the
//! caller then keeps whatever image it had.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use image::{GenericImageView, ImageFormat};
use log::info;

use crate::consts::{MAX_IMAGE_DIMENSIONS, MAX_IMAGE_FILE_SIZE};
use crate::models::ImageSummary;

/// A decoded and checked profile picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    filename: String,
    format: ImageFormat,
    dimensions: (u32, u32),
}

fn check_size(len: u64) -> Result<()> {
    if len > MAX_IMAGE_FILE_SIZE as u64 {
        bail!("Profile image is too large ({} bytes, at most {})", len, MAX_IMAGE_FILE_SIZE);
    }
    Ok(())
}

impl ProfileImage {
    /// Decodes `content` as a profile picture named after the last
    /// component of `filename`
    pub fn new(content: &[u8], filename: &str) -> Result<Self> {
        if content.is_empty() {
            bail!("Profile image has no data");
        }
        check_size(content.len() as u64)?;

        let filename = Self::display_name(filename)?;
        let format = Self::supported_format(content)?;
        let dimensions = Self::decoded_dimensions(content, format)
            .with_context(|| format!("{} is not a usable picture", filename))?;

        Ok(Self {
            filename,
            format,
            dimensions,
        })
    }

    fn display_name(filename: &str) -> Result<String> {
        Path::new(filename.trim())
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("No file name in '{}'", filename))
    }

    fn supported_format(content: &[u8]) -> Result<ImageFormat> {
        match image::guess_format(content) {
            Ok(
                format @ (ImageFormat::Png
                | ImageFormat::Jpeg
                | ImageFormat::Gif
                | ImageFormat::WebP
                | ImageFormat::Bmp),
            ) => Ok(format),
            Ok(format) => bail!("{:?} pictures are not accepted", format),
            Err(_) => bail!("Not a known picture format"),
        }
    }

    fn decoded_dimensions(content: &[u8], format: ImageFormat) -> Result<(u32, u32)> {
        let (width, height) = image::load_from_memory_with_format(content, format)?.dimensions();
        let (max_width, max_height) = MAX_IMAGE_DIMENSIONS;

        if width > max_width || height > max_height {
            bail!("Picture is {}x{}, at most {}x{} is accepted", width, height, max_width, max_height);
        }
        Ok((width, height))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            filename: self.filename.clone(),
            width: self.dimensions.0,
            height: self.dimensions.1,
        }
    }
}

/// Reads and checks the image at `path`.
///
/// Returns `Ok(None)` when the file holds no data. Oversized files are
/// refused before being read. Decoding runs on the blocking pool.
pub async fn load_profile_image(path: impl AsRef<Path>) -> Result<Option<ProfileImage>> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    check_size(metadata.len())?;

    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if content.is_empty() {
        info!("Profile image {} is empty, nothing loaded", path.display());
        return Ok(None);
    }

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_owned();

    let image = tokio::task::spawn_blocking(move || ProfileImage::new(&content, &filename))
        .await
        .context("Image decoding task failed")??;

    info!(
        "Profile image {} loaded ({} x {})",
        image.filename, image.dimensions.0, image.dimensions.1
    );
    Ok(Some(image))
}
