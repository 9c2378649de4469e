//! Page image decoding, cropping and technical metadata
//!
//! # Module Organization
//!
//! - [`region`] - rectangular sub-image extraction from pixel regions
//! - [`exif`] - the normalized [`ImageExif`] metadata record

pub mod exif;
pub mod region;

use std::io::Cursor;

use image::DynamicImage;

use crate::errors::ImageResult;

pub use self::exif::{ImageExif, ResolutionUnit};
pub use self::region::{crop, PixelRegion};

/// Decode image bytes, optionally restricted to a pixel region.
pub fn decode(bytes: &[u8], region: Option<&PixelRegion>) -> ImageResult<DynamicImage> {
    let decoded = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    Ok(match region {
        Some(region) => crop(&decoded, region),
        None => decoded,
    })
}
