//! Rectangular sub-image extraction
//!
//! Regions arrive as pixel-space corner points from layout analysis;
//! cropping normalizes them to an axis-aligned bounding box, clamps to
//! the image extent, and copies pixels verbatim. No resampling.

use image::DynamicImage;

use crate::errors::{ImageError, ImageResult};

/// An axis-aligned region in full-image pixel coordinates.
///
/// Built from two or more `(x, y)` points; the minimal form is the
/// top-left and bottom-right corner pair. Points may come in any order,
/// the bounding box is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRegion {
    points: Vec<(u32, u32)>,
}

impl PixelRegion {
    /// Create a region from corner points.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::DegenerateRegion` for fewer than two points.
    pub fn new(points: Vec<(u32, u32)>) -> ImageResult<Self> {
        if points.len() < 2 {
            return Err(ImageError::DegenerateRegion {
                points: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Create a region directly from its two extreme corners.
    pub fn from_corners(top_left: (u32, u32), bottom_right: (u32, u32)) -> Self {
        Self {
            points: vec![top_left, bottom_right],
        }
    }

    /// Normalized bounding box `(x1, y1, x2, y2)` with `x1 <= x2` and
    /// `y1 <= y2`.
    pub fn bounding_box(&self) -> (u32, u32, u32, u32) {
        let x1 = self.points.iter().map(|p| p.0).min().unwrap_or(0);
        let y1 = self.points.iter().map(|p| p.1).min().unwrap_or(0);
        let x2 = self.points.iter().map(|p| p.0).max().unwrap_or(0);
        let y2 = self.points.iter().map(|p| p.1).max().unwrap_or(0);
        (x1, y1, x2, y2)
    }
}

/// Extract the rectangular sub-image covered by `region`.
///
/// The region is clamped to the image bounds; the result has exactly
/// `(x2 - x1, y2 - y1)` pixels after clamping.
pub fn crop(image: &DynamicImage, region: &PixelRegion) -> DynamicImage {
    let (x1, y1, x2, y2) = region.bounding_box();
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    let x2 = x2.min(image.width());
    let y2 = y2.min(image.height());
    image.crop_imm(x1, y1, x2 - x1, y2 - y1)
}
