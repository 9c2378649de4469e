//! Normalized technical image metadata
//!
//! Raster codecs disagree about where resolution, color model and
//! compression live and what they are called; PNG reports pixels per
//! metre, TIFF reports rationals with a unit tag, JPEG may carry EXIF or
//! nothing at all. [`ImageExif`] reconciles them into one canonical
//! record with stable defaults. Values are surfaced as the active codec
//! reports them, never hard-coded: identical pixels can legitimately
//! yield slightly different resolutions across codec library versions,
//! and consumers are expected to tolerate that.

use std::fmt;
use std::io::Cursor;

use image::ImageFormat;
use serde::Serialize;
use tiff::decoder::ifd::Value;
use tiff::tags::Tag;

use crate::constants::exif::{DEFAULT_RESOLUTION, UNKNOWN_PHOTOMETRIC};
use crate::errors::ImageResult;

/// Unit the resolution values are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionUnit {
    Inches,
    #[serde(rename = "cm")]
    Centimeters,
    /// The image declares pixel density without an absolute unit
    None,
}

impl fmt::Display for ResolutionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionUnit::Inches => write!(f, "inches"),
            ResolutionUnit::Centimeters => write!(f, "cm"),
            ResolutionUnit::None => write!(f, "none"),
        }
    }
}

/// Canonical technical metadata of one decoded image.
///
/// Derived once per image and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageExif {
    pub width: u32,
    pub height: u32,
    /// Color model as the codec names it (`"RGB"`, `"L"`, `"1"` for
    /// bilevel); `"unknown"` when the codec has no notion of one
    #[serde(rename = "photometricInterpretation")]
    pub photometric_interpretation: String,
    pub n_frames: u32,
    /// Named compression scheme when the container exposes one (e.g.
    /// `"jpeg"` inside TIFF); absent otherwise
    pub compression: Option<String>,
    #[serde(rename = "xResolution")]
    pub x_resolution: u32,
    #[serde(rename = "yResolution")]
    pub y_resolution: u32,
    #[serde(rename = "resolutionUnit")]
    pub resolution_unit: ResolutionUnit,
    /// Convenience value, present when both axes agree
    pub resolution: Option<u32>,
}

impl ImageExif {
    /// Build the canonical record from encoded image bytes.
    ///
    /// The image is decoded for dimensions and color model; resolution,
    /// compression and frame count come from format-specific metadata
    /// when the format carries any. Absent resolution metadata defaults
    /// to 1 pixel per inch on both axes.
    ///
    /// # Errors
    ///
    /// Returns `ImageError` if the bytes cannot be decoded at all, or if
    /// format-specific metadata is present but unreadable.
    pub fn from_bytes(bytes: &[u8]) -> ImageResult<Self> {
        let decoded = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;

        let mut exif = Self {
            width: decoded.width(),
            height: decoded.height(),
            photometric_interpretation: photometric_from_color(decoded.color()).to_string(),
            n_frames: 1,
            compression: None,
            x_resolution: DEFAULT_RESOLUTION,
            y_resolution: DEFAULT_RESOLUTION,
            resolution_unit: ResolutionUnit::Inches,
            resolution: None,
        };

        match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => exif.apply_png(bytes)?,
            Ok(ImageFormat::Tiff) => exif.apply_tiff(bytes)?,
            Ok(ImageFormat::Jpeg) => exif.apply_jpeg(bytes),
            _ => {}
        }

        exif.resolution = (exif.x_resolution == exif.y_resolution).then_some(exif.x_resolution);
        Ok(exif)
    }

    /// Serialize into the single-line tagged form consumed by downstream
    /// diff tooling. The element order is a compatibility contract and
    /// must not change; absent optional values render as `None`.
    pub fn to_xml(&self) -> String {
        let compression = self.compression.as_deref().unwrap_or("None");
        let resolution = self
            .resolution
            .map(|r| r.to_string())
            .unwrap_or_else(|| "None".to_string());
        format!(
            "<exif>\
             <width>{}</width>\
             <height>{}</height>\
             <photometricInterpretation>{}</photometricInterpretation>\
             <n_frames>{}</n_frames>\
             <compression>{}</compression>\
             <photometric_interpretation>None</photometric_interpretation>\
             <xResolution>{}</xResolution>\
             <yResolution>{}</yResolution>\
             <resolutionUnit>{}</resolutionUnit>\
             <resolution>{}</resolution>\
             </exif>",
            self.width,
            self.height,
            self.photometric_interpretation,
            self.n_frames,
            compression,
            self.x_resolution,
            self.y_resolution,
            self.resolution_unit,
            resolution,
        )
        // The second, snake_case photometric element is a slot for
        // containers declaring more than one interpretation; nothing
        // populates it yet.
    }

    fn apply_png(&mut self, bytes: &[u8]) -> ImageResult<()> {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let reader = decoder.read_info()?;
        let info = reader.info();

        match (info.color_type, info.bit_depth) {
            (png::ColorType::Grayscale, png::BitDepth::One) => {
                self.photometric_interpretation = "1".to_string();
            }
            (png::ColorType::Indexed, _) => {
                self.photometric_interpretation = "P".to_string();
            }
            _ => {}
        }

        if let Some(dims) = info.pixel_dims {
            match dims.unit {
                png::Unit::Meter => {
                    self.x_resolution = dpi_from_ppm(dims.xppu);
                    self.y_resolution = dpi_from_ppm(dims.yppu);
                    self.resolution_unit = ResolutionUnit::Inches;
                }
                png::Unit::Unspecified => {
                    self.x_resolution = dims.xppu.max(1);
                    self.y_resolution = dims.yppu.max(1);
                    self.resolution_unit = ResolutionUnit::None;
                }
            }
        }
        Ok(())
    }

    fn apply_tiff(&mut self, bytes: &[u8]) -> ImageResult<()> {
        let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes))?;

        if let Ok(colortype) = decoder.colortype() {
            self.photometric_interpretation = photometric_from_tiff(colortype).to_string();
        }

        if let Some(code) = decoder
            .find_tag(Tag::Compression)?
            .as_ref()
            .and_then(value_to_u32)
        {
            self.compression = compression_name(code).map(|name| name.to_string());
        }

        if let Some(x) = decoder
            .find_tag(Tag::XResolution)?
            .as_ref()
            .and_then(value_to_f64)
        {
            self.x_resolution = x.round() as u32;
        }
        if let Some(y) = decoder
            .find_tag(Tag::YResolution)?
            .as_ref()
            .and_then(value_to_f64)
        {
            self.y_resolution = y.round() as u32;
        }
        self.resolution_unit = match decoder
            .find_tag(Tag::ResolutionUnit)?
            .as_ref()
            .and_then(value_to_u32)
        {
            Some(3) => ResolutionUnit::Centimeters,
            Some(1) => ResolutionUnit::None,
            // TIFF defaults to inches when the tag is absent
            _ => ResolutionUnit::Inches,
        };

        let mut frames = 1u32;
        while decoder.more_images() {
            if decoder.next_image().is_err() {
                break;
            }
            frames += 1;
        }
        self.n_frames = frames;
        Ok(())
    }

    // Absence of EXIF in a JPEG is the normal case, so this never fails;
    // the defaults simply stand.
    fn apply_jpeg(&mut self, bytes: &[u8]) {
        let Ok(meta) = exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) else {
            return;
        };
        if let Some(x) = rational_field(&meta, exif::Tag::XResolution) {
            self.x_resolution = x.round() as u32;
        }
        if let Some(y) = rational_field(&meta, exif::Tag::YResolution) {
            self.y_resolution = y.round() as u32;
        }
        if let Some(unit) = short_field(&meta, exif::Tag::ResolutionUnit) {
            self.resolution_unit = match unit {
                3 => ResolutionUnit::Centimeters,
                _ => ResolutionUnit::Inches,
            };
        }
    }
}

/// Pixels-per-metre (PNG `pHYs`) to rounded dots-per-inch.
fn dpi_from_ppm(ppm: u32) -> u32 {
    ((ppm as f64) * 0.0254).round().max(1.0) as u32
}

fn photometric_from_color(color: image::ColorType) -> &'static str {
    match color {
        image::ColorType::L8 | image::ColorType::L16 => "L",
        image::ColorType::La8 | image::ColorType::La16 => "LA",
        image::ColorType::Rgb8 | image::ColorType::Rgb16 | image::ColorType::Rgb32F => "RGB",
        image::ColorType::Rgba8 | image::ColorType::Rgba16 | image::ColorType::Rgba32F => "RGBA",
        _ => UNKNOWN_PHOTOMETRIC,
    }
}

fn photometric_from_tiff(colortype: tiff::ColorType) -> &'static str {
    match colortype {
        tiff::ColorType::Gray(1) => "1",
        tiff::ColorType::Gray(_) => "L",
        tiff::ColorType::GrayA(_) => "LA",
        tiff::ColorType::RGB(_) => "RGB",
        tiff::ColorType::RGBA(_) => "RGBA",
        tiff::ColorType::CMYK(_) => "CMYK",
        tiff::ColorType::Palette(_) => "P",
        // JPEG-compressed TIFFs store YCbCr but decode to RGB
        tiff::ColorType::YCbCr(_) => "RGB",
        _ => UNKNOWN_PHOTOMETRIC,
    }
}

/// Named compression schemes by TIFF tag code.
fn compression_name(code: u32) -> Option<&'static str> {
    match code {
        1 => Some("raw"),
        2 => Some("ccitt"),
        3 => Some("group3"),
        4 => Some("group4"),
        5 => Some("lzw"),
        6 | 7 => Some("jpeg"),
        8 | 32946 => Some("deflate"),
        32773 => Some("packbits"),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Rational(n, d) if *d != 0 => Some(*n as f64 / *d as f64),
        Value::RationalBig(n, d) if *d != 0 => Some(*n as f64 / *d as f64),
        Value::SRational(n, d) if *d != 0 => Some(*n as f64 / *d as f64),
        Value::Byte(v) => Some(*v as f64),
        Value::Short(v) => Some(*v as f64),
        Value::Unsigned(v) => Some(*v as f64),
        Value::UnsignedBig(v) => Some(*v as f64),
        Value::Float(v) => Some(*v as f64),
        Value::Double(v) => Some(*v),
        Value::List(values) => values.first().and_then(value_to_f64),
        _ => None,
    }
}

fn value_to_u32(value: &Value) -> Option<u32> {
    value_to_f64(value).map(|v| v as u32)
}

fn rational_field(meta: &exif::Exif, tag: exif::Tag) -> Option<f64> {
    match &meta.get_field(tag, exif::In::PRIMARY)?.value {
        exif::Value::Rational(values) => values.first().map(|r| r.to_f64()),
        _ => None,
    }
}

fn short_field(meta: &exif::Exif, tag: exif::Tag) -> Option<u16> {
    match &meta.get_field(tag, exif::In::PRIMARY)?.value {
        exif::Value::Short(values) => values.first().copied(),
        _ => None,
    }
}
