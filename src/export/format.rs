use std::io::Cursor;
use std::str::FromStr;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::error::{BoothError, BoothResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::surface::FrameRGBA;

/// Stem of every exported file name.
pub const EXPORT_FILE_STEM: &str = "kawaii-booth";

/// Output encoding chosen by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// Lossy JPEG, flattened over white.
    Jpg,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn ext(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }

    /// MIME type used in data URIs.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
        }
    }

    /// `kawaii-booth.<ext>`.
    pub fn file_name(self) -> String {
        format!("{EXPORT_FILE_STEM}.{}", self.ext())
    }
}

impl FromStr for ExportFormat {
    type Err = BoothError;

    fn from_str(s: &str) -> BoothResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            other => Err(BoothError::validation(format!(
                "unknown export format '{other}' (expected png or jpg)"
            ))),
        }
    }
}

/// How the composite is rasterized on export.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Output encoding.
    pub format: ExportFormat,
    /// JPEG quality in `(0, 1]`. Ignored for PNG.
    pub jpeg_quality: f32,
    /// Output pixels per template pixel.
    pub pixel_ratio: f64,
    /// Apply the capture filter's color matrix to each photo before compositing.
    pub bake_filter: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            jpeg_quality: 0.95,
            pixel_ratio: 2.0,
            bake_filter: false,
        }
    }
}

impl ExportSettings {
    /// Reject ratios and qualities the encoders cannot honor.
    pub fn validate(&self) -> BoothResult<()> {
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(BoothError::validation(
                "export pixel_ratio must be finite and > 0",
            ));
        }
        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            return Err(BoothError::validation(
                "export jpeg_quality must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// An encoded export raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedRaster {
    /// Encoding.
    pub format: ExportFormat,
    /// Width in output pixels.
    pub width: u32,
    /// Height in output pixels.
    pub height: u32,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

impl EncodedRaster {
    /// `data:<mime>;base64,<payload>`.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

/// Encode a rendered frame. `quality` only applies to JPEG.
pub fn encode_frame(frame: &FrameRGBA, format: ExportFormat, quality: f32) -> BoothResult<EncodedRaster> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(BoothError::export(format!(
            "frame buffer of {} bytes does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut out = Vec::new();
    match format {
        ExportFormat::Png => {
            let mut straight = frame.data.clone();
            if frame.premultiplied {
                unpremultiply_rgba8_in_place(&mut straight);
            }
            let img = image::RgbaImage::from_raw(frame.width, frame.height, straight)
                .context("wrap rgba frame")?;
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
                .context("encode png")?;
        }
        ExportFormat::Jpg => {
            let rgb = flatten_over_white_rgb8(&frame.data, frame.premultiplied);
            let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, q)
                .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
                .context("encode jpeg")?;
        }
    }

    Ok(EncodedRaster {
        format,
        width: frame.width,
        height: frame.height,
        bytes: out,
    })
}

fn flatten_over_white_rgb8(src: &[u8], premultiplied: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len() / 4 * 3);
    for px in src.chunks_exact(4) {
        let a = u16::from(px[3]);
        let inv = 255 - a;
        for &c in &px[..3] {
            let c = u16::from(c);
            let fg = if premultiplied { c } else { mul_div255_u16(c, a) };
            out.push((fg + inv).min(255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/format.rs"]
mod tests;
