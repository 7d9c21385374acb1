use std::io::Cursor;

use anyhow::Context;

use crate::assets::decode::{DecodedImage, unpremultiply_rgba8_in_place};
use crate::catalog::filters::{CaptureFilter, FilterFn, parse_filter_style};
use crate::foundation::error::BoothResult;

/// Apply a row-major 4x5 color matrix to premultiplied RGBA8 pixels.
pub(crate) fn color_matrix_rgba8_premul(src: &[u8], dst: &mut [u8], m: [f32; 20]) {
    debug_assert_eq!(src.len(), dst.len());
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let pr = s[0] as f32 / 255.0;
        let pg = s[1] as f32 / 255.0;
        let pb = s[2] as f32 / 255.0;
        let pa = s[3] as f32 / 255.0;

        // Convert premul -> straight for matrix application.
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = pr * inv_a;
        let g = pg * inv_a;
        let b = pb * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        d[0] = (out_r * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[1] = (out_g * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[2] = (out_b * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Apply filter functions in order, clamping between steps.
pub fn apply_filter_fns(rgba8_premul: &mut [u8], fns: &[FilterFn]) {
    if fns.is_empty() {
        return;
    }
    let mut scratch = rgba8_premul.to_vec();
    for f in fns {
        color_matrix_rgba8_premul(&scratch, rgba8_premul, f.matrix());
        scratch.copy_from_slice(rgba8_premul);
    }
}

/// Return a copy of `image` with `filter` applied. The source is never modified.
pub fn filtered_copy(image: &DecodedImage, filter: &CaptureFilter) -> BoothResult<DecodedImage> {
    let fns = parse_filter_style(filter.style)?;
    let mut px = image.rgba8_premul.as_ref().clone();
    apply_filter_fns(&mut px, &fns);
    DecodedImage::from_premul(image.width, image.height, px)
}

/// Build the styled preview shown for the live feed and the review strip: the raw still with
/// the filter applied and, when `mirror` is set, flipped horizontally.
pub fn styled_preview(
    image: &DecodedImage,
    filter: &CaptureFilter,
    mirror: bool,
) -> BoothResult<DecodedImage> {
    let filtered = filtered_copy(image, filter)?;
    if !mirror {
        return Ok(filtered);
    }
    let w = filtered.width as usize;
    let mut px = filtered.rgba8_premul.as_ref().clone();
    for row in px.chunks_exact_mut(w * 4) {
        for x in 0..w / 2 {
            let (a, b) = (x * 4, (w - 1 - x) * 4);
            for c in 0..4 {
                row.swap(a + c, b + c);
            }
        }
    }
    DecodedImage::from_premul(filtered.width, filtered.height, px)
}

/// Encode a decoded image as PNG (straight alpha).
pub fn encode_png(image: &DecodedImage) -> BoothResult<Vec<u8>> {
    let mut straight = image.rgba8_premul.as_ref().clone();
    unpremultiply_rgba8_in_place(&mut straight);
    let buf = image::RgbaImage::from_raw(image.width, image.height, straight)
        .context("wrap rgba buffer")?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(buf)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
