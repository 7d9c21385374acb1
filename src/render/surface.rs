use crate::compose::scene::Scene;
use crate::export::format::{EncodedRaster, ExportFormat, encode_frame};
use crate::foundation::error::{BoothError, BoothResult};
use crate::geometry::layout::Viewport;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Parameters of a single raster export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterRequest {
    /// Output encoding.
    pub format: ExportFormat,
    /// JPEG quality in `(0, 1]`.
    pub quality: f32,
    /// Output pixels per surface pixel.
    pub pixel_ratio: f64,
}

/// Output size for a raster of the surface presented through `viewport` at `pixel_ratio`.
pub fn raster_size(viewport: Viewport, pixel_ratio: f64) -> BoothResult<(u32, u32)> {
    let w = (viewport.width * pixel_ratio).round();
    let h = (viewport.height * pixel_ratio).round();
    if !(w >= 1.0 && h >= 1.0 && w <= f64::from(u16::MAX) && h <= f64::from(u16::MAX)) {
        return Err(BoothError::render(format!(
            "raster size {w}x{h} is out of range"
        )));
    }
    Ok((w as u32, h as u32))
}

/// Drawing surface the compositor renders into.
///
/// The surface is presented through a [`Viewport`]; the viewport's scale maps template pixels to
/// surface pixels, and a raster covers the viewport's `width x height` times the pixel ratio.
pub trait CanvasSurface {
    /// Current presentation.
    fn viewport(&self) -> Viewport;

    /// Change the presentation.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Draw `scene` and encode the result.
    fn to_raster(&mut self, scene: &Scene, request: RasterRequest) -> BoothResult<EncodedRaster>;
}

impl<S: CanvasSurface + ?Sized> CanvasSurface for Box<S> {
    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        (**self).set_viewport(viewport);
    }

    fn to_raster(&mut self, scene: &Scene, request: RasterRequest) -> BoothResult<EncodedRaster> {
        (**self).to_raster(scene, request)
    }
}

/// One call observed by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct RasterCall {
    /// Viewport in effect while rasterizing.
    pub viewport: Viewport,
    /// Request parameters.
    pub request: RasterRequest,
    /// Number of image leaves in the scene.
    pub images: usize,
    /// Text leaves in the scene, in paint order.
    pub texts: Vec<String>,
}

/// Surface double that records every raster request and encodes a blank frame of the right size.
#[derive(Debug)]
pub struct RecordingSurface {
    viewport: Viewport,
    calls: Vec<RasterCall>,
    viewport_changes: usize,
}

impl RecordingSurface {
    /// Start presented through `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            calls: Vec::new(),
            viewport_changes: 0,
        }
    }

    /// Raster calls in order.
    pub fn calls(&self) -> &[RasterCall] {
        &self.calls
    }

    /// Number of `set_viewport` calls.
    pub fn viewport_changes(&self) -> usize {
        self.viewport_changes
    }
}

impl CanvasSurface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.viewport_changes += 1;
    }

    fn to_raster(&mut self, scene: &Scene, request: RasterRequest) -> BoothResult<EncodedRaster> {
        let (width, height) = raster_size(self.viewport, request.pixel_ratio)?;
        self.calls.push(RasterCall {
            viewport: self.viewport,
            request,
            images: scene.image_count(),
            texts: scene.texts().into_iter().map(|(t, _)| t).collect(),
        });
        let frame = FrameRGBA {
            width,
            height,
            data: vec![255; width as usize * height as usize * 4],
            premultiplied: true,
        };
        encode_frame(&frame, request.format, request.quality)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
