//! CPU canvas surface backed by `vello_cpu`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::DecodedImage;
use crate::compose::scene::{Node, Paint, Scene, StrokeStyle, TextAnchor};
use crate::export::format::{EncodedRaster, encode_frame};
use crate::foundation::core::{Affine, BezPath, Point, Rgba8, Vec2};
use crate::foundation::error::{BoothError, BoothResult};
use crate::geometry::layout::{Crop, Viewport};
use crate::render::surface::{CanvasSurface, FrameRGBA, RasterRequest, raster_size};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine};

const STROKE_TOLERANCE: f64 = 0.1;
const GRADIENT_STEPS: u32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    top: [u8; 4],
    bottom: [u8; 4],
}

/// Rasterizes scenes on the CPU.
///
/// Text needs a font; without one, text nodes are skipped.
pub struct CpuSurface {
    viewport: Viewport,
    text: Option<TextLayoutEngine>,
    image_cache: HashMap<u64, vello_cpu::Image>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

impl CpuSurface {
    /// Surface presented through `viewport`, without a font.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            text: None,
            image_cache: HashMap::new(),
            gradient_cache: HashMap::new(),
        }
    }

    /// Use `font_bytes` for captions and stickers.
    pub fn with_font_bytes(mut self, font_bytes: Vec<u8>) -> BoothResult<Self> {
        self.text = Some(TextLayoutEngine::from_font_bytes(font_bytes)?);
        Ok(self)
    }

    /// Load the caption/sticker font from disk.
    pub fn with_font_file(self, path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.with_font_bytes(bytes)
    }

    /// `true` if text nodes will be drawn.
    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// Draw `scene` into a `width x height` frame with template space scaled by `scale`.
    #[tracing::instrument(skip(self, scene), fields(nodes = scene.nodes.len()))]
    pub fn rasterize(&mut self, scene: &Scene, scale: f64, width: u32, height: u32) -> BoothResult<FrameRGBA> {
        let w: u16 = width
            .try_into()
            .map_err(|_| BoothError::render("raster width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| BoothError::render("raster height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let root = Affine::scale(scale);
        for node in &scene.nodes {
            self.draw_node(&mut ctx, node, root)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_node(&mut self, ctx: &mut vello_cpu::RenderContext, node: &Node, parent: Affine) -> BoothResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match node {
            Node::Group {
                transform,
                opacity,
                children,
            } => {
                if *opacity <= 0.0 {
                    return Ok(());
                }
                let layered = *opacity < 1.0;
                if layered {
                    ctx.push_opacity_layer(*opacity);
                }
                let tr = parent * *transform;
                for child in children {
                    self.draw_node(ctx, child, tr)?;
                }
                if layered {
                    ctx.pop_layer();
                }
                Ok(())
            }
            Node::Fill {
                path,
                transform,
                paint,
            } => {
                ctx.set_transform(affine_to_cpu(parent * *transform));
                match *paint {
                    Paint::Solid(c) => ctx.set_paint(color_to_cpu(c)),
                    Paint::VerticalGradient { top, bottom } => {
                        let bbox = kurbo::Shape::bounding_box(path);
                        let img = self.gradient_paint(top, bottom)?;
                        ctx.set_paint(img);
                        ctx.set_paint_transform(affine_to_cpu(
                            Affine::translate(Vec2::new(bbox.x0, bbox.y0))
                                * Affine::scale_non_uniform(
                                    bbox.width(),
                                    bbox.height() / f64::from(GRADIENT_STEPS),
                                ),
                        ));
                    }
                }
                ctx.fill_path(&bezpath_to_cpu(path));
                Ok(())
            }
            Node::Stroke {
                path,
                transform,
                style,
            } => {
                ctx.set_transform(affine_to_cpu(parent * *transform));
                ctx.set_paint(color_to_cpu(style.color));
                ctx.fill_path(&bezpath_to_cpu(&stroke_outline(path, style)));
                Ok(())
            }
            Node::Text {
                text,
                transform,
                size,
                color,
                anchor,
            } => self.draw_text(ctx, text, parent * *transform, *size, *color, *anchor),
            Node::Image {
                image,
                transform,
                crop,
                width,
                height,
                mirror,
                clip,
            } => {
                let paint = self.image_paint_for(image)?;
                ctx.set_transform(affine_to_cpu(parent * *transform));
                ctx.set_paint(paint);
                ctx.set_paint_transform(affine_to_cpu(crop_paint_transform(*crop, *width, *height, *mirror)));
                ctx.fill_path(&bezpath_to_cpu(clip));
                Ok(())
            }
        }
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        transform: Affine,
        size: f64,
        color: Rgba8,
        anchor: TextAnchor,
    ) -> BoothResult<()> {
        let Some(engine) = self.text.as_mut() else {
            tracing::debug!(text, "no font configured; skipping text node");
            return Ok(());
        };

        let layout = engine.layout_line(text, size as f32, TextBrushRgba8::from(color))?;
        let (lw, lh) = (f64::from(layout.width()), f64::from(layout.height()));
        let offset = match anchor {
            TextAnchor::TopLeft => Vec2::ZERO,
            TextAnchor::TopCenter => Vec2::new(-lw / 2.0, 0.0),
            TextAnchor::Center => Vec2::new(-lw / 2.0, -lh / 2.0),
        };
        ctx.set_transform(affine_to_cpu(transform * Affine::translate(offset)));

        let font = engine.font();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn image_paint_for(&mut self, image: &Arc<DecodedImage>) -> BoothResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&image.key) {
            return Ok(paint.clone());
        }
        let paint = premul_to_image(image.rgba8_premul.as_slice(), image.width, image.height)?;
        self.image_cache.insert(image.key, paint.clone());
        Ok(paint)
    }

    fn gradient_paint(&mut self, top: Rgba8, bottom: Rgba8) -> BoothResult<vello_cpu::Image> {
        let key = GradientKey {
            top: top.premul(),
            bottom: bottom.premul(),
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let h1 = (GRADIENT_STEPS - 1) as f32;
        let mut bytes = Vec::with_capacity(GRADIENT_STEPS as usize * 4);
        for y in 0..GRADIENT_STEPS {
            let t = y as f32 / h1;
            for c in 0..4 {
                let a = f32::from(key.top[c]);
                let b = f32::from(key.bottom[c]);
                bytes.push((a + (b - a) * t).round().clamp(0.0, 255.0) as u8);
            }
        }
        let img = premul_to_image(&bytes, 1, GRADIENT_STEPS)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }
}

impl CanvasSurface for CpuSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn to_raster(&mut self, scene: &Scene, request: RasterRequest) -> BoothResult<EncodedRaster> {
        let (width, height) = raster_size(self.viewport, request.pixel_ratio)?;
        let frame = self.rasterize(scene, self.viewport.scale * request.pixel_ratio, width, height)?;
        encode_frame(&frame, request.format, request.quality)
    }
}

/// Maps source pixels of `crop` onto a `width x height` box, optionally flipped horizontally.
fn crop_paint_transform(crop: Crop, width: f64, height: f64, mirror: bool) -> Affine {
    let flip = if mirror {
        Affine::new([-1.0, 0.0, 0.0, 1.0, width, 0.0])
    } else {
        Affine::IDENTITY
    };
    flip * Affine::scale_non_uniform(width / crop.width, height / crop.height)
        * Affine::translate(Vec2::new(-crop.x, -crop.y))
}

fn stroke_outline(path: &BezPath, style: &StrokeStyle) -> BezPath {
    let mut stroke = kurbo::Stroke::new(style.width);
    if let Some((dash, gap)) = style.dash {
        stroke = stroke.with_dashes(0.0, [dash, gap]);
    }
    kurbo::stroke(path.iter(), &stroke, &kurbo::StrokeOpts::default(), STROKE_TOLERANCE)
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_to_image(rgba8_premul: &[u8], width: u32, height: u32) -> BoothResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BoothError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BoothError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(BoothError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
