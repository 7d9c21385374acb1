//! Theme decoration: background layers, seeded glyph scatter, and per-slot frame ornaments.

use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape;

use crate::catalog::themes::{BackgroundLayer, FrameOrnament, ScatterSpec, Theme};
use crate::compose::scene::{Node, Paint, StrokeStyle, TextAnchor};
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8, Vec2};
use crate::foundation::math::{Fnv1a64, SplitMix64};

const FLATTEN_TOLERANCE: f64 = 0.1;
const SCATTER_FONT_SIZE: f64 = 24.0;
const SCATTER_MAX_TILT_DEG: f64 = 30.0;
const GLOW_EXTRA_WIDTH: f64 = 8.0;
const GLOW_ALPHA: u8 = 0x66;

/// One scattered glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Center x in canvas space.
    pub x: f64,
    /// Center y in canvas space.
    pub y: f64,
    /// Tilt in degrees, within +-30.
    pub rotation: f64,
    /// Position in the layer's scale range, in `[0, 1)`.
    pub scale_t: f64,
    /// Chosen glyph.
    pub symbol: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ScatterKey {
    width_bits: u64,
    height_bits: u64,
    count: u32,
    items: u64,
}

impl ScatterKey {
    fn new(width: f64, height: f64, spec: &ScatterSpec) -> Self {
        let mut h = Fnv1a64::new_default();
        for item in spec.items {
            h.write_str(item);
        }
        Self {
            width_bits: width.to_bits(),
            height_bits: height.to_bits(),
            count: spec.count,
            items: h.finish(),
        }
    }

    fn stream_seed(&self, session_seed: u64) -> u64 {
        let mut h = Fnv1a64::new(session_seed ^ Fnv1a64::OFFSET_BASIS);
        h.write_u64(self.width_bits);
        h.write_u64(self.height_bits);
        h.write_u64(u64::from(self.count));
        h.write_u64(self.items);
        h.finish()
    }
}

/// Memoized glyph scatters for one edit session.
///
/// A scatter is generated once per (dimensions, count, item set) and reused on every rebuild.
/// Sessions with different seeds produce different layouts.
#[derive(Debug)]
pub struct DecorationCache {
    seed: u64,
    scatters: HashMap<ScatterKey, Arc<[Particle]>>,
}

impl DecorationCache {
    /// Empty cache keyed to `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            scatters: HashMap::new(),
        }
    }

    /// Session seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of memoized scatters.
    pub fn len(&self) -> usize {
        self.scatters.len()
    }

    /// `true` when nothing has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.scatters.is_empty()
    }

    /// Particles for a scatter over a `width x height` area.
    pub fn scatter(&mut self, width: f64, height: f64, spec: &ScatterSpec) -> Arc<[Particle]> {
        let key = ScatterKey::new(width, height, spec);
        let seed = self.seed;
        Arc::clone(
            self.scatters
                .entry(key)
                .or_insert_with(|| generate(&key, seed, width, height, spec)),
        )
    }
}

fn generate(key: &ScatterKey, seed: u64, width: f64, height: f64, spec: &ScatterSpec) -> Arc<[Particle]> {
    if spec.items.is_empty() {
        return Arc::from(Vec::new());
    }
    let mut rng = SplitMix64::new(key.stream_seed(seed));
    (0..spec.count)
        .map(|_| Particle {
            x: rng.next_f64() * width,
            y: rng.next_f64() * height,
            rotation: rng.next_f64() * 2.0 * SCATTER_MAX_TILT_DEG - SCATTER_MAX_TILT_DEG,
            scale_t: rng.next_f64(),
            symbol: spec.items[rng.next_index(spec.items.len())],
        })
        .collect()
}

/// Canvas fill plus every background layer of `theme`.
pub fn background_nodes(theme: &Theme, canvas: Canvas, cache: &mut DecorationCache) -> Vec<Node> {
    let full = canvas.rect();
    let (w, h) = (full.width(), full.height());

    let mut nodes = vec![Node::rect(full, theme.background)];
    for layer in theme.background_layers {
        match *layer {
            BackgroundLayer::Fill(color) => nodes.push(Node::rect(full, color)),
            BackgroundLayer::VerticalGradient { top, bottom } => nodes.push(Node::Fill {
                path: full.to_path(FLATTEN_TOLERANCE),
                transform: Affine::IDENTITY,
                paint: Paint::VerticalGradient { top, bottom },
            }),
            BackgroundLayer::Band {
                y_frac,
                h_frac,
                color,
            } => {
                let y0 = h * y_frac;
                nodes.push(Node::rect(Rect::new(0.0, y0, w, y0 + h * h_frac), color));
            }
            BackgroundLayer::Stripes {
                count,
                spacing,
                thickness,
                color,
                opacity,
            } => {
                let rules = (0..count)
                    .map(|i| {
                        let y = f64::from(i) * spacing;
                        Node::rect(Rect::new(0.0, y, w, y + thickness), color)
                    })
                    .collect();
                nodes.push(Node::group(opacity, rules));
            }
            BackgroundLayer::Scatter(spec) => {
                let particles = cache.scatter(w, h, &spec);
                nodes.push(Node::group(spec.opacity, scatter_nodes(&particles, &spec)));
            }
        }
    }
    nodes
}

fn scatter_nodes(particles: &[Particle], spec: &ScatterSpec) -> Vec<Node> {
    particles
        .iter()
        .map(|p| {
            let scale = spec.scale_min + p.scale_t * (spec.scale_max - spec.scale_min);
            Node::Text {
                text: p.symbol.to_string(),
                transform: Affine::translate(Vec2::new(p.x, p.y))
                    * Affine::rotate(p.rotation.to_radians())
                    * Affine::scale(scale),
                size: SCATTER_FONT_SIZE,
                color: Rgba8::hex(0x000000),
                anchor: TextAnchor::Center,
            }
        })
        .collect()
}

/// Frame ornaments for one `w x h` slot, in slot-local space.
pub fn frame_nodes(theme: &Theme, w: f64, h: f64) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(theme.frame.len());
    for ornament in theme.frame {
        match *ornament {
            FrameOrnament::ClipOutline { color, width } => nodes.push(Node::Stroke {
                path: theme.clip.path(w, h),
                transform: Affine::IDENTITY,
                style: StrokeStyle {
                    color,
                    width,
                    dash: None,
                },
            }),
            FrameOrnament::Border {
                outset,
                corner_radius,
                color,
                width,
                dash,
                glow,
            } => {
                let path = kurbo::RoundedRect::new(-outset, -outset, w + outset, h + outset, corner_radius)
                    .to_path(FLATTEN_TOLERANCE);
                if let Some(glow) = glow {
                    nodes.push(Node::Stroke {
                        path: path.clone(),
                        transform: Affine::IDENTITY,
                        style: StrokeStyle {
                            color: glow.with_alpha(GLOW_ALPHA),
                            width: width + GLOW_EXTRA_WIDTH,
                            dash: None,
                        },
                    });
                }
                nodes.push(Node::Stroke {
                    path,
                    transform: Affine::IDENTITY,
                    style: StrokeStyle { color, width, dash },
                });
            }
            FrameOrnament::Emoji {
                symbol,
                anchor,
                size,
                rotation,
            } => {
                let (x, y) = anchor.resolve(w, h);
                nodes.push(Node::Text {
                    text: symbol.to_string(),
                    transform: Affine::translate(Vec2::new(x, y))
                        * Affine::rotate(rotation.to_radians()),
                    size,
                    color: Rgba8::hex(0x000000),
                    anchor: TextAnchor::Center,
                });
            }
            FrameOrnament::Cloud { anchor, scale } => {
                let (x, y) = anchor.resolve(w, h);
                nodes.push(Node::placed(
                    Affine::translate(Vec2::new(x, y)) * Affine::scale(scale),
                    cloud_puffs(),
                ));
            }
        }
    }
    nodes
}

fn cloud_puffs() -> Vec<Node> {
    [(0.0, 0.0, 25.0), (-20.0, 10.0, 18.0), (20.0, 10.0, 18.0)]
        .into_iter()
        .map(|(cx, cy, r)| Node::Fill {
            path: kurbo::Circle::new((cx, cy), r).to_path(FLATTEN_TOLERANCE),
            transform: Affine::IDENTITY,
            paint: Paint::Solid(Rgba8::WHITE),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/decor.rs"]
mod tests;
