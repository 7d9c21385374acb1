//! Theme catalog. Each theme is plain data: colors, a clip shape, and optional background and
//! frame decoration layers interpreted by the compositor.

use crate::foundation::core::Rgba8;
use crate::geometry::clip::ClipShape;

/// Closed set of built-in themes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    /// Simple White.
    #[default]
    Simple,
    /// Pixel Heart.
    PixelHeart,
    /// Super Star.
    StarCut,
    /// Postage Stamp.
    Stamp,
    /// Kawaii Pink.
    Kawaii,
    /// Cute Fish.
    Fish,
    /// Beach Day.
    Beach,
    /// Starry Night.
    Starry,
    /// Anime Pop.
    Anime,
    /// Soft Clouds.
    Cloud,
}

impl ThemeId {
    /// All themes in picker order.
    pub const ALL: [ThemeId; 10] = [
        ThemeId::Simple,
        ThemeId::PixelHeart,
        ThemeId::StarCut,
        ThemeId::Stamp,
        ThemeId::Kawaii,
        ThemeId::Fish,
        ThemeId::Beach,
        ThemeId::Starry,
        ThemeId::Anime,
        ThemeId::Cloud,
    ];

    /// Catalog entry for this id.
    pub fn theme(self) -> &'static Theme {
        &THEMES[self as usize]
    }

    /// Stable string id.
    pub fn as_str(self) -> &'static str {
        self.theme().id
    }

    /// Parse a stable string id.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }
}

/// One background layer, drawn over the theme fill color in order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundLayer {
    /// Full-canvas solid fill.
    Fill(Rgba8),
    /// Full-canvas top-to-bottom linear gradient.
    VerticalGradient {
        /// Color at the top edge.
        top: Rgba8,
        /// Color at the bottom edge.
        bottom: Rgba8,
    },
    /// Full-width horizontal band, positioned as fractions of the canvas height.
    Band {
        /// Band top as a fraction of height.
        y_frac: f64,
        /// Band height as a fraction of height.
        h_frac: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// Thin full-width horizontal rules every `spacing` pixels.
    Stripes {
        /// Number of rules.
        count: u32,
        /// Distance between rules.
        spacing: f64,
        /// Rule thickness.
        thickness: f64,
        /// Rule color.
        color: Rgba8,
        /// Layer opacity.
        opacity: f32,
    },
    /// Seeded glyph scatter, stable for one edit session.
    Scatter(ScatterSpec),
}

/// Parameters for a seeded glyph scatter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterSpec {
    /// Number of glyphs.
    pub count: u32,
    /// Glyph pool; each glyph picks one uniformly.
    pub items: &'static [&'static str],
    /// Layer opacity.
    pub opacity: f32,
    /// Per-glyph scale is uniform in `[scale_min, scale_max)`.
    pub scale_min: f64,
    /// Upper scale bound.
    pub scale_max: f64,
}

const fn scatter(count: u32, items: &'static [&'static str], opacity: f32) -> BackgroundLayer {
    BackgroundLayer::Scatter(ScatterSpec {
        count,
        items,
        opacity,
        scale_min: 0.8,
        scale_max: 1.2,
    })
}

/// Point in slot-local space: `(fx * w + dx, fy * h + dy)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotAnchor {
    /// Horizontal fraction of slot width.
    pub fx: f64,
    /// Horizontal pixel offset.
    pub dx: f64,
    /// Vertical fraction of slot height.
    pub fy: f64,
    /// Vertical pixel offset.
    pub dy: f64,
}

impl SlotAnchor {
    const fn at(fx: f64, dx: f64, fy: f64, dy: f64) -> Self {
        Self { fx, dx, fy, dy }
    }

    /// Resolve against a `w x h` slot.
    pub fn resolve(self, w: f64, h: f64) -> (f64, f64) {
        (self.fx * w + self.dx, self.fy * h + self.dy)
    }
}

/// One frame ornament, drawn in slot-local space on top of each photo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOrnament {
    /// Stroke the theme's clip outline.
    ClipOutline {
        /// Stroke color.
        color: Rgba8,
        /// Stroke width.
        width: f64,
    },
    /// Stroke a rounded rectangle grown by `outset` on every side.
    Border {
        /// Outward growth in pixels (may be zero).
        outset: f64,
        /// Corner radius.
        corner_radius: f64,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width.
        width: f64,
        /// Optional `(dash, gap)` pattern.
        dash: Option<(f64, f64)>,
        /// Optional soft glow color drawn under the stroke.
        glow: Option<Rgba8>,
    },
    /// A glyph centered on an anchor.
    Emoji {
        /// Glyph text.
        symbol: &'static str,
        /// Center point.
        anchor: SlotAnchor,
        /// Font size.
        size: f64,
        /// Rotation in degrees.
        rotation: f64,
    },
    /// Three white circles forming a cloud.
    Cloud {
        /// Cloud center.
        anchor: SlotAnchor,
        /// Uniform scale.
        scale: f64,
    },
}

const fn border(corner_radius: f64, color: Rgba8, width: f64) -> FrameOrnament {
    FrameOrnament::Border {
        outset: 0.0,
        corner_radius,
        color,
        width,
        dash: None,
        glow: None,
    }
}

const fn emoji(symbol: &'static str, anchor: SlotAnchor, size: f64, rotation: f64) -> FrameOrnament {
    FrameOrnament::Emoji {
        symbol,
        anchor,
        size,
        rotation,
    }
}

/// Visual theme applied by the compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Stable id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Canvas fill color.
    pub background: Rgba8,
    /// Caption color.
    pub text_color: Rgba8,
    /// Photo clip shape.
    pub clip: ClipShape,
    /// Background decoration layers.
    pub background_layers: &'static [BackgroundLayer],
    /// Per-slot frame ornaments.
    pub frame: &'static [FrameOrnament],
}

/// Built-in themes, indexed by [`ThemeId`].
pub static THEMES: [Theme; 10] = [
    Theme {
        id: "simple",
        name: "Simple White",
        background: Rgba8::hex(0xFFFFFF),
        text_color: Rgba8::hex(0xAAAAAA),
        clip: ClipShape::Rounded { radius: 2.0 },
        background_layers: &[],
        frame: &[border(2.0, Rgba8::hex(0xEEEEEE), 2.0)],
    },
    Theme {
        id: "pixel-heart",
        name: "Pixel Heart",
        background: Rgba8::hex(0xFFEBEE),
        text_color: Rgba8::hex(0xD32F2F),
        clip: ClipShape::PixelHeart,
        background_layers: &[
            BackgroundLayer::Stripes {
                count: 25,
                spacing: 30.0,
                thickness: 1.0,
                color: Rgba8::hex(0xFFCDD2),
                opacity: 0.5,
            },
            scatter(10, &["❤️", "👾", "✨"], 0.4),
        ],
        frame: &[FrameOrnament::ClipOutline {
            color: Rgba8::hex(0xD32F2F),
            width: 4.0,
        }],
    },
    Theme {
        id: "star-cut",
        name: "Super Star",
        background: Rgba8::hex(0xFFF8E1),
        text_color: Rgba8::hex(0xFF8F00),
        clip: ClipShape::Star,
        background_layers: &[scatter(15, &["✨", "⭐", "💫"], 0.5)],
        frame: &[FrameOrnament::ClipOutline {
            color: Rgba8::hex(0xFF8F00),
            width: 5.0,
        }],
    },
    Theme {
        id: "stamp",
        name: "Postage Stamp",
        background: Rgba8::hex(0xE0F2F1),
        text_color: Rgba8::hex(0x00695C),
        clip: ClipShape::Stamp,
        background_layers: &[scatter(15, &["💌", "🕊️", "🌿"], 0.3)],
        frame: &[FrameOrnament::ClipOutline {
            color: Rgba8::hex(0x009688),
            width: 3.0,
        }],
    },
    Theme {
        id: "kawaii",
        name: "Kawaii Pink",
        background: Rgba8::hex(0xFFF0F5),
        text_color: Rgba8::hex(0xFFB7B2),
        clip: ClipShape::Rounded { radius: 18.0 },
        background_layers: &[
            BackgroundLayer::Scatter(ScatterSpec {
                count: 50,
                items: &["•"],
                opacity: 0.3,
                scale_min: 0.5,
                scale_max: 1.5,
            }),
            scatter(8, &["🎀", "🍭", "✨"], 0.6),
        ],
        frame: &[FrameOrnament::Border {
            outset: 0.0,
            corner_radius: 20.0,
            color: Rgba8::hex(0xFFB7B2),
            width: 5.0,
            dash: Some((12.0, 10.0)),
            glow: None,
        }],
    },
    Theme {
        id: "fish",
        name: "Cute Fish",
        background: Rgba8::hex(0xE0F7FA),
        text_color: Rgba8::hex(0x006064),
        clip: ClipShape::Rounded { radius: 25.0 },
        background_layers: &[
            BackgroundLayer::VerticalGradient {
                top: Rgba8::hex(0xE0F7FA),
                bottom: Rgba8::hex(0xB2EBF2),
            },
            scatter(15, &["🫧", "🐟", "🐠", "🐙"], 0.5),
        ],
        frame: &[
            border(25.0, Rgba8::hex(0x4DD0E1), 8.0),
            emoji("🐡", SlotAnchor::at(1.0, -15.0, 0.0, 15.0), 30.0, -10.0),
            emoji("🦀", SlotAnchor::at(0.0, 20.0, 1.0, -20.0), 25.0, 10.0),
        ],
    },
    Theme {
        id: "beach",
        name: "Beach Day",
        background: Rgba8::hex(0xFFF3E0),
        text_color: Rgba8::hex(0xF57F17),
        clip: ClipShape::Rounded { radius: 20.0 },
        background_layers: &[
            BackgroundLayer::Fill(Rgba8::hex(0xE1F5FE)),
            BackgroundLayer::Band {
                y_frac: 0.7,
                h_frac: 0.3,
                color: Rgba8::hex(0xFFF9C4),
            },
            scatter(12, &["☀️", "🌴", "🐚", "🌊"], 0.4),
        ],
        frame: &[
            border(20.0, Rgba8::hex(0xFFCC80), 6.0),
            emoji("🍉", SlotAnchor::at(0.0, 0.0, 1.0, 0.0), 40.0, 0.0),
            emoji("🍹", SlotAnchor::at(1.0, 0.0, 0.0, 0.0), 35.0, 0.0),
        ],
    },
    Theme {
        id: "starry",
        name: "Starry Night",
        background: Rgba8::hex(0x0D47A1),
        text_color: Rgba8::hex(0xFFF176),
        clip: ClipShape::Rounded { radius: 15.0 },
        background_layers: &[
            BackgroundLayer::Fill(Rgba8::hex(0x0F172A)),
            BackgroundLayer::Scatter(ScatterSpec {
                count: 30,
                items: &[".", "✨", "⭐"],
                opacity: 0.7,
                scale_min: 0.5,
                scale_max: 1.2,
            }),
        ],
        frame: &[
            FrameOrnament::Border {
                outset: 0.0,
                corner_radius: 15.0,
                color: Rgba8::hex(0xFDD835),
                width: 3.0,
                dash: None,
                glow: Some(Rgba8::hex(0xFDD835)),
            },
            emoji("🌙", SlotAnchor::at(0.0, 30.0, 0.0, 30.0), 35.0, -15.0),
            emoji("🪐", SlotAnchor::at(1.0, -20.0, 1.0, -20.0), 30.0, 15.0),
        ],
    },
    Theme {
        id: "anime",
        name: "Anime Pop",
        background: Rgba8::hex(0xF3E5F5),
        text_color: Rgba8::hex(0xAB47BC),
        clip: ClipShape::Rounded { radius: 10.0 },
        background_layers: &[
            BackgroundLayer::Fill(Rgba8::hex(0xF3E5F5)),
            scatter(20, &["🌸", "💮", "✨"], 0.6),
        ],
        frame: &[
            border(10.0, Rgba8::hex(0xAB47BC), 4.0),
            emoji("🍥", SlotAnchor::at(0.0, 0.0, 0.0, 0.0), 35.0, 0.0),
            emoji("🍡", SlotAnchor::at(1.0, 0.0, 1.0, 0.0), 35.0, 0.0),
        ],
    },
    Theme {
        id: "cloud",
        name: "Soft Clouds",
        background: Rgba8::hex(0xE3F2FD),
        text_color: Rgba8::hex(0x1976D2),
        clip: ClipShape::Rounded { radius: 25.0 },
        background_layers: &[],
        frame: &[
            FrameOrnament::Border {
                outset: 5.0,
                corner_radius: 30.0,
                color: Rgba8::hex(0xBBDEFB),
                width: 5.0,
                dash: None,
                glow: None,
            },
            border(25.0, Rgba8::WHITE, 5.0),
            FrameOrnament::Cloud {
                anchor: SlotAnchor::at(0.0, -10.0, 0.0, -10.0),
                scale: 0.8,
            },
            FrameOrnament::Cloud {
                anchor: SlotAnchor::at(1.0, 10.0, 1.0, 10.0),
                scale: 1.0,
            },
            FrameOrnament::Cloud {
                anchor: SlotAnchor::at(1.0, 0.0, 0.0, -15.0),
                scale: 0.6,
            },
            FrameOrnament::Cloud {
                anchor: SlotAnchor::at(0.0, -15.0, 1.0, 0.0),
                scale: 0.7,
            },
        ],
    },
];

/// Sticker palette offered by the editor, grouped loosely by theme.
pub static EMOJI_PALETTE: &[&str] = &[
    "🤍", "🕊️", "✨", "🩷", "💜", "💙", "❤️", "🖤", "🎮", "🕹️", "👾", "⭐", "◻️", "◼️", "🌟", "💫",
    "🌈", "🎤", "🎶", "🎉", "💛", "💌", "✉️", "🌷", "🕰️", "📜", "🖋️", "🤎", "🎀", "💗", "🌸",
    "🍓", "🧸", "🐰", "🍬", "💞", "🐠", "🐟", "🫧", "🌊", "🐚", "🪸", "🩵", "🏖️", "🌞", "🌴",
    "🕶️", "🍹", "🩴", "🌌", "🌙", "☄️", "🪐", "🌠", "🎧", "💥", "💖", "🐱", "🍡", "☁️", "🌥️",
    "💭", "✧", "☾", "𓂃", "𓈒𓏸", "❀", "✿",
];

#[cfg(test)]
#[path = "../../tests/unit/catalog/themes.rs"]
mod tests;
