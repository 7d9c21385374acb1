//! Kawaii Booth is a photobooth core: a timed multi-shot capture sequencer and a themed collage
//! compositor with PNG/JPEG export.
//!
//! The flow mirrors the three booth screens:
//!
//! - Pick a [`Template`] through the [`PhaseController`]
//! - Drive a [`Sequencer`] against a [`CameraSource`] until it hands back a [`CaptureOutcome`]
//! - Open an [`EditSession`] on those photos, decorate them, and export through a
//!   [`CanvasSurface`] into a [`FileSave`] target
//!
//! All delays run on virtual time (`advance(Duration)`), so hosts choose how the clock moves.
#![forbid(unsafe_code)]

mod assets;
mod capture;
mod catalog;
mod compose;
mod foundation;
mod geometry;

/// Booth configuration file.
pub mod config;
/// Raster encoding and file saving.
pub mod export;
/// Screen switching.
pub mod phase;
/// Canvas surfaces.
pub mod render;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{BoothError, BoothResult};

pub use crate::assets::color::{encode_png, filtered_copy, styled_preview};
pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::capture::camera::{CameraSource, DirectoryCamera, EncodedImage, StillCamera};
pub use crate::capture::sequencer::{
    CaptureOutcome, CaptureState, CaptureTimings, CountdownSecs, Overlay, ReviewSlot, Sequencer,
    SequencerEvent,
};
pub use crate::capture::timer::RunId;
pub use crate::catalog::filters::{CaptureFilter, DEFAULT_FILTER_KEY, FILTERS, filter_by_key};
pub use crate::catalog::templates::{TEMPLATES, Template, template_by_id};
pub use crate::catalog::themes::{EMOJI_PALETTE, THEMES, Theme, ThemeId};
pub use crate::compose::decor::DecorationCache;
pub use crate::compose::scene::{Node, Paint, Scene, StrokeStyle, TextAnchor};
pub use crate::compose::session::{EditOptions, EditSession, ExportOutcome, Key};
pub use crate::compose::sticker::{Sticker, StickerBoard, TransformGesture};
pub use crate::config::BoothConfig;
pub use crate::export::format::{ExportFormat, ExportSettings};
pub use crate::export::save::{DirSave, FileSave, MemorySave};
pub use crate::geometry::clip::ClipShape;
pub use crate::geometry::layout::{Crop, SlotGrid, Viewport, crop_to_fill, display_scale};
pub use crate::phase::{Phase, PhaseController};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::surface::{CanvasSurface, FrameRGBA, RecordingSurface};
