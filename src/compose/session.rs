//! The edit screen: photos from one capture run, a theme, stickers, and export.

use std::sync::Arc;
use std::time::Duration;

use crate::assets::color::filtered_copy;
use crate::assets::decode::{DecodedImage, decode_image};
use crate::capture::camera::EncodedImage;
use crate::capture::timer::{RunId, TimerQueue};
use crate::catalog::filters::{CaptureFilter, filter_by_key};
use crate::catalog::templates::Template;
use crate::catalog::themes::{Theme, ThemeId};
use crate::compose::decor::{DecorationCache, background_nodes, frame_nodes};
use crate::compose::scene::{Node, Scene, StrokeStyle, TextAnchor};
use crate::compose::sticker::{StickerBoard, TransformGesture};
use crate::export::format::{ExportFormat, ExportSettings};
use crate::export::save::FileSave;
use crate::foundation::core::{Affine, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{BoothError, BoothResult};
use crate::geometry::layout::{SlotGrid, Viewport, crop_to_fill};
use crate::render::surface::{CanvasSurface, RasterRequest};

/// Caption baseline offset from the bottom edge.
pub const CAPTION_OFFSET_FROM_BOTTOM: f64 = 35.0;
/// Caption font size.
pub const CAPTION_FONT_SIZE: f64 = 16.0;

const STICKER_COLOR: Rgba8 = Rgba8::hex(0x000000);
const SELECTION_COLOR: Rgba8 = Rgba8::hex(0x00A1FF);
const HANDLE_SIZE: f64 = 10.0;
const ROTATE_HANDLE_OFFSET: f64 = 50.0;

/// Keys the editor reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Forward delete.
    Delete,
    /// Backspace.
    Backspace,
    /// Anything else; ignored.
    Other,
}

/// Result of asking for an export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Accepted; the raster is produced once the export delay elapses.
    Scheduled,
    /// The raster was produced and handed to the save target.
    Saved {
        /// Name passed to the save target.
        file_name: String,
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },
    /// Another export is already pending; nothing was done.
    Busy,
    /// Nothing to export; nothing was done.
    Skipped(String),
}

/// Construction options for an [`EditSession`].
#[derive(Clone, Debug)]
pub struct EditOptions {
    /// Seed for decorative scatter; stable for the session's lifetime.
    pub seed: u64,
    /// Initial theme.
    pub theme: ThemeId,
    /// Footer caption, typically the local date. `None` draws no caption.
    pub caption: Option<String>,
    /// Export encoding and density.
    pub export: ExportSettings,
    /// Delay between an export request and the raster, letting the deselection render commit.
    pub export_delay: Duration,
}

impl EditOptions {
    /// Defaults with an explicit decoration seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            theme: ThemeId::default(),
            caption: None,
            export: ExportSettings::default(),
            export_delay: Duration::from_millis(200),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExportTimer {
    Fire,
}

/// Mutable state of one edit screen visit.
pub struct EditSession<S: CanvasSurface> {
    template: Template,
    filter: &'static CaptureFilter,
    photos: Vec<Arc<DecodedImage>>,
    baked: Option<Vec<Arc<DecodedImage>>>,
    theme: ThemeId,
    stickers: StickerBoard,
    decorations: DecorationCache,
    caption: Option<String>,
    export: ExportSettings,
    export_delay: Duration,
    surface: Option<S>,
    timers: TimerQueue<ExportTimer>,
    pending_export: Option<RunId>,
    next_export: u64,
}

impl<S: CanvasSurface> EditSession<S> {
    /// Start editing `photos` captured for `template` with filter `filter_key`.
    ///
    /// Stills that fail to decode are dropped with a warning; the rest keep their order.
    pub fn new(template: &Template, photos: &[EncodedImage], filter_key: &str, opts: EditOptions) -> BoothResult<Self> {
        template.validate()?;
        opts.export.validate()?;
        let filter = filter_by_key(filter_key)
            .ok_or_else(|| BoothError::validation(format!("unknown filter '{filter_key}'")))?;

        let mut decoded = Vec::with_capacity(photos.len());
        for (index, still) in photos.iter().enumerate() {
            match decode_image(still.bytes.as_slice()) {
                Ok(img) => decoded.push(Arc::new(img)),
                Err(err) => tracing::warn!(index, %err, "dropping undecodable still"),
            }
        }

        Ok(Self {
            template: *template,
            filter,
            photos: decoded,
            baked: None,
            theme: opts.theme,
            stickers: StickerBoard::new(),
            decorations: DecorationCache::new(opts.seed),
            caption: opts.caption,
            export: opts.export,
            export_delay: opts.export_delay,
            surface: None,
            timers: TimerQueue::new(),
            pending_export: None,
            next_export: 0,
        })
    }

    /// Template being composed.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Filter carried over from capture.
    pub fn filter(&self) -> &'static CaptureFilter {
        self.filter
    }

    /// Decoded photos in capture order.
    pub fn photos(&self) -> &[Arc<DecodedImage>] {
        &self.photos
    }

    /// Active theme.
    pub fn theme(&self) -> &'static Theme {
        self.theme.theme()
    }

    /// Switch theme. Stickers and decorations for other themes are kept.
    pub fn set_theme(&mut self, theme: ThemeId) {
        self.theme = theme;
    }

    /// Sticker board.
    pub fn stickers(&self) -> &StickerBoard {
        &self.stickers
    }

    /// Mutable sticker board, for bulk loading.
    pub fn stickers_mut(&mut self) -> &mut StickerBoard {
        &mut self.stickers
    }

    /// Decoration cache, exposed for stability checks.
    pub fn decorations(&self) -> &DecorationCache {
        &self.decorations
    }

    /// Place a new sticker at the default spot. Returns its id.
    pub fn add_sticker(&mut self, symbol: &str) -> String {
        self.stickers.add(symbol)
    }

    /// Select a sticker by id.
    pub fn select_sticker(&mut self, id: &str) -> bool {
        self.stickers.select(id)
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.stickers.deselect();
    }

    /// Press at surface coordinates. Selects the topmost sticker there, or deselects on empty
    /// canvas. Returns the selected id.
    pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64) -> Option<String> {
        let (x, y) = self.viewport().to_template_space(screen_x, screen_y);
        match self.stickers.hit_test(Point::new(x, y)).map(str::to_string) {
            Some(id) => {
                self.stickers.select(&id);
                Some(id)
            }
            None => {
                self.stickers.deselect();
                None
            }
        }
    }

    /// Commit a drag in template space.
    pub fn drag_sticker(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.stickers.drag(id, x, y)
    }

    /// Commit a resize/rotate gesture.
    pub fn transform_sticker(&mut self, id: &str, gesture: TransformGesture) -> bool {
        self.stickers.transform(id, gesture)
    }

    /// Delete a sticker by id. Unknown ids are a no-op.
    pub fn delete_sticker(&mut self, id: &str) -> bool {
        self.stickers.delete(id)
    }

    /// Delete the selected sticker.
    pub fn delete_selected(&mut self) -> bool {
        self.stickers.delete_selected()
    }

    /// Keyboard input. Delete and Backspace remove the selected sticker.
    pub fn key_down(&mut self, key: Key) -> bool {
        match key {
            Key::Delete | Key::Backspace => self.stickers.delete_selected(),
            Key::Other => false,
        }
    }

    /// Export settings.
    pub fn export_settings(&self) -> &ExportSettings {
        &self.export
    }

    /// Choose PNG or JPEG.
    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.export.format = format;
    }

    /// Attach the render surface. Returns the previous one, if any.
    pub fn attach_surface(&mut self, surface: S) -> Option<S> {
        self.surface.replace(surface)
    }

    /// Attached surface.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Attached surface, mutably.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Surface viewport, or the native one when no surface is attached.
    pub fn viewport(&self) -> Viewport {
        self.surface
            .as_ref()
            .map_or_else(|| Viewport::native(&self.template), |s| s.viewport())
    }

    /// Refit the on-screen presentation to the window and container widths.
    pub fn resize_display(&mut self, window_width: f64, container_width: f64) {
        let viewport = Viewport::responsive(&self.template, window_width, container_width);
        if let Some(surface) = self.surface.as_mut() {
            surface.set_viewport(viewport);
        }
    }

    /// Build the scene for the current state, including selection chrome.
    pub fn build_scene(&mut self) -> Scene {
        let photos = self.photos.clone();
        self.compose(&photos, true)
    }

    fn compose(&mut self, photos: &[Arc<DecodedImage>], with_selection: bool) -> Scene {
        let theme = self.theme.theme();
        let canvas = self.template.canvas;
        let mut scene = Scene::new(canvas);
        scene
            .nodes
            .extend(background_nodes(theme, canvas, &mut self.decorations));

        let grid = SlotGrid::for_template(&self.template);
        let placed = if grid.has_area() {
            photos.len()
        } else {
            tracing::warn!(template = self.template.id, "template too small for photo slots");
            0
        };
        for (slot, image) in grid.slots(placed).into_iter().zip(photos) {
            let (sw, sh) = (slot.width(), slot.height());
            let (iw, ih) = image.size_f64();
            let mut children = vec![Node::Image {
                image: Arc::clone(image),
                transform: Affine::IDENTITY,
                crop: crop_to_fill(iw, ih, sw, sh),
                width: sw,
                height: sh,
                mirror: true,
                clip: theme.clip.path(sw, sh),
            }];
            children.extend(frame_nodes(theme, sw, sh));
            scene.push(Node::placed(
                Affine::translate(Vec2::new(slot.x0, slot.y0)),
                children,
            ));
        }

        if let Some(caption) = &self.caption {
            scene.push(Node::Text {
                text: caption.clone(),
                transform: Affine::translate(Vec2::new(
                    f64::from(canvas.width) / 2.0,
                    f64::from(canvas.height) - CAPTION_OFFSET_FROM_BOTTOM,
                )),
                size: CAPTION_FONT_SIZE,
                color: theme.text_color,
                anchor: TextAnchor::TopCenter,
            });
        }

        for sticker in self.stickers.stickers() {
            scene.push(Node::Text {
                text: sticker.symbol.clone(),
                transform: sticker.transform(),
                size: sticker.font_size,
                color: STICKER_COLOR,
                anchor: TextAnchor::TopLeft,
            });
        }

        if with_selection && let Some(sticker) = self.stickers.selected_sticker() {
            scene.push(Node::placed(
                sticker.transform(),
                selection_chrome(sticker.font_size),
            ));
        }
        scene
    }

    /// Ask for an export. The selection is cleared now and the raster is produced once the
    /// export delay elapses via [`EditSession::advance`].
    pub fn request_export(&mut self) -> ExportOutcome {
        if self.pending_export.is_some() {
            return ExportOutcome::Busy;
        }
        if let Some(reason) = self.skip_reason() {
            tracing::warn!(%reason, "export skipped");
            return ExportOutcome::Skipped(reason);
        }
        self.stickers.deselect();
        let run = RunId(self.next_export);
        self.next_export += 1;
        self.timers.schedule(run, self.export_delay, ExportTimer::Fire);
        self.pending_export = Some(run);
        tracing::debug!(run = run.0, delay_ms = self.export_delay.as_millis() as u64, "export scheduled");
        ExportOutcome::Scheduled
    }

    /// `true` while a requested export has not fired yet.
    pub fn export_pending(&self) -> bool {
        self.pending_export.is_some()
    }

    /// Time until the pending export fires.
    pub fn time_until_export(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Advance virtual time; runs the pending export if its delay has elapsed.
    pub fn advance(&mut self, elapsed: Duration, save: &mut dyn FileSave) -> BoothResult<Option<ExportOutcome>> {
        let target = self.timers.now() + elapsed;
        let mut outcome = None;
        while let Some((run, ExportTimer::Fire)) = self.timers.pop_due(target) {
            if self.pending_export != Some(run) {
                continue;
            }
            self.pending_export = None;
            outcome = Some(self.run_export(save));
        }
        self.timers.settle_at(target);
        outcome.transpose()
    }

    /// Export immediately, skipping the delay. Refused while a delayed export is pending.
    pub fn export_now(&mut self, save: &mut dyn FileSave) -> BoothResult<ExportOutcome> {
        if self.pending_export.is_some() {
            return Ok(ExportOutcome::Busy);
        }
        self.run_export(save)
    }

    /// Cancel a pending export, if any.
    pub fn cancel_export(&mut self) -> bool {
        match self.pending_export.take() {
            Some(run) => self.timers.cancel_run(run) > 0,
            None => false,
        }
    }

    fn skip_reason(&self) -> Option<String> {
        if self.photos.is_empty() {
            return Some("no photos to export".to_string());
        }
        if self.surface.is_none() {
            return Some("no render surface attached".to_string());
        }
        None
    }

    #[tracing::instrument(skip_all, fields(template = self.template.id, format = self.export.format.ext()))]
    fn run_export(&mut self, save: &mut dyn FileSave) -> BoothResult<ExportOutcome> {
        if let Some(reason) = self.skip_reason() {
            tracing::warn!(%reason, "export skipped");
            return Ok(ExportOutcome::Skipped(reason));
        }
        self.stickers.deselect();

        let photos = if self.export.bake_filter {
            self.baked_photos()?
        } else {
            self.photos.clone()
        };
        let scene = self.compose(&photos, false);
        let request = RasterRequest {
            format: self.export.format,
            quality: self.export.jpeg_quality,
            pixel_ratio: self.export.pixel_ratio,
        };
        let native = Viewport::native(&self.template);

        let Some(surface) = self.surface.as_mut() else {
            return Ok(ExportOutcome::Skipped("no render surface attached".to_string()));
        };
        let saved_viewport = surface.viewport();
        surface.set_viewport(native);
        let raster = surface.to_raster(&scene, request);
        surface.set_viewport(saved_viewport);
        let raster = raster?;

        let file_name = self.export.format.file_name();
        save.save(&raster.to_data_uri(), &file_name)?;
        tracing::debug!(%file_name, width = raster.width, height = raster.height, "export complete");
        Ok(ExportOutcome::Saved {
            file_name,
            width: raster.width,
            height: raster.height,
        })
    }

    fn baked_photos(&mut self) -> BoothResult<Vec<Arc<DecodedImage>>> {
        if let Some(baked) = &self.baked {
            return Ok(baked.clone());
        }
        let baked = self
            .photos
            .iter()
            .map(|p| filtered_copy(p, self.filter).map(Arc::new))
            .collect::<BoothResult<Vec<_>>>()?;
        self.baked = Some(baked.clone());
        Ok(baked)
    }
}

fn selection_chrome(size: f64) -> Vec<Node> {
    let outline = StrokeStyle {
        color: SELECTION_COLOR,
        width: 1.0,
        dash: None,
    };
    let mut nodes = vec![Node::Stroke {
        path: kurbo::Shape::to_path(&Rect::new(0.0, 0.0, size, size), 0.1),
        transform: Affine::IDENTITY,
        style: outline,
    }];

    let half = HANDLE_SIZE / 2.0;
    let mut handle = |cx: f64, cy: f64| {
        let r = Rect::new(cx - half, cy - half, cx + half, cy + half);
        nodes.push(Node::rect(r, Rgba8::WHITE));
        nodes.push(Node::Stroke {
            path: kurbo::Shape::to_path(&r, 0.1),
            transform: Affine::IDENTITY,
            style: outline,
        });
    };
    for (cx, cy) in [(0.0, 0.0), (size, 0.0), (0.0, size), (size, size)] {
        handle(cx, cy);
    }
    handle(size / 2.0, -ROTATE_HANDLE_OFFSET);
    nodes
}

#[cfg(test)]
#[path = "../../tests/unit/compose/session.rs"]
mod tests;
