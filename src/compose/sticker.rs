//! User stickers: emoji glyphs placed, dragged, resized, rotated, and deleted on the canvas.

use crate::foundation::core::{Affine, Point, Vec2};

/// Smallest font size a resize gesture can commit.
pub const MIN_STICKER_FONT_SIZE: f64 = 20.0;
/// Where new stickers land, in template space.
pub const DEFAULT_STICKER_POSITION: (f64, f64) = (150.0, 150.0);
/// Font size of new stickers.
pub const DEFAULT_STICKER_FONT_SIZE: f64 = 60.0;

/// One placed glyph. `(x, y)` is the top-left of its box; rotation pivots there.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sticker {
    /// Unique id within the session.
    pub id: String,
    /// Glyph text.
    pub symbol: String,
    /// Box left edge.
    pub x: f64,
    /// Box top edge.
    pub y: f64,
    /// Font size in pixels.
    pub font_size: f64,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
}

impl Sticker {
    /// Local-to-canvas transform of the sticker box.
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }

    /// `true` if `p` lies inside the rotated `font_size` square.
    pub fn contains(&self, p: Point) -> bool {
        let local = self.transform().inverse() * p;
        (0.0..=self.font_size).contains(&local.x) && (0.0..=self.font_size).contains(&local.y)
    }
}

/// End state of a resize/rotate gesture, as reported by the manipulation handles.
///
/// `scale_x` is the transient stretch applied during the gesture; committing folds it into the
/// font size so later gestures start from scale 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformGesture {
    /// New box left edge.
    pub x: f64,
    /// New box top edge.
    pub y: f64,
    /// Horizontal stretch relative to the current font size.
    pub scale_x: f64,
    /// New rotation in degrees.
    pub rotation: f64,
}

/// Ordered sticker list plus the single selection.
#[derive(Clone, Debug, Default)]
pub struct StickerBoard {
    stickers: Vec<Sticker>,
    selected: Option<String>,
    next_id: u64,
}

impl StickerBoard {
    /// Empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stickers in insertion (paint) order.
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Number of stickers.
    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    /// `true` when no stickers are placed.
    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Look up a sticker by id.
    pub fn get(&self, id: &str) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    /// Currently selected sticker id.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Currently selected sticker.
    pub fn selected_sticker(&self) -> Option<&Sticker> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Place `symbol` at the default position and size. Returns the new id.
    pub fn add(&mut self, symbol: impl Into<String>) -> String {
        let id = format!("emoji-{}", self.next_id);
        self.next_id += 1;
        let (x, y) = DEFAULT_STICKER_POSITION;
        self.stickers.push(Sticker {
            id: id.clone(),
            symbol: symbol.into(),
            x,
            y,
            font_size: DEFAULT_STICKER_FONT_SIZE,
            rotation: 0.0,
        });
        id
    }

    /// Insert a fully specified sticker, e.g. one loaded from disk. Ids already present are
    /// replaced in place.
    pub fn insert(&mut self, sticker: Sticker) {
        if let Some(n) = sticker
            .id
            .strip_prefix("emoji-")
            .and_then(|n| n.parse::<u64>().ok())
        {
            self.next_id = self.next_id.max(n + 1);
        }
        match self.stickers.iter_mut().find(|s| s.id == sticker.id) {
            Some(existing) => *existing = sticker,
            None => self.stickers.push(sticker),
        }
    }

    /// Select `id`. Unknown ids are ignored and return `false`.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Topmost sticker under `p`.
    pub fn hit_test(&self, p: Point) -> Option<&str> {
        self.stickers
            .iter()
            .rev()
            .find(|s| s.contains(p))
            .map(|s| s.id.as_str())
    }

    /// Commit a drag.
    pub fn drag(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(s) = self.stickers.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        s.x = x;
        s.y = y;
        true
    }

    /// Commit a resize/rotate gesture.
    pub fn transform(&mut self, id: &str, gesture: TransformGesture) -> bool {
        let Some(s) = self.stickers.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        let scale = if gesture.scale_x.is_finite() {
            gesture.scale_x
        } else {
            1.0
        };
        s.x = gesture.x;
        s.y = gesture.y;
        s.font_size = (s.font_size * scale).max(MIN_STICKER_FONT_SIZE);
        s.rotation = gesture.rotation;
        true
    }

    /// Remove `id`. Clears the selection if it pointed there.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.stickers.len();
        self.stickers.retain(|s| s.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.stickers.len() != before
    }

    /// Remove the selected sticker, if any.
    pub fn delete_selected(&mut self) -> bool {
        match self.selected.take() {
            Some(id) => self.delete(&id),
            None => false,
        }
    }

    /// Drop every sticker and the selection.
    pub fn clear(&mut self) {
        self.stickers.clear();
        self.selected = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/sticker.rs"]
mod tests;
