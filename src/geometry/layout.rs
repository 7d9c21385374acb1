//! Template-space layout math: photo slots, crop-to-fill, and the on-screen display scale.
//!
//! Everything here works in template pixel space. The display scale is a view transform only and
//! never feeds back into slot, crop, or sticker coordinates.

use crate::catalog::templates::Template;
use crate::foundation::core::Rect;

/// Outer margin around the photo grid.
pub const SLOT_MARGIN: f64 = 40.0;
/// Gap between neighbouring slots.
pub const SLOT_PADDING: f64 = 20.0;
/// Extra vertical space kept free at the bottom for the date caption.
pub const FOOTER_RESERVE: f64 = 40.0;
/// Horizontal breathing room subtracted from the container before fitting the canvas.
pub const DISPLAY_GUTTER: f64 = 40.0;

/// Slot dimensions for a template's photo grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotGrid {
    /// Grid columns.
    pub cols: u32,
    /// Grid rows.
    pub rows: u32,
    /// Width of every slot.
    pub slot_width: f64,
    /// Height of every slot.
    pub slot_height: f64,
}

impl SlotGrid {
    /// Compute the grid for `template`.
    pub fn for_template(template: &Template) -> Self {
        let cols = template.cols.max(1);
        let rows = template.rows.max(1);

        let total_gap_x = f64::from(cols - 1) * SLOT_PADDING;
        let available_width = f64::from(template.width()) - 2.0 * SLOT_MARGIN - total_gap_x;
        let total_gap_y = f64::from(rows - 1) * SLOT_PADDING;
        let available_height =
            f64::from(template.height()) - 2.0 * SLOT_MARGIN - total_gap_y - FOOTER_RESERVE;

        Self {
            cols,
            rows,
            slot_width: available_width / f64::from(cols),
            slot_height: available_height / f64::from(rows),
        }
    }

    /// `false` when the margins and footer leave no room for photos.
    pub fn has_area(&self) -> bool {
        self.slot_width > 0.0 && self.slot_height > 0.0
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        (self.cols as usize).saturating_mul(self.rows as usize)
    }

    /// Slot rectangle for photo `index`, row-major. `None` once the grid is full.
    pub fn slot(&self, index: usize) -> Option<Rect> {
        if index >= self.cell_count() {
            return None;
        }
        let col = (index % self.cols as usize) as f64;
        let row = (index / self.cols as usize) as f64;
        let x = SLOT_MARGIN + col * (self.slot_width + SLOT_PADDING);
        let y = SLOT_MARGIN + row * (self.slot_height + SLOT_PADDING);
        Some(Rect::new(x, y, x + self.slot_width, y + self.slot_height))
    }

    /// Slot rectangles for the first `photo_count` photos. Photos past the last cell get none.
    pub fn slots(&self, photo_count: usize) -> Vec<Rect> {
        (0..photo_count.min(self.cell_count()))
            .filter_map(|i| self.slot(i))
            .collect()
    }
}

/// Source-space crop rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crop {
    /// Left edge in source pixels.
    pub x: f64,
    /// Top edge in source pixels.
    pub y: f64,
    /// Width in source pixels.
    pub width: f64,
    /// Height in source pixels.
    pub height: f64,
}

/// "Cover" crop: the largest centered region of an `image_w x image_h` source with the aspect
/// ratio of the `target_w x target_h` slot.
pub fn crop_to_fill(image_w: f64, image_h: f64, target_w: f64, target_h: f64) -> Crop {
    let target_aspect = target_w / target_h;
    let source_aspect = image_w / image_h;

    if source_aspect > target_aspect {
        let width = image_h * target_aspect;
        Crop {
            x: (image_w - width) / 2.0,
            y: 0.0,
            width,
            height: image_h,
        }
    } else {
        let height = image_w / target_aspect;
        Crop {
            x: 0.0,
            y: (image_h - height) / 2.0,
            width: image_w,
            height,
        }
    }
}

/// Uniform down-scale that fits the canvas into the visible container. Never scales up.
///
/// Degenerate containers narrower than the gutter clamp to zero.
pub fn display_scale(window_width: f64, container_width: f64, template_width: u32) -> f64 {
    let available = window_width.min(container_width) - DISPLAY_GUTTER;
    (available / f64::from(template_width.max(1))).clamp(0.0, 1.0)
}

/// How the render surface is currently presented on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Uniform display scale.
    pub scale: f64,
    /// Surface width in screen pixels.
    pub width: f64,
    /// Surface height in screen pixels.
    pub height: f64,
}

impl Viewport {
    /// Unscaled 1:1 viewport at native template dimensions.
    pub fn native(template: &Template) -> Self {
        Self {
            scale: 1.0,
            width: f64::from(template.width()),
            height: f64::from(template.height()),
        }
    }

    /// Viewport fitted to the given window/container widths.
    pub fn responsive(template: &Template, window_width: f64, container_width: f64) -> Self {
        let scale = display_scale(window_width, container_width, template.width());
        Self {
            scale,
            width: f64::from(template.width()) * scale,
            height: f64::from(template.height()) * scale,
        }
    }

    /// Map a screen-space point on the surface back into template space.
    pub fn to_template_space(&self, x: f64, y: f64) -> (f64, f64) {
        if self.scale <= 0.0 {
            return (0.0, 0.0);
        }
        (x / self.scale, y / self.scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/layout.rs"]
mod tests;
