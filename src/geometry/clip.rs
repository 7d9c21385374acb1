use std::f64::consts::PI;

use kurbo::Shape;

use crate::foundation::core::{BezPath, Point, Rect};

const FLATTEN_TOLERANCE: f64 = 0.1;

/// Stamp scallop radius in pixels.
pub const STAMP_SCALLOP_RADIUS: f64 = 6.0;

/// Pixel-art heart mask, 15 columns by 12 rows.
pub const PIXEL_HEART: [[u8; 15]; 12] = [
    [0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
];

/// Photo clip shape. Each variant produces a path in slot-local `(0,0)..(w,h)` space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ClipShape {
    /// Plain rectangle.
    Rect,
    /// Rectangle with quadratic-rounded corners.
    Rounded {
        /// Corner radius in pixels.
        radius: f64,
    },
    /// Union of the [`PIXEL_HEART`] cells stretched over the slot.
    PixelHeart,
    /// Rectangle with semicircular scallops along every edge.
    Stamp,
    /// Centered five-point star.
    Star,
}

impl ClipShape {
    /// Build the clip path for a `w x h` slot.
    pub fn path(self, w: f64, h: f64) -> BezPath {
        match self {
            Self::Rect => Rect::new(0.0, 0.0, w, h).into_path(FLATTEN_TOLERANCE),
            Self::Rounded { radius } => rounded_path(w, h, radius),
            Self::PixelHeart => pixel_heart_path(w, h),
            Self::Stamp => stamp_path(w, h),
            Self::Star => star_path(w, h),
        }
    }
}

fn rounded_path(w: f64, h: f64, radius: f64) -> BezPath {
    let r = radius.clamp(0.0, (w.min(h) / 2.0).max(0.0));
    let mut p = BezPath::new();
    p.move_to((r, 0.0));
    p.line_to((w - r, 0.0));
    p.quad_to((w, 0.0), (w, r));
    p.line_to((w, h - r));
    p.quad_to((w, h), (w - r, h));
    p.line_to((r, h));
    p.quad_to((0.0, h), (0.0, h - r));
    p.line_to((0.0, r));
    p.quad_to((0.0, 0.0), (r, 0.0));
    p.close_path();
    p
}

fn pixel_heart_path(w: f64, h: f64) -> BezPath {
    let unit_w = w / 15.0;
    let unit_h = h / 12.0;
    let mut p = BezPath::new();
    for (row_i, row) in PIXEL_HEART.iter().enumerate() {
        for (col_i, &cell) in row.iter().enumerate() {
            if cell == 0 {
                continue;
            }
            // Half-pixel overlap hides seams between neighbouring cells.
            let x = col_i as f64 * unit_w;
            let y = row_i as f64 * unit_h;
            let cell = Rect::new(x, y, x + unit_w + 0.5, y + unit_h + 0.5);
            p.extend(cell.path_elements(FLATTEN_TOLERANCE));
        }
    }
    p
}

fn stamp_path(w: f64, h: f64) -> BezPath {
    let r = STAMP_SCALLOP_RADIUS;
    let step = r * 2.0;
    let mut p = BezPath::new();

    let mut x = 0.0;
    while x < w {
        push_arc(&mut p, Point::new(x + r, 0.0), r, PI);
        x += step;
    }
    let mut y = 0.0;
    while y < h {
        push_arc(&mut p, Point::new(w, y + r), r, -PI / 2.0);
        y += step;
    }
    let mut x = w;
    while x > 0.0 {
        push_arc(&mut p, Point::new(x - r, h), r, 0.0);
        x -= step;
    }
    let mut y = h;
    while y > 0.0 {
        push_arc(&mut p, Point::new(0.0, y - r), r, PI / 2.0);
        y -= step;
    }
    p.close_path();
    p
}

/// Append a clockwise half-turn arc, joined to the current point by a straight segment.
fn push_arc(p: &mut BezPath, center: Point, radius: f64, start_angle: f64) {
    let arc = kurbo::Arc::new(center, (radius, radius), start_angle, PI, 0.0);
    let start = center + kurbo::Vec2::from_angle(start_angle) * radius;
    if p.elements().is_empty() {
        p.move_to(start);
    } else {
        p.line_to(start);
    }
    arc.to_cubic_beziers(FLATTEN_TOLERANCE, |p1, p2, p3| p.curve_to(p1, p2, p3));
}

fn star_path(w: f64, h: f64) -> BezPath {
    const SPIKES: usize = 5;
    let cx = w / 2.0;
    let cy = h / 2.0;
    let outer = w.min(h) / 2.0;
    let inner = outer / 2.0;

    let mut p = BezPath::new();
    for i in 0..SPIKES * 2 {
        let r = if i % 2 == 0 { outer } else { inner };
        let angle = PI * i as f64 / SPIKES as f64 - PI / 2.0;
        let pt = Point::new(cx + angle.cos() * r, cy + angle.sin() * r);
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    p.close_path();
    p
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/clip.rs"]
mod tests;
