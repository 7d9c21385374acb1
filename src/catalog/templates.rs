use crate::foundation::core::Canvas;
use crate::foundation::error::{BoothError, BoothResult};

/// Layout template: how many shots to take and how they are arranged on the output canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Template {
    /// Stable catalog id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Number of photos captured for this layout.
    pub shot_count: u32,
    /// Grid columns.
    pub cols: u32,
    /// Grid rows.
    pub rows: u32,
    /// Output size in template pixel space.
    pub canvas: Canvas,
}

impl Template {
    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Number of grid cells. Shots beyond this are not placed.
    pub fn cell_count(&self) -> u32 {
        self.cols.saturating_mul(self.rows)
    }

    /// Check the structural invariants layout math relies on.
    ///
    /// `shot_count <= cols * rows` is deliberately not checked.
    pub fn validate(&self) -> BoothResult<()> {
        if self.shot_count == 0 {
            return Err(BoothError::validation(format!(
                "template '{}' must take at least one shot",
                self.id
            )));
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(BoothError::validation(format!(
                "template '{}' grid must have cols>0 and rows>0",
                self.id
            )));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(BoothError::validation(format!(
                "template '{}' canvas must be non-empty",
                self.id
            )));
        }
        Ok(())
    }
}

const fn template(
    id: &'static str,
    name: &'static str,
    shot_count: u32,
    cols: u32,
    rows: u32,
    width: u32,
    height: u32,
) -> Template {
    Template {
        id,
        name,
        shot_count,
        cols,
        rows,
        canvas: Canvas { width, height },
    }
}

/// Built-in layouts, in display order.
pub static TEMPLATES: [Template; 5] = [
    template("strip-4", "Classic Strip", 4, 1, 4, 300, 1200),
    template("grid-2x2", "2x2 Grid", 4, 2, 2, 600, 800),
    template("strip-3", "3-Pose Strip", 3, 1, 3, 300, 900),
    template("grid-6", "The 6-Pack", 6, 2, 3, 600, 1000),
    template("strip-2", "Cute Duo", 2, 1, 2, 300, 600),
];

/// Look up a built-in template by id.
pub fn template_by_id(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/templates.rs"]
mod tests;
