//! Raster encoding and the file-save collaborator.

pub mod format;
pub mod save;
