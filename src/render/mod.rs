//! Canvas surfaces: the drawing contract, the CPU rasterizer, and text shaping.

pub mod cpu;
pub mod surface;
pub(crate) mod text;
