//! Edit screen: scene graph, theme decorations, stickers, and the export flow.

pub(crate) mod decor;
pub mod scene;
pub(crate) mod session;
pub(crate) mod sticker;
