//! Declarative scene tree handed to a [`crate::render::surface::CanvasSurface`].
//!
//! All coordinates are template pixel space. Leaves carry their own local transform; groups
//! compose a transform and an opacity over their children.

use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Affine, BezPath, Canvas, Rect, Rgba8};
use crate::geometry::layout::Crop;

/// Fill paint for a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// Flat color.
    Solid(Rgba8),
    /// Top-to-bottom gradient across the path's bounding box.
    VerticalGradient {
        /// Color at the top of the bounding box.
        top: Rgba8,
        /// Color at the bottom of the bounding box.
        bottom: Rgba8,
    },
}

/// Outline style for a stroked path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Line width in local units.
    pub width: f64,
    /// Optional `(dash, gap)` pattern.
    pub dash: Option<(f64, f64)>,
}

/// Where a text node's local origin sits on its laid-out box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Origin is the box's top-left corner.
    #[default]
    TopLeft,
    /// Origin is the middle of the box's top edge.
    TopCenter,
    /// Origin is the box's center.
    Center,
}

/// One node of the scene tree.
#[derive(Clone, Debug)]
pub enum Node {
    /// Filled path.
    Fill {
        /// Outline in local space.
        path: BezPath,
        /// Local-to-parent transform.
        transform: Affine,
        /// Fill paint.
        paint: Paint,
    },
    /// Stroked path.
    Stroke {
        /// Centerline in local space.
        path: BezPath,
        /// Local-to-parent transform.
        transform: Affine,
        /// Stroke style.
        style: StrokeStyle,
    },
    /// A single line of text.
    Text {
        /// Text content.
        text: String,
        /// Local-to-parent transform; the origin is placed per `anchor`.
        transform: Affine,
        /// Font size in local units.
        size: f64,
        /// Fill color.
        color: Rgba8,
        /// Box anchor.
        anchor: TextAnchor,
    },
    /// A cropped raster drawn into a `width x height` box and clipped to `clip`.
    Image {
        /// Decoded source pixels.
        image: Arc<DecodedImage>,
        /// Local-to-parent transform placing the box's top-left corner.
        transform: Affine,
        /// Source crop drawn over the full box.
        crop: Crop,
        /// Box width.
        width: f64,
        /// Box height.
        height: f64,
        /// Flip horizontally inside the box.
        mirror: bool,
        /// Clip outline in box-local space.
        clip: BezPath,
    },
    /// Transformed, optionally translucent group.
    Group {
        /// Local-to-parent transform.
        transform: Affine,
        /// Group opacity in `[0, 1]`.
        opacity: f32,
        /// Children, bottom to top.
        children: Vec<Node>,
    },
}

impl Node {
    /// Solid-filled rectangle.
    pub fn rect(rect: Rect, color: Rgba8) -> Self {
        Self::Fill {
            path: kurbo::Shape::to_path(&rect, 0.1),
            transform: Affine::IDENTITY,
            paint: Paint::Solid(color),
        }
    }

    /// Group with an identity transform.
    pub fn group(opacity: f32, children: Vec<Node>) -> Self {
        Self::Group {
            transform: Affine::IDENTITY,
            opacity,
            children,
        }
    }

    /// Group placed by `transform`, fully opaque.
    pub fn placed(transform: Affine, children: Vec<Node>) -> Self {
        Self::Group {
            transform,
            opacity: 1.0,
            children,
        }
    }
}

/// A renderable scene: canvas size plus a bottom-to-top node list.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Canvas in template pixel space.
    pub canvas: Canvas,
    /// Top-level nodes, bottom to top.
    pub nodes: Vec<Node>,
}

impl Scene {
    /// Empty scene for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            nodes: Vec::new(),
        }
    }

    /// Append a node on top.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Visit every leaf in paint order with its accumulated transform and opacity.
    pub fn for_each_leaf(&self, mut f: impl FnMut(&Node, Affine, f32)) {
        fn walk(nodes: &[Node], parent: Affine, opacity: f32, f: &mut dyn FnMut(&Node, Affine, f32)) {
            for node in nodes {
                match node {
                    Node::Group {
                        transform,
                        opacity: o,
                        children,
                    } => walk(children, parent * *transform, opacity * o, f),
                    leaf => f(leaf, parent, opacity),
                }
            }
        }
        walk(&self.nodes, Affine::IDENTITY, 1.0, &mut f);
    }

    /// Text leaves in paint order, as `(text, world transform)`.
    pub fn texts(&self) -> Vec<(String, Affine)> {
        let mut out = Vec::new();
        self.for_each_leaf(|node, parent, _| {
            if let Node::Text {
                text, transform, ..
            } = node
            {
                out.push((text.clone(), parent * *transform));
            }
        });
        out
    }

    /// Number of image leaves.
    pub fn image_count(&self) -> usize {
        let mut n = 0;
        self.for_each_leaf(|node, _, _| {
            if matches!(node, Node::Image { .. }) {
                n += 1;
            }
        });
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/scene.rs"]
mod tests;
