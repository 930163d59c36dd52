//! # Render List
//!
//! The viewport draws from a list derived fresh from the scene on every frame; it
//! never keeps its own copy of node state. Each non-root node becomes one
//! [`RenderItem`] placed in absolute space (parents do not affect where children
//! are drawn). Groups have no geometry and are emitted only so they stay
//! pickable and can carry the gizmo.

use cgmath::Matrix4;

use crate::gfx::scene::node::parse_hex_color;
use crate::gfx::scene::{NodeId, NodeKind, Scene};
use crate::gfx::transform::Transform;

/// Alpha used for primitive surfaces
pub const PRIMITIVE_OPACITY: f32 = 0.8;

const FALLBACK_RGB: [f32; 3] = [1.0, 0.533, 0.0];

/// One drawable node.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub id: NodeId,
    pub kind: NodeKind,
    pub transform: Matrix4<f32>,
    /// `None` for groups
    pub color: Option<[f32; 3]>,
    /// Selected nodes get the outline treatment
    pub highlighted: bool,
}

impl RenderItem {
    /// GPU instance record for this item.
    pub fn to_raw(&self) -> InstanceRaw {
        let color = match self.color {
            Some([r, g, b]) => [r, g, b, PRIMITIVE_OPACITY],
            None => [0.0; 4],
        };
        InstanceRaw {
            model: self.transform.into(),
            color,
            highlighted: self.highlighted as u32,
            _padding: [0; 3],
        }
    }
}

/// Per-instance data laid out for a uniform/vertex buffer upload.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub highlighted: u32,
    pub _padding: [u32; 3],
}

/// Anything that can draw a frame of render items.
pub trait SceneRenderer {
    fn draw(&mut self, items: &[RenderItem]);
}

/// Builds the render list for `scene`, flagging `selected` for highlight.
pub fn build_render_list(
    scene: &Scene,
    selected: Option<&NodeId>,
    default_color: &str,
) -> Vec<RenderItem> {
    let fallback = parse_hex_color(default_color).unwrap_or(FALLBACK_RGB);

    scene
        .iter()
        .filter(|node| !node.is_root())
        .map(|node| RenderItem {
            id: node.id().clone(),
            kind: node.kind(),
            transform: Transform::of(node).to_matrix(),
            color: node
                .display_color(default_color)
                .map(|hex| parse_hex_color(hex).unwrap_or(fallback)),
            highlighted: selected == Some(node.id()),
        })
        .collect()
}

/// Raw bytes of the instance records for `items`, ready for `queue.write_buffer`.
pub fn instance_bytes(items: &[RenderItem]) -> Vec<u8> {
    let raw: Vec<InstanceRaw> = items.iter().map(RenderItem::to_raw).collect();
    bytemuck::cast_slice(&raw).to_vec()
}
