use cgmath::{Vector3, Zero};
use std::fmt;

/// Smallest scale allowed on any axis. Smaller inputs are clamped up to it.
pub const MIN_SCALE: f32 = 0.1;

/// Id of the synthetic root every new object is parented to.
pub const ROOT_ID: &str = "root";

/// Opaque unique identifier for a node in the scene graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id of the synthetic root node.
    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Shape of a node. Groups carry no geometry and no color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Group,
}

impl NodeKind {
    /// All kinds in the order they are offered in the add-object form.
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Box,
        NodeKind::Sphere,
        NodeKind::Cylinder,
        NodeKind::Cone,
        NodeKind::Group,
    ];

    /// Lowercase tag, also used for default node names.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Box => "box",
            NodeKind::Sphere => "sphere",
            NodeKind::Cylinder => "cylinder",
            NodeKind::Cone => "cone",
            NodeKind::Group => "group",
        }
    }

    /// Capitalized label for menus.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Box => "Box",
            NodeKind::Sphere => "Sphere",
            NodeKind::Cylinder => "Cylinder",
            NodeKind::Cone => "Cone",
            NodeKind::Group => "Group",
        }
    }

    pub fn has_geometry(self) -> bool {
        self != NodeKind::Group
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single entity in the scene graph.
///
/// The hierarchy is stored as a back-reference to the parent only; children are
/// always derived by filtering the scene. Hierarchy changes go through
/// [`Scene::move_node`](super::Scene::move_node), property changes through
/// [`Scene::update`](super::Scene::update).
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    id: NodeId,
    pub name: String,
    kind: NodeKind,
    parent: Option<NodeId>,

    // Local transform, Euler rotation in radians (XYZ order)
    position: Vector3<f32>,
    rotation: Option<Vector3<f32>>,
    scale: Vector3<f32>,

    color: Option<String>,
}

impl SceneNode {
    /// Creates a top-level node with identity transform and no color.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            parent: None,
            position: Vector3::zero(),
            rotation: Some(Vector3::zero()),
            scale: Vector3::new(1.0, 1.0, 1.0),
            color: None,
        }
    }

    /// The synthetic root group.
    pub fn root() -> Self {
        Self::new(NodeId::root(), NodeKind::Group).with_name("Root")
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_parent(mut self, parent: Option<NodeId>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Passing `None` mimics nodes built before rotation was tracked.
    pub fn with_rotation(mut self, rotation: Option<Vector3<f32>>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.set_color(Some(color.into()));
        self
    }

    // Getters

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Rotation in radians, `(0, 0, 0)` when the node never had one.
    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation.unwrap_or_else(Vector3::zero)
    }

    pub fn has_rotation(&self) -> bool {
        self.rotation.is_some()
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// Stored color. Always `None` for groups.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Color to draw with, falling back to `default` when unset. `None` for groups.
    pub fn display_color<'a>(&'a self, default: &'a str) -> Option<&'a str> {
        if self.kind.has_geometry() {
            Some(self.color.as_deref().unwrap_or(default))
        } else {
            None
        }
    }

    // Setters (crate-internal so the scene stays the single entry point)

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub(crate) fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.rotation = Some(rotation);
    }

    pub(crate) fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = clamp_scale(scale);
    }

    pub(crate) fn set_color(&mut self, color: Option<String>) {
        if !self.kind.has_geometry() {
            self.color = None;
            return;
        }
        match color {
            Some(color) if is_hex_color(&color) => self.color = Some(color),
            Some(color) => log::debug!("Ignoring invalid color {:?} for {}", color, self.id),
            None => self.color = None,
        }
    }

    pub(crate) fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
        if !kind.has_geometry() {
            self.color = None;
        }
    }

    /// Enforces the scale floor on every axis.
    pub(crate) fn clamp_in_place(&mut self) {
        self.scale = clamp_scale(self.scale);
    }
}

/// Partial update of a node's own fields. `id` and `parent` are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub kind: Option<NodeKind>,
    pub position: Option<Vector3<f32>>,
    pub rotation: Option<Vector3<f32>>,
    pub scale: Option<Vector3<f32>>,
    /// `Some(None)` clears the color.
    pub color: Option<Option<String>>,
}

impl NodePatch {
    /// A patch carrying every editable field of `node`.
    pub fn from_node(node: &SceneNode) -> Self {
        Self {
            name: Some(node.name.clone()),
            kind: Some(node.kind),
            position: Some(node.position),
            rotation: Some(node.rotation()),
            scale: Some(node.scale),
            color: Some(node.color.clone()),
        }
    }

    /// A transform-only patch, as produced by a gizmo drag.
    pub fn transform(position: Vector3<f32>, rotation: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position: Some(position),
            rotation: Some(rotation),
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, node: &mut SceneNode) {
        if let Some(name) = self.name {
            node.name = name;
        }
        if let Some(kind) = self.kind {
            node.set_kind(kind);
        }
        if let Some(position) = self.position {
            node.set_position(position);
        }
        if let Some(rotation) = self.rotation {
            node.set_rotation(rotation);
        }
        if let Some(scale) = self.scale {
            node.set_scale(scale);
        }
        if let Some(color) = self.color {
            node.set_color(color);
        }
    }
}

/// Clamps each axis to at least [`MIN_SCALE`]. NaN also becomes the floor.
pub fn clamp_scale(scale: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        clamp_axis(scale.x),
        clamp_axis(scale.y),
        clamp_axis(scale.z),
    )
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        MIN_SCALE
    } else {
        value.max(MIN_SCALE)
    }
}

/// `true` for `#rrggbb` strings.
pub fn is_hex_color(color: &str) -> bool {
    parse_hex_color(color).is_some()
}

/// Parses `#rrggbb` into linear 0..1 RGB components.
pub fn parse_hex_color(color: &str) -> Option<[f32; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([
        channel(0)? as f32 / 255.0,
        channel(2)? as f32 / 255.0,
        channel(4)? as f32 / 255.0,
    ])
}

/// Formats RGB components (0..1) as `#rrggbb`.
pub fn to_hex_color(rgb: [f32; 3]) -> String {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", byte(rgb[0]), byte(rgb[1]), byte(rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_clamped_on_construction() {
        let node = SceneNode::new("a", NodeKind::Box).with_scale(Vector3::new(0.05, -3.0, 2.0));
        assert_eq!(node.scale(), Vector3::new(0.1, 0.1, 2.0));
    }

    #[test]
    fn test_missing_rotation_reads_as_zero() {
        let node = SceneNode::new("a", NodeKind::Sphere).with_rotation(None);
        assert!(!node.has_rotation());
        assert_eq!(node.rotation(), Vector3::zero());
    }

    #[test]
    fn test_group_has_no_color() {
        let group = SceneNode::new("g", NodeKind::Group).with_color("#123456");
        assert_eq!(group.color(), None);
        assert_eq!(group.display_color("#ff8800"), None);

        let cone = SceneNode::new("c", NodeKind::Cone);
        assert_eq!(cone.display_color("#ff8800"), Some("#ff8800"));
    }

    #[test]
    fn test_switching_to_group_drops_color() {
        let mut node = SceneNode::new("a", NodeKind::Box).with_color("#00ff00");
        NodePatch {
            kind: Some(NodeKind::Group),
            ..Default::default()
        }
        .apply(&mut node);
        assert_eq!(node.color(), None);
    }

    #[test]
    fn test_patch_ignores_invalid_color() {
        let mut node = SceneNode::new("a", NodeKind::Box).with_color("#00ff00");
        NodePatch {
            color: Some(Some("green".into())),
            ..Default::default()
        }
        .apply(&mut node);
        assert_eq!(node.color(), Some("#00ff00"));
    }

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(parse_hex_color("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(parse_hex_color("ff0000"), None);
        assert_eq!(parse_hex_color("#ff00"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        assert_eq!(to_hex_color([1.0, 0.533, 0.0]), "#ff8800");
    }

    #[test]
    fn test_root_node() {
        let root = SceneNode::root();
        assert!(root.is_root());
        assert_eq!(root.kind(), NodeKind::Group);
        assert_eq!(root.parent(), None);
    }
}
