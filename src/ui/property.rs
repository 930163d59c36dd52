//! Form-panel logic: turning raw field input into node patches.
//!
//! Numeric fields accept the leading number of whatever was typed, the way a
//! browser number input does. Position and rotation fall back to `0` and scale
//! falls back to [`MIN_SCALE`] when nothing usable was entered.

use cgmath::Vector3;

use crate::gfx::scene::node::{is_hex_color, parse_hex_color};
use crate::gfx::scene::{NodeId, NodeKind, NodePatch, Scene, SceneNode, MIN_SCALE};
use crate::selection::SelectionController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    fn set(self, vector: &mut Vector3<f32>, value: f32) {
        match self {
            Axis::X => vector.x = value,
            Axis::Y => vector.y = value,
            Axis::Z => vector.z = value,
        }
    }
}

/// A single field edit as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    Name(String),
    Position(Axis, String),
    Rotation(Axis, String),
    Scale(Axis, String),
    /// `#rrggbb`
    Color(String),
}

/// Builds the patch for `edit` against the current state of `node`.
///
/// Returns an empty patch when the edit does not apply (color on a group, or an
/// invalid hex string).
pub fn property_patch(node: &SceneNode, edit: PropertyEdit) -> NodePatch {
    match edit {
        PropertyEdit::Name(name) => NodePatch::name(name),
        PropertyEdit::Position(axis, text) => {
            let mut position = node.position();
            axis.set(&mut position, parse_or(&text, 0.0));
            NodePatch {
                position: Some(position),
                ..Default::default()
            }
        }
        PropertyEdit::Rotation(axis, text) => {
            let mut rotation = node.rotation();
            axis.set(&mut rotation, parse_or(&text, 0.0));
            NodePatch {
                rotation: Some(rotation),
                ..Default::default()
            }
        }
        PropertyEdit::Scale(axis, text) => {
            let mut scale = node.scale();
            axis.set(&mut scale, parse_or(&text, MIN_SCALE).max(MIN_SCALE));
            NodePatch {
                scale: Some(scale),
                ..Default::default()
            }
        }
        PropertyEdit::Color(color) => {
            if node.kind() == NodeKind::Group || !is_hex_color(&color) {
                log::debug!("Ignoring color `{}` for {}", color, node.id());
                return NodePatch::default();
            }
            NodePatch {
                color: Some(Some(color)),
                ..Default::default()
            }
        }
    }
}

/// Leading number in `text`, or `fallback` when there is none or it is zero.
pub fn parse_or(text: &str, fallback: f32) -> f32 {
    let text = text.trim_start();
    text[..numeric_prefix_len(text)]
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite() && *value != 0.0)
        .unwrap_or(fallback)
}

/// Length of the longest `[+-]digits[.digits][(e|E)[+-]digits]` prefix.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start.min(bytes.len())..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    end
}

/// Snapshot of the selected node, as shown in the properties panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySheet {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    /// `None` for groups, which have no color field
    pub color: Option<String>,
}

impl PropertySheet {
    /// The sheet for the current selection, or `None` when nothing is selected or
    /// the selected id no longer resolves. `None` means the panel is hidden.
    pub fn for_selection(
        scene: &Scene,
        selection: &SelectionController,
        default_color: &str,
    ) -> Option<Self> {
        selection
            .resolve(scene)
            .map(|node| Self::of(node, default_color))
    }

    pub fn of(node: &SceneNode, default_color: &str) -> Self {
        Self {
            id: node.id().clone(),
            name: node.name.clone(),
            kind: node.kind(),
            position: node.position().into(),
            rotation: node.rotation().into(),
            scale: node.scale().into(),
            color: node.display_color(default_color).map(str::to_string),
        }
    }

    /// Color as RGB floats for a color picker.
    pub fn rgb(&self) -> Option<[f32; 3]> {
        self.color.as_deref().and_then(parse_hex_color)
    }
}
