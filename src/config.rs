//! # Editor Configuration
//!
//! Tunables for object placement, default appearance, deletion policy and the
//! transform gizmo. Everything has a sensible default; use the `with_*` setters to
//! override individual values.
//!
//! ```
//! use sceneforge::config::{EditorConfig, RemovalPolicy};
//!
//! let config = EditorConfig::default()
//!     .with_default_color("#3366ff")
//!     .with_removal_policy(RemovalPolicy::Reparent);
//! assert_eq!(config.grid_columns, 3);
//! ```

use crate::gfx::scene::node::is_hex_color;

/// What happens to the descendants of a removed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Remove the whole subtree.
    #[default]
    Cascade,
    /// Hand the children over to the removed node's parent.
    Reparent,
}

/// Appearance of the interactive transform gizmo.
#[derive(Debug, Clone, PartialEq)]
pub struct GizmoStyle {
    /// Screen-space size in pixels
    pub scale: f32,
    pub line_width: f32,
    /// X, Y and Z axis colors
    pub axis_colors: [String; 3],
    pub hovered_color: String,
    /// Draw on top of scene geometry
    pub depth_test: bool,
}

impl Default for GizmoStyle {
    fn default() -> Self {
        Self {
            scale: 75.0,
            line_width: 2.0,
            axis_colors: [
                "#ff2060".to_string(),
                "#20df80".to_string(),
                "#2080ff".to_string(),
            ],
            hovered_color: "#ffff40".to_string(),
            depth_test: false,
        }
    }
}

/// Editor-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Color given to new primitives and shown when a node has none
    pub default_color: String,
    /// Number of columns in the placement grid for new objects
    pub grid_columns: usize,
    /// Distance between neighbouring grid cells
    pub grid_spacing: f32,
    /// Offset applied to the first grid cell on X and Z
    pub grid_origin: f32,
    /// Policy used by `EditorApp::remove_node`
    pub removal_policy: RemovalPolicy,
    /// How many fresh ids to try when the supplier hands out a taken one
    pub id_retry_limit: usize,
    pub gizmo: GizmoStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_color: "#ff8800".to_string(),
            grid_columns: 3,
            grid_spacing: 2.0,
            grid_origin: -2.0,
            removal_policy: RemovalPolicy::default(),
            id_retry_limit: 8,
            gizmo: GizmoStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Sets the default primitive color. Invalid hex strings are ignored.
    pub fn with_default_color(mut self, color: &str) -> Self {
        if is_hex_color(color) {
            self.default_color = color.to_string();
        } else {
            log::warn!("Ignoring invalid default color {:?}", color);
        }
        self
    }

    /// Sets the placement grid. A zero column count is treated as one column.
    pub fn with_grid(mut self, columns: usize, spacing: f32, origin: f32) -> Self {
        self.grid_columns = columns.max(1);
        self.grid_spacing = spacing;
        self.grid_origin = origin;
        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    pub fn with_id_retry_limit(mut self, limit: usize) -> Self {
        self.id_retry_limit = limit.max(1);
        self
    }

    pub fn with_gizmo_style(mut self, style: GizmoStyle) -> Self {
        self.gizmo = style;
        self
    }

    /// Grid position for the `count`-th object added to the scene.
    pub fn grid_position(&self, count: usize) -> [f32; 3] {
        let columns = self.grid_columns.max(1);
        let row = (count / columns) as f32;
        let col = (count % columns) as f32;
        [
            col * self.grid_spacing + self.grid_origin,
            0.0,
            row * self.grid_spacing + self.grid_origin,
        ]
    }
}
