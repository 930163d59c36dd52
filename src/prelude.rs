//! # Sceneforge Prelude
//!
//! Commonly used types in one import.
//!
//! ```
//! use sceneforge::prelude::*;
//!
//! let mut app = EditorApp::new(EditorConfig::default());
//! let id = app.add_primitive("", NodeKind::Box).unwrap();
//! app.handle_viewport_event(ViewportEvent::BackgroundClicked);
//! assert!(app.scene().contains(&id));
//! ```

// Re-export core application types
pub use crate::app::{EditorApp, ViewportEvent};
pub use crate::config::{EditorConfig, GizmoStyle, RemovalPolicy};
pub use crate::error::SceneError;

// Re-export graphics and scene types
pub use crate::gfx::gizmos::{Gizmo, TransformGizmo};
pub use crate::gfx::render_list::{RenderItem, SceneRenderer};
pub use crate::gfx::scene::{IdSupplier, NodeId, NodeKind, NodePatch, Scene, SceneNode};
pub use crate::gfx::transform::Transform;

// Re-export selection and UI types
pub use crate::selection::{SelectionChange, SelectionController};
pub use crate::ui::property::{Axis, PropertyEdit, PropertySheet};
pub use crate::ui::tree::{DropKind, DropZone, TreeLayout};

// Re-export common external types
pub use cgmath::{Matrix4, Vector3};
pub use imgui::Ui;
