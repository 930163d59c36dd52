//! # Graphics Module
//!
//! Everything the editor knows about 3D: the scene graph, the transform codec,
//! the transform gizmo, and the render list handed to an external renderer.
//!
//! ## Architecture Overview
//!
//! - **Scene Graph** ([`scene`]) - Node store and hierarchy moves
//! - **Transform Codec** ([`transform`]) - Position/rotation/scale to and from matrices
//! - **Gizmos** ([`gizmos`]) - Interactive transform handle bound to the selection
//! - **Render List** ([`render_list`]) - Per-frame draw items and GPU instance records
//!
//! Rendering is a pure function of scene state: nothing in here caches node data
//! between frames.

pub mod gizmos;
pub mod render_list;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use render_list::{RenderItem, SceneRenderer};
pub use transform::Transform;
