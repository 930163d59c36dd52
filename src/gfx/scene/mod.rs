//! # Scene Graph
//!
//! This module holds the editor's scene graph: a flat collection of nodes linked to
//! their parents, plus the operations that mutate it without ever breaking the
//! hierarchy.
//!
//! ## Key Components
//!
//! - [`Scene`] - The node store: add, update, query, move and remove
//! - [`SceneNode`] - A primitive shape or group with its local transform and color
//! - [`NodePatch`] - Partial update applied by forms and gizmo drags
//! - [`IdSupplier`] - Source of fresh, unique node ids
//!
//! ## Usage
//!
//! ```
//! use sceneforge::gfx::scene::{NodeId, NodeKind, Scene, SceneNode};
//!
//! let mut scene = Scene::new();
//! let cube = SceneNode::new("cube", NodeKind::Box).with_parent(Some(NodeId::root()));
//! scene.add(cube).unwrap();
//!
//! let group = SceneNode::new("group", NodeKind::Group).with_parent(Some(NodeId::root()));
//! scene.add(group).unwrap();
//!
//! scene.move_node(&NodeId::from("cube"), Some(&NodeId::from("group")), 0).unwrap();
//! assert_eq!(scene.depth(&NodeId::from("cube")), 2);
//! ```
//!
//! ## Invariants
//!
//! - Ids are unique across the scene
//! - Parent links never form a cycle and always point at an existing node
//! - Scale is at least [`MIN_SCALE`] on every axis
//! - Sibling indices are derived on every query, never stored

pub mod hierarchy;
pub mod id;
pub mod node;
pub mod scene;

// Re-export main types
pub use id::{IdSupplier, RandomIdSupplier, SequentialIdSupplier};
pub use node::{NodeId, NodeKind, NodePatch, SceneNode, MIN_SCALE, ROOT_ID};
pub use scene::{Ancestors, Scene, SceneStatistics, Sibling};
