//! # Gizmos
//!
//! Interactive helpers drawn over the viewport. The editor ships one: the
//! [`TransformGizmo`] that follows the selection and writes drags back into the
//! scene.

pub mod traits;
pub mod transform_gizmo;

pub use traits::Gizmo;
pub use transform_gizmo::TransformGizmo;
