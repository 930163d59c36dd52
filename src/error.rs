//! # Scene Errors
//!
//! Every rejected scene operation leaves the store exactly as it was. None of these
//! are fatal: the editor logs them and carries on.

use thiserror::Error;

use crate::gfx::scene::NodeId;

/// Reasons a scene mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// A node with this id is already in the scene.
    #[error("node id `{0}` is already in use")]
    DuplicateId(NodeId),

    /// Moving `dragged` under `new_parent` would make it its own ancestor.
    #[error("moving `{dragged}` under `{new_parent}` would create a cycle")]
    CycleDetected { dragged: NodeId, new_parent: NodeId },

    /// Self-parenting, self-drop or any other request that has nothing to do.
    #[error("nothing to do for `{0}`")]
    NoOp(NodeId),

    /// The referenced node does not exist.
    #[error("node `{0}` not found in scene")]
    MissingTarget(NodeId),

    /// The synthetic root cannot be removed.
    #[error("the root node cannot be removed")]
    RootLocked,
}

impl SceneError {
    /// `true` for rejections that should stay silent (self-drops and friends).
    pub fn is_silent(&self) -> bool {
        matches!(self, SceneError::NoOp(_) | SceneError::MissingTarget(_))
    }
}
