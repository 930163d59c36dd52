//! Hierarchy mutations: moving a node under a new parent.
//!
//! Sibling order is the relative order of same-parent nodes in the flat collection,
//! so a move re-inserts the node next to the sibling named by the insertion hint.

use crate::error::SceneError;

use super::node::NodeId;
use super::scene::Scene;

impl Scene {
    /// Moves `dragged` under `new_parent` (`None` makes it top-level), placing it at
    /// sibling position `hint`.
    ///
    /// A hint past the last sibling appends. When the node moves later within its
    /// current parent the hint refers to the list before the move, so it is shifted
    /// by one to account for the vacated slot.
    ///
    /// # Errors
    /// - [`SceneError::NoOp`] when dragging a node onto itself or dragging the root
    /// - [`SceneError::MissingTarget`] when either node does not exist
    /// - [`SceneError::CycleDetected`] when `new_parent` lies below `dragged`
    ///
    /// The scene is unchanged whenever an error is returned.
    pub fn move_node(
        &mut self,
        dragged: &NodeId,
        new_parent: Option<&NodeId>,
        hint: usize,
    ) -> Result<(), SceneError> {
        if new_parent == Some(dragged) || dragged.is_root() {
            return Err(SceneError::NoOp(dragged.clone()));
        }

        let from = self
            .position_of(dragged)
            .ok_or_else(|| SceneError::MissingTarget(dragged.clone()))?;

        if let Some(parent) = new_parent {
            if !self.contains(parent) {
                return Err(SceneError::MissingTarget(parent.clone()));
            }
            if self.is_ancestor_of(dragged, parent) {
                return Err(SceneError::CycleDetected {
                    dragged: dragged.clone(),
                    new_parent: parent.clone(),
                });
            }
        }

        let mut slot = hint;
        if self.nodes[from].parent() == new_parent {
            if let Some(current) = self.sibling_index(dragged) {
                if current < slot {
                    slot -= 1;
                }
            }
        }

        let mut node = self.nodes.remove(from);
        node.set_parent(new_parent.cloned());

        let insert_at = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, other)| other.parent() == new_parent)
            .nth(slot)
            .map(|(i, _)| i)
            .unwrap_or(self.nodes.len());
        self.nodes.insert(insert_at, node);

        log::info!(
            "Moved {} under {} at index {}",
            dragged,
            new_parent.map_or("<top level>", NodeId::as_str),
            slot
        );
        Ok(())
    }
}
