//! # Selection Controller
//!
//! Single-selection state shared by the viewport and the hierarchy tree.
//!
//! Every call to [`SelectionController::select`] bumps the selection revision and
//! notifies listeners, even when the same node is picked again. The transform gizmo
//! keys its mount on that revision, so re-selecting a node resets any half-finished
//! drag state.

use std::fmt;

use crate::gfx::scene::{NodeId, Scene, SceneNode};

/// Notification sent to selection listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<NodeId>,
    pub current: Option<NodeId>,
    /// Revision after this change
    pub revision: u64,
}

impl SelectionChange {
    /// `true` when a different node (or none) is now selected.
    pub fn identity_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Handle returned by [`SelectionController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type SelectionListener = Box<dyn FnMut(&SelectionChange)>;

/// Owns the id of the selected node, if any.
pub struct SelectionController {
    selected: Option<NodeId>,
    revision: u64,
    listeners: Vec<(ListenerId, SelectionListener)>,
    next_listener: u64,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            selected: None,
            revision: 0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Selects `id`. Always notifies, even if `id` was already selected.
    ///
    /// The id is not checked against the scene; use [`resolve`](Self::resolve)
    /// to look the node up.
    pub fn select(&mut self, id: NodeId) -> SelectionChange {
        log::debug!("Selecting {}", id);
        let previous = self.selected.replace(id);
        self.notify(previous)
    }

    /// Clears the selection. Listeners only hear about it if something was selected.
    pub fn clear(&mut self) -> Option<SelectionChange> {
        let previous = self.selected.take()?;
        log::debug!("Cleared selection of {}", previous);
        Some(self.notify(Some(previous)))
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Number of selection changes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The selected node, or `None` if nothing is selected or it is gone from `scene`.
    pub fn resolve<'a>(&self, scene: &'a Scene) -> Option<&'a SceneNode> {
        self.selected.as_ref().and_then(|id| scene.get(id))
    }

    /// Drops the selection if it no longer points at a node in `scene`.
    pub fn forget_missing(&mut self, scene: &Scene) -> bool {
        let missing = self
            .selected
            .as_ref()
            .is_some_and(|id| !scene.contains(id));
        missing && self.clear().is_some()
    }

    /// Registers a listener called after every selection change.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&SelectionChange) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, previous: Option<NodeId>) -> SelectionChange {
        self.revision += 1;
        let change = SelectionChange {
            previous,
            current: self.selected.clone(),
            revision: self.revision,
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
        change
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("selected", &self.selected)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
