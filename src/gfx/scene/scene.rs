use crate::config::RemovalPolicy;
use crate::error::SceneError;

use super::node::{NodeId, NodeKind, NodePatch, SceneNode};

/// Authoritative list of scene nodes.
///
/// Nodes live in a flat collection and point at their parent. The relative order of
/// nodes sharing a parent is their sibling order; global position carries no meaning.
/// A synthetic `root` group is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub(super) nodes: Vec<SceneNode>,
}

/// A child returned by [`Scene::children`], numbered for that call only.
#[derive(Debug, Clone, Copy)]
pub struct Sibling<'a> {
    pub index: usize,
    pub node: &'a SceneNode,
}

impl Scene {
    /// Creates a scene holding only the synthetic root.
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::root()],
        }
    }

    /// Appends a node.
    ///
    /// # Errors
    /// [`SceneError::DuplicateId`] if the id is taken, [`SceneError::MissingTarget`]
    /// if the node names a parent that does not exist. The scene is untouched on error.
    pub fn add(&mut self, mut node: SceneNode) -> Result<(), SceneError> {
        if self.contains(node.id()) {
            return Err(SceneError::DuplicateId(node.id().clone()));
        }
        if let Some(parent) = node.parent() {
            if !self.contains(parent) {
                return Err(SceneError::MissingTarget(parent.clone()));
            }
        }

        node.clamp_in_place();
        log::debug!("Added {} `{}` ({})", node.kind(), node.name, node.id());
        self.nodes.push(node);
        Ok(())
    }

    /// Applies `patch` to the node with `id`.
    ///
    /// Updates aimed at a missing node (or at the root) are dropped without touching
    /// the scene. Returns whether the patch was applied.
    pub fn update(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        if id.is_root() {
            log::debug!("Ignoring update of the root node");
            return false;
        }
        match self.get_mut(id) {
            Some(node) => {
                patch.apply(node);
                true
            }
            None => {
                log::debug!("Dropping update for missing node {}", id);
                false
            }
        }
    }

    /// Gets a node by id
    pub fn get(&self, id: &NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub(super) fn get_mut(&mut self, id: &NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    pub(super) fn position_of(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when nothing but the root is present.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(SceneNode::is_root)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Nodes whose parent is `parent` (`None` for top level), in sibling order.
    pub fn children(&self, parent: Option<&NodeId>) -> Vec<Sibling<'_>> {
        self.nodes
            .iter()
            .filter(|node| node.parent() == parent)
            .enumerate()
            .map(|(index, node)| Sibling { index, node })
            .collect()
    }

    /// Position of `id` among the nodes sharing its parent.
    pub fn sibling_index(&self, id: &NodeId) -> Option<usize> {
        let node = self.get(id)?;
        self.nodes
            .iter()
            .filter(|other| other.parent() == node.parent())
            .position(|other| other.id() == id)
    }

    /// Walks parent links upward from `id`, nearest ancestor first.
    ///
    /// The walk is capped at the node count so it finishes even on a corrupted
    /// (cyclic) collection.
    pub fn ancestors<'a>(&'a self, id: &NodeId) -> Ancestors<'a> {
        Ancestors {
            scene: self,
            next: self.get(id).and_then(|node| node.parent()),
            remaining: self.nodes.len(),
        }
    }

    /// `true` if `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor_of(&self, ancestor: &NodeId, id: &NodeId) -> bool {
        self.ancestors(id).any(|candidate| candidate == ancestor)
    }

    /// Number of ancestors of `id`; the root sits at depth 0.
    pub fn depth(&self, id: &NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Every node below `id`, in collection order.
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.id() != id && self.is_ancestor_of(id, node.id()))
            .map(|node| node.id().clone())
            .collect()
    }

    /// Removes `id` and returns the nodes taken out of the scene.
    ///
    /// With [`RemovalPolicy::Cascade`] the whole subtree goes; with
    /// [`RemovalPolicy::Reparent`] the children take the removed node's place under
    /// its parent, keeping their order.
    pub fn remove(
        &mut self,
        id: &NodeId,
        policy: RemovalPolicy,
    ) -> Result<Vec<SceneNode>, SceneError> {
        if id.is_root() {
            return Err(SceneError::RootLocked);
        }
        let node = self
            .get(id)
            .ok_or_else(|| SceneError::MissingTarget(id.clone()))?;
        let parent = node.parent().cloned();

        let removed = match policy {
            RemovalPolicy::Cascade => {
                let doomed = self.descendants(id);
                let (removed, kept): (Vec<_>, Vec<_>) = self
                    .nodes
                    .drain(..)
                    .partition(|node| node.id() == id || doomed.contains(node.id()));
                self.nodes = kept;
                removed
            }
            RemovalPolicy::Reparent => {
                let mut children: Vec<SceneNode> = Vec::new();
                let mut rest = Vec::with_capacity(self.nodes.len());
                let mut removed = Vec::new();
                for node in self.nodes.drain(..) {
                    if node.parent() == Some(id) {
                        children.push(node);
                    } else {
                        rest.push(node);
                    }
                }
                for node in rest {
                    if node.id() == id {
                        for mut child in children.drain(..) {
                            child.set_parent(parent.clone());
                            self.nodes.push(child);
                        }
                        removed.push(node);
                    } else {
                        self.nodes.push(node);
                    }
                }
                removed
            }
        };

        log::info!(
            "Removed {} node(s) starting at {} ({:?})",
            removed.len(),
            id,
            policy
        );
        Ok(removed)
    }

    /// Gives every node without a rotation an explicit `(0, 0, 0)`.
    ///
    /// Returns how many nodes were touched.
    pub fn normalize_rotations(&mut self) -> usize {
        let mut touched = 0;
        for node in self.nodes.iter_mut().filter(|node| !node.has_rotation()) {
            let rotation = node.rotation();
            node.set_rotation(rotation);
            touched += 1;
        }
        touched
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let objects = self.nodes.iter().filter(|node| !node.is_root());
        let (groups, primitives) = objects.fold((0, 0), |(groups, primitives), node| {
            if node.kind() == NodeKind::Group {
                (groups + 1, primitives)
            } else {
                (groups, primitives + 1)
            }
        });

        SceneStatistics {
            object_count: groups + primitives,
            group_count: groups,
            primitive_count: primitives,
            max_depth: self
                .nodes
                .iter()
                .map(|node| self.depth(node.id()))
                .max()
                .unwrap_or(0),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy walk up the parent chain, see [`Scene::ancestors`].
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<&'a NodeId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if self.remaining == 0 {
            log::warn!("Parent chain does not terminate near {}, stopping walk", current);
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        self.next = self.scene.get(current).and_then(|node| node.parent());
        Some(current)
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    /// Nodes other than the root
    pub object_count: usize,
    pub group_count: usize,
    pub primitive_count: usize,
    pub max_depth: usize,
}
