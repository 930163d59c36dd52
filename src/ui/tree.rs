//! # Hierarchy Tree
//!
//! Flattens the scene into the rows and drop zones drawn by the hierarchy panel,
//! and turns a drop onto one of those zones into a concrete move.
//!
//! Layout per node, top to bottom:
//!
//! 1. `before` zone (not for top-level nodes)
//! 2. the node row itself
//! 3. `child` zone
//! 4. the node's children, recursively
//! 5. `between` zone, only when a following sibling exists (not for top-level nodes)
//! 6. `after` zone, only for the last sibling or a childless node (not for top-level nodes)
//!
//! Top-level reordering goes through two sentinel zones that bracket the whole list.

use std::fmt;

use crate::error::SceneError;
use crate::gfx::scene::{NodeId, NodeKind, Scene, SceneNode};

/// Meaning of a drop zone relative to its target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropKind {
    Before,
    After,
    Between,
    Child,
}

impl DropKind {
    pub fn tag(self) -> &'static str {
        match self {
            DropKind::Before => "before",
            DropKind::After => "after",
            DropKind::Between => "between",
            DropKind::Child => "child",
        }
    }
}

impl fmt::Display for DropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// What a drop zone is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneTarget {
    Node(NodeId),
    /// Above every top-level node
    RootTop,
    /// Below every top-level node
    RootBottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DropZone {
    pub target: ZoneTarget,
    pub kind: DropKind,
    /// Indentation level
    pub depth: usize,
}

impl DropZone {
    fn node(id: &NodeId, kind: DropKind, depth: usize) -> Self {
        Self {
            target: ZoneTarget::Node(id.clone()),
            kind,
            depth,
        }
    }

    /// Id of the node this zone belongs to; `None` for the sentinels.
    pub fn base_id(&self) -> Option<&NodeId> {
        match &self.target {
            ZoneTarget::Node(id) => Some(id),
            ZoneTarget::RootTop | ZoneTarget::RootBottom => None,
        }
    }

    /// Whether `dragged` may be dropped here. Dropping a node onto its own zones is refused.
    pub fn can_drop(&self, dragged: &NodeId) -> bool {
        self.base_id() != Some(dragged)
    }

    /// Stable key for widget ids.
    pub fn key(&self) -> String {
        match &self.target {
            ZoneTarget::Node(id) => format!("{}-{}", id, self.kind),
            ZoneTarget::RootTop => "root-top-before".to_string(),
            ZoneTarget::RootBottom => "root-bottom-after".to_string(),
        }
    }
}

/// One visible node row.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub parent_id: Option<NodeId>,
    pub depth: usize,
    pub sibling_index: usize,
    pub has_children: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreeEntry {
    Node(TreeRow),
    Zone(DropZone),
}

/// The hierarchy panel contents, rebuilt from the scene each frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    entries: Vec<TreeEntry>,
}

impl TreeLayout {
    pub fn build(scene: &Scene, selected: Option<&NodeId>) -> Self {
        let mut layout = Self::default();

        layout.entries.push(TreeEntry::Zone(DropZone {
            target: ZoneTarget::RootTop,
            kind: DropKind::Before,
            depth: 0,
        }));

        let top_level = scene.children(None);
        let count = top_level.len();
        for sibling in top_level {
            layout.push_node(scene, selected, sibling.node, sibling.index, count, 0);
        }

        layout.entries.push(TreeEntry::Zone(DropZone {
            target: ZoneTarget::RootBottom,
            kind: DropKind::After,
            depth: 0,
        }));
        layout
    }

    fn push_node(
        &mut self,
        scene: &Scene,
        selected: Option<&NodeId>,
        node: &SceneNode,
        index: usize,
        sibling_count: usize,
        depth: usize,
    ) {
        let id = node.id();
        let top_level = node.parent().is_none();
        let children = scene.children(Some(id));

        if !top_level {
            self.entries
                .push(TreeEntry::Zone(DropZone::node(id, DropKind::Before, depth)));
        }

        self.entries.push(TreeEntry::Node(TreeRow {
            id: id.clone(),
            name: node.name.clone(),
            kind: node.kind(),
            parent_id: node.parent().cloned(),
            depth,
            sibling_index: index,
            has_children: !children.is_empty(),
            selected: selected == Some(id),
        }));

        self.entries
            .push(TreeEntry::Zone(DropZone::node(id, DropKind::Child, depth)));

        // Parent links are acyclic, this only guards a corrupted collection
        if depth < scene.len() {
            let count = children.len();
            for child in &children {
                self.push_node(scene, selected, child.node, child.index, count, depth + 1);
            }
        }

        if top_level {
            return;
        }
        let is_last = index + 1 == sibling_count;
        if !is_last {
            self.entries
                .push(TreeEntry::Zone(DropZone::node(id, DropKind::Between, depth)));
        }
        if is_last || children.is_empty() {
            self.entries
                .push(TreeEntry::Zone(DropZone::node(id, DropKind::After, depth)));
        }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn rows(&self) -> impl Iterator<Item = &TreeRow> {
        self.entries.iter().filter_map(|entry| match entry {
            TreeEntry::Node(row) => Some(row),
            TreeEntry::Zone(_) => None,
        })
    }

    pub fn zones(&self) -> impl Iterator<Item = &DropZone> {
        self.entries.iter().filter_map(|entry| match entry {
            TreeEntry::Zone(zone) => Some(zone),
            TreeEntry::Node(_) => None,
        })
    }

    /// Looks a zone up by its [`DropZone::key`].
    pub fn find_zone(&self, key: &str) -> Option<&DropZone> {
        self.zones().find(|zone| zone.key() == key)
    }
}

/// Payload carried by a drag from the hierarchy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
}

impl DragItem {
    pub fn of(node: &SceneNode) -> Self {
        Self {
            id: node.id().clone(),
            parent_id: node.parent().cloned(),
        }
    }
}

/// Arguments for [`Scene::move_node`] produced by a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub dragged: NodeId,
    pub new_parent: Option<NodeId>,
    pub hint: usize,
}

impl MoveRequest {
    pub fn apply(&self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.move_node(&self.dragged, self.new_parent.as_ref(), self.hint)
    }
}

/// Translates dropping `dragged` onto `zone` into a move.
///
/// - `before` / `between`: same parent as the target, at the target's index, so the
///   dragged node lands above the target
/// - `after`: same parent as the target, one past the target's index
/// - `child`: first child of the target
/// - top sentinel: first top-level slot; bottom sentinel: last top-level slot
///
/// # Errors
/// [`SceneError::NoOp`] for a drop onto the dragged node's own zones,
/// [`SceneError::MissingTarget`] when the zone's node no longer exists.
pub fn resolve_drop(
    scene: &Scene,
    dragged: &NodeId,
    zone: &DropZone,
) -> Result<MoveRequest, SceneError> {
    if !zone.can_drop(dragged) {
        log::debug!("Ignoring drop of {} onto itself", dragged);
        return Err(SceneError::NoOp(dragged.clone()));
    }

    let (new_parent, hint) = match &zone.target {
        ZoneTarget::RootTop => (None, 0),
        ZoneTarget::RootBottom => (None, scene.children(None).len()),
        ZoneTarget::Node(target_id) => {
            let target = scene
                .get(target_id)
                .ok_or_else(|| SceneError::MissingTarget(target_id.clone()))?;
            let index = scene.sibling_index(target_id).unwrap_or(0);
            match zone.kind {
                DropKind::Before | DropKind::Between => (target.parent().cloned(), index),
                DropKind::After => (target.parent().cloned(), index + 1),
                DropKind::Child => (Some(target_id.clone()), 0),
            }
        }
    };

    log::debug!("Dropping {} onto {} as {}", dragged, zone.key(), zone.kind);
    Ok(MoveRequest {
        dragged: dragged.clone(),
        new_parent,
        hint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn under(id: &str, parent: &str, kind: NodeKind) -> SceneNode {
        SceneNode::new(id, kind).with_parent(Some(NodeId::from(parent)))
    }

    /// root -> [a -> [a1, a2], b]
    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(under("a", "root", NodeKind::Group)).unwrap();
        scene.add(under("a1", "a", NodeKind::Box)).unwrap();
        scene.add(under("a2", "a", NodeKind::Sphere)).unwrap();
        scene.add(under("b", "root", NodeKind::Cone)).unwrap();
        scene
    }

    fn keys(layout: &TreeLayout) -> Vec<String> {
        layout
            .entries()
            .iter()
            .map(|entry| match entry {
                TreeEntry::Node(row) => format!("[{}]", row.id),
                TreeEntry::Zone(zone) => zone.key(),
            })
            .collect()
    }

    #[test]
    fn test_layout_order() {
        let layout = TreeLayout::build(&scene(), None);
        assert_eq!(
            keys(&layout),
            vec![
                "root-top-before",
                "[root]",
                "root-child",
                "a-before",
                "[a]",
                "a-child",
                "a1-before",
                "[a1]",
                "a1-child",
                "a1-between",
                "a1-after",
                "a2-before",
                "[a2]",
                "a2-child",
                "a2-after",
                "a-between",
                "b-before",
                "[b]",
                "b-child",
                "b-after",
                "root-bottom-after",
            ]
        );
    }

    #[test]
    fn test_rows_carry_depth_index_and_selection() {
        let selected = NodeId::from("a2");
        let layout = TreeLayout::build(&scene(), Some(&selected));
        let a2 = layout.rows().find(|row| row.id == selected).unwrap();
        assert_eq!(a2.depth, 2);
        assert_eq!(a2.sibling_index, 1);
        assert!(a2.selected);
        assert_eq!(layout.rows().filter(|row| row.selected).count(), 1);

        let a = layout.rows().find(|row| row.id.as_str() == "a").unwrap();
        assert!(a.has_children);
    }

    #[test]
    fn test_top_level_only_uses_sentinels() {
        let layout = TreeLayout::build(&scene(), None);
        for kind in [DropKind::Before, DropKind::After, DropKind::Between] {
            assert!(layout.find_zone(&format!("root-{}", kind)).is_none());
        }
    }

    #[test]
    fn test_resolve_each_kind() {
        let scene = scene();
        let b = NodeId::from("b");
        let a2 = NodeId::from("a2");
        let resolve = |kind| {
            resolve_drop(&scene, &b, &DropZone::node(&a2, kind, 2)).unwrap()
        };

        let before = resolve(DropKind::Before);
        assert_eq!(before.new_parent, Some(NodeId::from("a")));
        assert_eq!(before.hint, 1);

        assert_eq!(resolve(DropKind::Between).hint, 1);
        assert_eq!(resolve(DropKind::After).hint, 2);

        let child = resolve(DropKind::Child);
        assert_eq!(child.new_parent, Some(a2.clone()));
        assert_eq!(child.hint, 0);
    }

    #[test]
    fn test_resolve_sentinels() {
        let scene = scene();
        let dragged = NodeId::from("a1");
        let layout = TreeLayout::build(&scene, None);

        let top = layout.find_zone("root-top-before").unwrap();
        let request = resolve_drop(&scene, &dragged, top).unwrap();
        assert_eq!((request.new_parent, request.hint), (None, 0));

        let bottom = layout.find_zone("root-bottom-after").unwrap();
        let request = resolve_drop(&scene, &dragged, bottom).unwrap();
        assert_eq!((request.new_parent, request.hint), (None, 1));
    }

    #[test]
    fn test_self_drop_is_refused() {
        let mut scene = scene();
        let before = scene.clone();
        let a = NodeId::from("a");
        let layout = TreeLayout::build(&scene, None);

        for zone in layout.zones().filter(|zone| zone.base_id() == Some(&a)) {
            assert!(!zone.can_drop(&a));
            assert_eq!(
                resolve_drop(&scene, &a, zone),
                Err(SceneError::NoOp(a.clone()))
            );
        }
        assert_eq!(scene, before);

        // ...while dropping onto a descendant is caught by the move itself
        let zone = layout.find_zone("a1-child").unwrap();
        let request = resolve_drop(&scene, &a, zone).unwrap();
        assert!(matches!(
            request.apply(&mut scene),
            Err(SceneError::CycleDetected { .. })
        ));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_between_drop_lands_before_target() {
        let mut scene = Scene::new();
        for id in ["a", "b", "c"] {
            scene.add(under(id, "root", NodeKind::Box)).unwrap();
        }
        let layout = TreeLayout::build(&scene, None);
        let zone = layout.find_zone("a-between").unwrap();

        resolve_drop(&scene, &NodeId::from("c"), zone)
            .unwrap()
            .apply(&mut scene)
            .unwrap();

        let order: Vec<&str> = scene
            .children(Some(&NodeId::root()))
            .iter()
            .map(|s| s.node.id().as_str())
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_drop_reorders_siblings() {
        let mut scene = scene();
        let layout = TreeLayout::build(&scene, None);
        let zone = layout.find_zone("a1-before").unwrap();

        resolve_drop(&scene, &NodeId::from("a2"), zone)
            .unwrap()
            .apply(&mut scene)
            .unwrap();

        let order: Vec<&str> = scene
            .children(Some(&NodeId::from("a")))
            .iter()
            .map(|s| s.node.id().as_str())
            .collect();
        assert_eq!(order, vec!["a2", "a1"]);
    }

    #[test]
    fn test_ids_containing_dashes_resolve() {
        let mut scene = Scene::new();
        scene
            .add(under("3f2a-77b1", "root", NodeKind::Box))
            .unwrap();
        scene.add(under("other", "root", NodeKind::Box)).unwrap();
        let layout = TreeLayout::build(&scene, None);

        let zone = layout.find_zone("3f2a-77b1-child").unwrap();
        assert_eq!(zone.base_id(), Some(&NodeId::from("3f2a-77b1")));
        assert!(zone.can_drop(&NodeId::from("other")));
        assert!(!zone.can_drop(&NodeId::from("3f2a-77b1")));
    }

    #[test]
    fn test_missing_target() {
        let scene = scene();
        let zone = DropZone::node(&NodeId::from("ghost"), DropKind::After, 1);
        assert_eq!(
            resolve_drop(&scene, &NodeId::from("b"), &zone),
            Err(SceneError::MissingTarget(NodeId::from("ghost")))
        );
    }
}
