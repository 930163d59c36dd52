//! # Transform Gizmo
//!
//! Translate/rotate/scale handle attached to the selected node.
//!
//! The gizmo is mounted against a selection revision. Whenever the selection
//! controller reports a new revision (including re-selecting the same node) the
//! gizmo remounts: any drag in progress is dropped and the matrix is reloaded from
//! the scene.

use cgmath::{Matrix4, SquareMatrix};
use imgui::Ui;

use crate::config::GizmoStyle;
use crate::gfx::gizmos::traits::Gizmo;
use crate::gfx::scene::{NodeId, NodePatch, Scene};
use crate::gfx::transform::{self, Transform};
use crate::selection::SelectionController;

pub struct TransformGizmo {
    enabled: bool,
    style: GizmoStyle,
    target: Option<NodeId>,
    /// Selection revision this gizmo was last mounted for
    mounted_at: Option<u64>,
    matrix: Matrix4<f32>,
    dragging: bool,
}

impl TransformGizmo {
    pub fn new(style: GizmoStyle) -> Self {
        Self {
            enabled: true,
            style,
            target: None,
            mounted_at: None,
            matrix: Matrix4::identity(),
            dragging: false,
        }
    }

    /// Node the gizmo is attached to.
    pub fn target(&self) -> Option<&NodeId> {
        self.target.as_ref()
    }

    /// Matrix the handle is currently drawn with.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn style(&self) -> &GizmoStyle {
        &self.style
    }

    /// Key identifying the current mount: `<node id>-<revision>`.
    pub fn mount_key(&self) -> Option<String> {
        match (&self.target, self.mounted_at) {
            (Some(id), Some(revision)) => Some(format!("{}-{}", id, revision)),
            _ => None,
        }
    }

    /// Applies an intermediate drag matrix to the target node.
    ///
    /// Returns `false` when there is no target or it has gone from the scene.
    pub fn drag_update(&mut self, matrix: Matrix4<f32>, scene: &mut Scene) -> bool {
        let Some(target) = self.target.clone() else {
            return false;
        };

        self.dragging = true;
        self.matrix = matrix;

        let decoded = transform::from_matrix(&matrix);
        let applied = scene.update(
            &target,
            NodePatch::transform(decoded.position, decoded.rotation, decoded.scale),
        );
        if !applied {
            log::debug!("Gizmo target {} is gone, detaching", target);
            self.detach();
        }
        applied
    }

    /// Applies the final drag matrix and ends the drag.
    pub fn drag_end(&mut self, matrix: Matrix4<f32>, scene: &mut Scene) -> bool {
        let applied = self.drag_update(matrix, scene);
        self.dragging = false;
        // Reload so clamped values show up on the handle
        self.reload(scene);
        applied
    }

    fn reload(&mut self, scene: &Scene) {
        if let Some(node) = self.target.as_ref().and_then(|id| scene.get(id)) {
            self.matrix = Transform::of(node).to_matrix();
        }
    }

    fn detach(&mut self) {
        self.target = None;
        self.dragging = false;
        self.matrix = Matrix4::identity();
    }
}

impl Default for TransformGizmo {
    fn default() -> Self {
        Self::new(GizmoStyle::default())
    }
}

impl Gizmo for TransformGizmo {
    fn sync(&mut self, selection: &SelectionController, scene: &Scene) {
        if !self.enabled {
            return;
        }

        let revision = selection.revision();
        if self.mounted_at != Some(revision) {
            self.mounted_at = Some(revision);
            self.dragging = false;
            self.target = selection.resolve(scene).map(|node| node.id().clone());
            log::trace!("Gizmo remounted at revision {}", revision);
        } else if self.target.as_ref().is_some_and(|id| !scene.contains(id)) {
            self.detach();
        }

        if self.target.is_none() {
            self.matrix = Matrix4::identity();
        } else if !self.dragging {
            self.reload(scene);
        }
    }

    fn render_ui(&mut self, ui: &Ui, scene: &Scene) {
        let Some(node) = self.target.as_ref().and_then(|id| scene.get(id)) else {
            ui.text_disabled(format!("{}: no target", self.name()));
            return;
        };
        ui.text(format!("{}: {}", self.name(), node.name));
        if self.dragging {
            ui.same_line();
            ui.text_colored([1.0, 1.0, 0.25, 1.0], "(dragging)");
        }
    }

    fn name(&self) -> &str {
        "Transform Gizmo"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        log::debug!("{} {}", self.name(), if enabled { "enabled" } else { "disabled" });
        self.enabled = enabled;
        if !enabled {
            self.detach();
            self.mounted_at = None;
        }
    }

    fn should_be_visible(&self, scene: &Scene) -> bool {
        self.enabled && self.target.as_ref().is_some_and(|id| scene.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{NodeKind, SceneNode};
    use cgmath::Vector3;

    fn setup() -> (Scene, SelectionController, TransformGizmo) {
        let mut scene = Scene::new();
        scene
            .add(
                SceneNode::new("box", NodeKind::Box)
                    .with_parent(Some(NodeId::root()))
                    .with_position(Vector3::new(1.0, 2.0, 3.0)),
            )
            .unwrap();
        (scene, SelectionController::new(), TransformGizmo::default())
    }

    #[test]
    fn test_no_selection_no_target() {
        let (scene, selection, mut gizmo) = setup();
        gizmo.sync(&selection, &scene);
        assert!(gizmo.target().is_none());
        assert!(!gizmo.should_be_visible(&scene));
    }

    #[test]
    fn test_follows_selection() {
        let (scene, mut selection, mut gizmo) = setup();
        selection.select(NodeId::from("box"));
        gizmo.sync(&selection, &scene);

        assert_eq!(gizmo.target(), Some(&NodeId::from("box")));
        assert_eq!(gizmo.matrix().w.truncate(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(gizmo.mount_key().as_deref(), Some("box-1"));
    }

    #[test]
    fn test_drag_writes_back_through_update() {
        let (mut scene, mut selection, mut gizmo) = setup();
        selection.select(NodeId::from("box"));
        gizmo.sync(&selection, &scene);

        let matrix = transform::to_matrix(
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(0.0, 0.5, 0.0),
            Vector3::new(2.0, 0.01, 1.0),
        );
        assert!(gizmo.drag_update(matrix, &mut scene));
        assert!(gizmo.is_dragging());
        assert!(gizmo.drag_end(matrix, &mut scene));
        assert!(!gizmo.is_dragging());

        let node = scene.get(&NodeId::from("box")).unwrap();
        assert!((node.position().x - 4.0).abs() < 1.0e-4);
        assert!((node.rotation().y - 0.5).abs() < 1.0e-4);
        assert!((node.scale().x - 2.0).abs() < 1.0e-4);
        assert!((node.scale().y - 0.1).abs() < 1.0e-6);
    }

    #[test]
    fn test_reselect_remounts_and_drops_drag() {
        let (mut scene, mut selection, mut gizmo) = setup();
        selection.select(NodeId::from("box"));
        gizmo.sync(&selection, &scene);
        gizmo.drag_update(Matrix4::from_translation(Vector3::new(9.0, 0.0, 0.0)), &mut scene);
        let first_key = gizmo.mount_key();

        selection.select(NodeId::from("box"));
        gizmo.sync(&selection, &scene);

        assert!(!gizmo.is_dragging());
        assert_ne!(gizmo.mount_key(), first_key);
    }

    #[test]
    fn test_drag_without_target_is_ignored() {
        let (mut scene, _, mut gizmo) = setup();
        let before = scene.clone();
        assert!(!gizmo.drag_end(Matrix4::identity(), &mut scene));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_disabled_gizmo_detaches() {
        let (scene, mut selection, mut gizmo) = setup();
        selection.select(NodeId::from("box"));
        gizmo.sync(&selection, &scene);
        {
            let handle: &mut dyn Gizmo = &mut gizmo;
            handle.set_enabled(false);
            handle.sync(&selection, &scene);
            assert!(!handle.is_enabled());
            assert_eq!(handle.name(), "Transform Gizmo");
        }
        assert!(gizmo.target().is_none());
        assert!(!gizmo.should_be_visible(&scene));
    }
}
