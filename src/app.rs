use anyhow::{bail, Context};
use cgmath::{Matrix4, Vector3};

use crate::config::EditorConfig;
use crate::error::SceneError;
use crate::gfx::gizmos::{Gizmo, TransformGizmo};
use crate::gfx::render_list::{build_render_list, RenderItem, SceneRenderer};
use crate::gfx::scene::{
    IdSupplier, NodeId, NodeKind, NodePatch, RandomIdSupplier, Scene, SceneNode,
};
use crate::selection::SelectionController;
use crate::ui::property::{property_patch, PropertyEdit, PropertySheet};
use crate::ui::tree::{resolve_drop, DragItem, DropZone, TreeLayout};

/// Events reported by the 3D viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    NodeClicked(NodeId),
    BackgroundClicked,
    /// Intermediate gizmo matrix for the selected node
    GizmoDrag(Matrix4<f32>),
    /// Final gizmo matrix when the handle is released
    GizmoDragEnd(Matrix4<f32>),
}

/// Top-level editor controller.
///
/// Owns the scene and the selection as two separate pieces of state and routes
/// viewport, tree and form events into them. Several editors can live side by side.
pub struct EditorApp {
    scene: Scene,
    selection: SelectionController,
    gizmo: TransformGizmo,
    ids: Box<dyn IdSupplier>,
    config: EditorConfig,
    /// Objects added so far; drives grid placement
    object_count: usize,
    drag: Option<DragItem>,
}

impl EditorApp {
    /// Create a new editor with random node ids
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(),
            selection: SelectionController::new(),
            gizmo: TransformGizmo::new(config.gizmo.clone()),
            ids: Box::new(RandomIdSupplier),
            config,
            object_count: 0,
            drag: None,
        }
    }

    pub fn with_id_supplier(mut self, ids: impl IdSupplier + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Mutable access for subscribing selection listeners.
    pub fn selection_mut(&mut self) -> &mut SelectionController {
        &mut self.selection
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Draws the gizmo readout into the current window.
    pub fn render_gizmo_ui(&mut self, ui: &imgui::Ui) {
        self.gizmo.render_ui(ui, &self.scene);
    }

    // ------------------------------------------------------------------
    // Scene edits
    // ------------------------------------------------------------------

    /// Adds a primitive (or group) under the root and selects it.
    ///
    /// An empty `name` becomes `"<kind> <node count>"`. Objects are laid out on the
    /// placement grid in the order they were added.
    pub fn add_primitive(&mut self, name: &str, kind: NodeKind) -> anyhow::Result<NodeId> {
        let name = if name.is_empty() {
            format!("{} {}", kind, self.scene.len())
        } else {
            name.to_string()
        };
        let position = Vector3::from(self.config.grid_position(self.object_count));

        let mut attempts = 0;
        let id = loop {
            if attempts > self.config.id_retry_limit {
                bail!("no free node id after {} attempts", attempts);
            }
            attempts += 1;

            let id = self.ids.next_id();
            let mut node = SceneNode::new(id.clone(), kind)
                .with_name(name.clone())
                .with_parent(Some(NodeId::root()))
                .with_position(position);
            if kind.has_geometry() {
                node = node.with_color(self.config.default_color.clone());
            }

            match self.scene.add(node) {
                Ok(()) => break id,
                Err(SceneError::DuplicateId(taken)) => {
                    log::warn!("Id supplier returned taken id {}, retrying", taken);
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("failed to add {} `{}`", kind, name))
                }
            }
        };

        self.object_count += 1;
        log::info!("Added {} `{}` as {}", kind, name, id);
        self.selection.select(id.clone());
        Ok(id)
    }

    /// Applies a patch; a missing target is dropped silently.
    pub fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        self.scene.update(id, patch)
    }

    /// Applies a single form edit to `id`.
    pub fn apply_edit(&mut self, id: &NodeId, edit: PropertyEdit) -> bool {
        let Some(node) = self.scene.get(id) else {
            log::debug!("Dropping edit for missing node {}", id);
            return false;
        };
        let patch = property_patch(node, edit);
        !patch.is_empty() && self.scene.update(id, patch)
    }

    /// Moves a node in the hierarchy.
    ///
    /// Rejections are logged and leave the scene untouched.
    pub fn move_node(
        &mut self,
        dragged: &NodeId,
        new_parent: Option<&NodeId>,
        hint: usize,
    ) -> Result<(), SceneError> {
        let result = self.scene.move_node(dragged, new_parent, hint);
        if let Err(err) = &result {
            if err.is_silent() {
                log::debug!("Move ignored: {}", err);
            } else {
                log::warn!("Move rejected: {}", err);
            }
        }
        result
    }

    /// Removes a node using the configured removal policy.
    ///
    /// Clears the selection when the selected node went with it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Vec<SceneNode>, SceneError> {
        let removed = self.scene.remove(id, self.config.removal_policy)?;
        if self.selection.forget_missing(&self.scene) {
            log::debug!("Selection removed along with {}", id);
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selects `id`. The root is locked and never selectable.
    pub fn select(&mut self, id: NodeId) -> bool {
        if id.is_root() {
            log::debug!("Root is not selectable");
            return false;
        }
        self.selection.select(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The selected node, if the selection still resolves.
    pub fn selected_node(&self) -> Option<&SceneNode> {
        self.selection.resolve(&self.scene)
    }

    /// Contents of the properties panel; `None` hides it.
    pub fn property_sheet(&self) -> Option<PropertySheet> {
        PropertySheet::for_selection(&self.scene, &self.selection, &self.config.default_color)
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    pub fn handle_viewport_event(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::NodeClicked(id) => {
                self.select(id);
            }
            ViewportEvent::BackgroundClicked => {
                self.selection.clear();
            }
            ViewportEvent::GizmoDrag(matrix) => {
                self.gizmo.sync(&self.selection, &self.scene);
                self.gizmo.drag_update(matrix, &mut self.scene);
            }
            ViewportEvent::GizmoDragEnd(matrix) => {
                self.gizmo.sync(&self.selection, &self.scene);
                self.gizmo.drag_end(matrix, &mut self.scene);
            }
        }
    }

    /// Brings the gizmo up to date and builds this frame's render list.
    pub fn render_items(&mut self) -> Vec<RenderItem> {
        self.gizmo.sync(&self.selection, &self.scene);
        build_render_list(
            &self.scene,
            self.selection.selected(),
            &self.config.default_color,
        )
    }

    pub fn draw(&mut self, renderer: &mut dyn SceneRenderer) {
        let items = self.render_items();
        renderer.draw(&items);
    }

    // ------------------------------------------------------------------
    // Hierarchy tree
    // ------------------------------------------------------------------

    pub fn tree_layout(&self) -> TreeLayout {
        TreeLayout::build(&self.scene, self.selection.selected())
    }

    /// Starts dragging `id` in the tree. The root cannot be dragged.
    pub fn begin_drag(&mut self, id: &NodeId) -> Option<&DragItem> {
        let node = self.scene.get(id).filter(|node| !node.is_root())?;
        self.drag = Some(DragItem::of(node));
        self.drag.as_ref()
    }

    pub fn dragging(&self) -> Option<&DragItem> {
        self.drag.as_ref()
    }

    /// Ends the drag by dropping onto `zone`.
    pub fn drop_on(&mut self, zone: &DropZone) -> Result<(), SceneError> {
        let Some(item) = self.drag.take() else {
            log::debug!("Drop onto {} without an active drag", zone.key());
            return Err(SceneError::NoOp(NodeId::root()));
        };
        let request = resolve_drop(&self.scene, &item.id, zone)?;
        self.move_node(&request.dragged, request.new_parent.as_ref(), request.hint)
    }

    /// Ends the drag without dropping. The scene is untouched.
    pub fn cancel_drag(&mut self) {
        if let Some(item) = self.drag.take() {
            log::debug!("Drag of {} cancelled", item.id);
        }
    }
}

impl Default for EditorApp {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::SequentialIdSupplier;
    use crate::gfx::transform;
    use crate::ui::tree::{DropKind, ZoneTarget};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn app() -> EditorApp {
        init();
        EditorApp::default().with_id_supplier(SequentialIdSupplier::new("n"))
    }

    /// Hands out the same id forever.
    struct StuckSupplier;

    impl IdSupplier for StuckSupplier {
        fn next_id(&mut self) -> NodeId {
            NodeId::from("same")
        }
    }

    #[test]
    fn test_add_primitive_defaults() {
        let mut app = app();
        let id = app.add_primitive("", NodeKind::Box).unwrap();

        let node = app.scene().get(&id).unwrap();
        assert_eq!(node.name, "box 1");
        assert_eq!(node.parent(), Some(&NodeId::root()));
        assert_eq!(node.position(), Vector3::new(-2.0, 0.0, -2.0));
        assert_eq!(node.color(), Some("#ff8800"));
        assert_eq!(app.selection().selected(), Some(&id));
    }

    #[test]
    fn test_add_primitive_walks_the_grid() {
        let mut app = app();
        let ids: Vec<NodeId> = (0..4)
            .map(|_| app.add_primitive("thing", NodeKind::Sphere).unwrap())
            .collect();
        let fourth = app.scene().get(&ids[3]).unwrap();
        assert_eq!(fourth.position(), Vector3::new(-2.0, 0.0, 0.0));

        let group = app.add_primitive("", NodeKind::Group).unwrap();
        let group = app.scene().get(&group).unwrap();
        assert_eq!(group.name, "group 5");
        assert_eq!(group.color(), None);
    }

    #[test]
    fn test_add_primitive_gives_up_on_stuck_supplier() {
        let mut app = app().with_id_supplier(StuckSupplier);
        app.add_primitive("", NodeKind::Box).unwrap();
        let err = app.add_primitive("", NodeKind::Box).unwrap_err();
        assert!(err.to_string().contains("no free node id"));
        assert_eq!(app.scene().len(), 2);
    }

    #[test]
    fn test_box_and_sphere_scenario() {
        let mut app = app();
        let cube = app.add_primitive("", NodeKind::Box).unwrap();
        let sphere = app.add_primitive("", NodeKind::Sphere).unwrap();

        app.move_node(&sphere, Some(&cube), 0).unwrap();

        assert_eq!(app.scene().get(&sphere).unwrap().parent(), Some(&cube));
        assert_eq!(
            app.scene().get(&cube).unwrap().parent(),
            Some(&NodeId::root())
        );
    }

    #[test]
    fn test_select_twice_notifies_twice() {
        let mut app = app();
        let id = app.add_primitive("", NodeKind::Box).unwrap();
        let fired = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&fired);
        app.selection_mut().subscribe(move |_| *sink.borrow_mut() += 1);

        app.handle_viewport_event(ViewportEvent::NodeClicked(id.clone()));
        app.handle_viewport_event(ViewportEvent::NodeClicked(id.clone()));

        assert_eq!(app.selection().selected(), Some(&id));
        assert_eq!(*fired.borrow(), 2);
    }

    #[test]
    fn test_background_click_hides_properties() {
        let mut app = app();
        app.add_primitive("", NodeKind::Box).unwrap();
        assert!(app.property_sheet().is_some());

        app.handle_viewport_event(ViewportEvent::BackgroundClicked);

        assert_eq!(app.selection().selected(), None);
        assert!(app.property_sheet().is_none());
    }

    #[test]
    fn test_update_missing_node_is_dropped() {
        let mut app = app();
        app.add_primitive("", NodeKind::Box).unwrap();
        let before = app.scene().clone();

        assert!(!app.update_node(&NodeId::from("ghost"), NodePatch::name("x")));
        assert!(!app.apply_edit(&NodeId::from("ghost"), PropertyEdit::Name("x".into())));
        assert_eq!(app.scene(), &before);
    }

    #[test]
    fn test_form_scale_below_floor() {
        let mut app = app();
        let id = app.add_primitive("", NodeKind::Cone).unwrap();
        assert!(app.apply_edit(
            &id,
            PropertyEdit::Scale(crate::ui::property::Axis::Y, "0.02".into())
        ));
        assert_eq!(app.scene().get(&id).unwrap().scale().y, 0.1);
    }

    #[test]
    fn test_gizmo_drag_updates_selected_node() {
        let mut app = app();
        let id = app.add_primitive("", NodeKind::Cylinder).unwrap();
        app.render_items();

        let matrix = transform::to_matrix(
            Vector3::new(0.5, 1.5, -1.0),
            Vector3::new(0.2, 0.0, 0.0),
            Vector3::new(1.0, 3.0, 1.0),
        );
        app.handle_viewport_event(ViewportEvent::GizmoDrag(matrix));
        app.handle_viewport_event(ViewportEvent::GizmoDragEnd(matrix));

        let node = app.scene().get(&id).unwrap();
        assert!((node.position().y - 1.5).abs() < 1.0e-4);
        assert!((node.rotation().x - 0.2).abs() < 1.0e-4);
        assert!((node.scale().y - 3.0).abs() < 1.0e-4);
    }

    #[test]
    fn test_gizmo_drag_without_selection_is_ignored() {
        let mut app = app();
        app.add_primitive("", NodeKind::Box).unwrap();
        app.clear_selection();
        let before = app.scene().clone();

        app.handle_viewport_event(ViewportEvent::GizmoDragEnd(Matrix4::from_scale(4.0)));

        assert_eq!(app.scene(), &before);
    }

    #[test]
    fn test_tree_drag_and_drop() {
        let mut app = app();
        let a = app.add_primitive("a", NodeKind::Group).unwrap();
        let b = app.add_primitive("b", NodeKind::Box).unwrap();

        app.begin_drag(&b).unwrap();
        let zone = app
            .tree_layout()
            .find_zone(&format!("{}-child", a))
            .cloned()
            .unwrap();
        app.drop_on(&zone).unwrap();

        assert_eq!(app.scene().get(&b).unwrap().parent(), Some(&a));
        assert!(app.dragging().is_none());
    }

    #[test]
    fn test_cancelled_drag_changes_nothing() {
        let mut app = app();
        let a = app.add_primitive("a", NodeKind::Box).unwrap();
        let before = app.scene().clone();

        assert_eq!(app.begin_drag(&a).map(|item| item.parent_id.clone()), Some(Some(NodeId::root())));
        app.cancel_drag();

        assert_eq!(app.scene(), &before);
        let zone = DropZone {
            target: ZoneTarget::RootTop,
            kind: DropKind::Before,
            depth: 0,
        };
        assert!(app.drop_on(&zone).is_err());
        assert_eq!(app.scene(), &before);
    }

    #[test]
    fn test_root_not_selectable_from_tree() {
        let mut app = app();
        let a = app.add_primitive("a", NodeKind::Box).unwrap();
        let root_row = app
            .tree_layout()
            .rows()
            .find(|row| row.id.is_root())
            .cloned()
            .unwrap();

        assert!(!app.select(root_row.id.clone()));
        app.handle_viewport_event(ViewportEvent::NodeClicked(NodeId::root()));
        app.render_items();

        assert_eq!(app.selection().selected(), Some(&a));
        assert_eq!(app.property_sheet().map(|sheet| sheet.id), Some(a.clone()));
        assert_eq!(app.gizmo().target(), Some(&a));
    }

    #[test]
    fn test_root_cannot_be_dragged() {
        let mut app = app();
        assert!(app.begin_drag(&NodeId::root()).is_none());
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut app = app();
        let group = app.add_primitive("g", NodeKind::Group).unwrap();
        let child = app.add_primitive("c", NodeKind::Box).unwrap();
        app.move_node(&child, Some(&group), 0).unwrap();
        app.select(child.clone());

        let removed = app.remove_node(&group).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(app.selection().selected().is_none());
        assert!(app.remove_node(&NodeId::root()).is_err());
    }

    #[test]
    fn test_render_items_highlight_selection() {
        let mut app = app();
        let a = app.add_primitive("a", NodeKind::Box).unwrap();
        app.add_primitive("b", NodeKind::Box).unwrap();
        app.select(a.clone());

        let items = app.render_items();
        assert_eq!(items.len(), 2);
        assert!(items.iter().find(|item| item.id == a).unwrap().highlighted);
        assert_eq!(app.gizmo().target(), Some(&a));
    }
}
