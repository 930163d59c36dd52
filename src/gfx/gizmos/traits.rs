//! # Gizmo Traits
//!
//! Interface shared by the interactive helpers drawn over the viewport.

use imgui::Ui;

use crate::gfx::scene::Scene;
use crate::selection::SelectionController;

/// Core trait for viewport gizmos.
///
/// ## Lifecycle
///
/// 1. **Sync** - Called once per frame before drawing, so the gizmo can follow the
///    current selection
/// 2. **UI Rendering** - Draw gizmo-specific readouts and controls
///
/// Gizmos never own node state. Whatever they change goes back through
/// [`Scene::update`].
pub trait Gizmo {
    /// Follow the current selection.
    fn sync(&mut self, selection: &SelectionController, scene: &Scene);

    /// Render the gizmo's user interface controls.
    fn render_ui(&mut self, ui: &Ui, scene: &Scene);

    /// Name used for display purposes in the UI and logs.
    fn name(&self) -> &str;

    fn is_enabled(&self) -> bool;

    /// Disabled gizmos detach from their target.
    fn set_enabled(&mut self, enabled: bool);

    /// Check if this gizmo should be visible in the current context.
    fn should_be_visible(&self, _scene: &Scene) -> bool {
        self.is_enabled()
    }
}
