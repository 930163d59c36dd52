// src/ui/panel.rs
//! Editor sidebar
//!
//! Dear ImGui rendition of the editor side panel: an "Add Objects" view with the
//! creation form and the hierarchy tree, and a "Properties" view for the selected
//! node. Which view is shown follows the selection.

use imgui::{Condition, DragDropFlags, MouseButton, TreeNodeFlags};

use crate::app::EditorApp;
use crate::gfx::scene::node::to_hex_color;
use crate::gfx::scene::NodeKind;
use crate::ui::property::{Axis, PropertyEdit, PropertySheet};
use crate::ui::tree::{DropKind, DropZone, TreeEntry, TreeRow};

/// Drag-and-drop payload type for hierarchy rows
const DRAG_PAYLOAD: &str = "SCENE_NODE";

const INDENT: f32 = 20.0;

/// Form state that lives across frames.
#[derive(Debug, Clone, Default)]
pub struct SidebarState {
    pub new_name: String,
    /// Index into [`NodeKind::ALL`]
    pub kind_index: usize,
}

/// Draws the editor sidebar and applies whatever the user did to `app`.
pub fn editor_sidebar(ui: &imgui::Ui, app: &mut EditorApp, state: &mut SidebarState) {
    let display_size = ui.io().display_size;
    // Guard against invalid display size that could cause crashes
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_width = (display_size[0] * 0.25).clamp(300.0, 420.0);
    let panel_height = (display_size[1] * 0.9).max(400.0);

    ui.window("3D Scene Editor")
        .size([panel_width, panel_height], Condition::FirstUseEver)
        .position([20.0, 20.0], Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            ui.text_disabled("Add and organize 3D objects in your scene");
            ui.separator();

            let sheet = app.property_sheet();
            render_tabs(ui, app, sheet.is_some());
            ui.separator();

            match sheet {
                None => {
                    render_add_form(ui, app, state);
                    ui.spacing();
                    render_hierarchy(ui, app);
                }
                Some(sheet) => render_properties(ui, app, &sheet),
            }

            ui.separator();
            render_statistics(ui, app);
        });
}

fn render_tabs(ui: &imgui::Ui, app: &mut EditorApp, has_selection: bool) {
    if ui.button("Add Objects") {
        app.clear_selection();
    }
    ui.same_line();
    ui.disabled(!has_selection, || {
        ui.button("Properties");
    });
}

fn render_add_form(ui: &imgui::Ui, app: &mut EditorApp, state: &mut SidebarState) {
    let labels: Vec<&str> = NodeKind::ALL.iter().map(|kind| kind.label()).collect();

    ui.input_text("##new_name", &mut state.new_name)
        .hint("Name")
        .build();
    ui.combo_simple_string("##new_kind", &mut state.kind_index, &labels);

    if ui.button_with_size("Add Object", [-1.0, 0.0]) {
        let kind = NodeKind::ALL
            .get(state.kind_index)
            .copied()
            .unwrap_or(NodeKind::Box);
        match app.add_primitive(&state.new_name, kind) {
            Ok(_) => state.new_name.clear(),
            Err(err) => log::error!("Could not add object: {:#}", err),
        }
    }
}

fn render_hierarchy(ui: &imgui::Ui, app: &mut EditorApp) {
    ui.text("Hierarchy");
    ui.child_window("hierarchy")
        .size([0.0, -60.0])
        .border(true)
        .build(|| {
            let layout = app.tree_layout();
            for entry in layout.entries() {
                match entry {
                    TreeEntry::Node(row) => render_row(ui, app, row),
                    TreeEntry::Zone(zone) => render_zone(ui, app, zone),
                }
            }
        });

    // Released outside every drop zone
    if app.dragging().is_some() && !ui.is_mouse_down(MouseButton::Left) {
        app.cancel_drag();
    }
}

fn render_row(ui: &imgui::Ui, app: &mut EditorApp, row: &TreeRow) {
    let indent = row.depth as f32 * INDENT;
    if indent > 0.0 {
        ui.indent_by(indent);
    }

    let label = format!("{}##row-{}", row.name, row.id);
    if ui.selectable_config(&label).selected(row.selected).build() {
        app.select(row.id.clone());
    }

    if let Some(tooltip) = ui.drag_drop_source_config(DRAG_PAYLOAD).begin() {
        if app.dragging().map(|item| &item.id) != Some(&row.id) {
            app.begin_drag(&row.id);
        }
        ui.text(&row.name);
        tooltip.end();
    }

    ui.same_line();
    ui.text_disabled(row.kind.tag());

    if indent > 0.0 {
        ui.unindent_by(indent);
    }
}

fn render_zone(ui: &imgui::Ui, app: &mut EditorApp, zone: &DropZone) {
    // Child zones take their indentation from the children below them
    let indent = match zone.kind {
        DropKind::Child => (zone.depth + 1) as f32 * INDENT,
        _ => zone.depth as f32 * INDENT,
    };
    let height = match zone.kind {
        DropKind::Between => 8.0,
        _ => 4.0,
    };

    if indent > 0.0 {
        ui.indent_by(indent);
    }
    let width = ui.content_region_avail()[0].max(1.0);
    ui.invisible_button(zone.key(), [width, height]);

    let allowed = app
        .dragging()
        .is_some_and(|item| zone.can_drop(&item.id));
    if allowed {
        if let Some(target) = ui.drag_drop_target() {
            if target
                .accept_payload_empty(DRAG_PAYLOAD, DragDropFlags::empty())
                .is_some()
            {
                if let Err(err) = app.drop_on(zone) {
                    log::debug!("Drop onto {} refused: {}", zone.key(), err);
                }
            }
            target.pop();
        }
    }

    if indent > 0.0 {
        ui.unindent_by(indent);
    }
}

fn render_properties(ui: &imgui::Ui, app: &mut EditorApp, sheet: &PropertySheet) {
    let id = sheet.id.clone();
    ui.text(format!("Properties: {}", sheet.kind.label()));
    ui.spacing();

    let mut name = sheet.name.clone();
    if ui.input_text("Name", &mut name).build() {
        app.apply_edit(&id, PropertyEdit::Name(name));
    }

    if ui.collapsing_header("Position", TreeNodeFlags::DEFAULT_OPEN) {
        render_axes(ui, "pos", sheet.position, |axis, text| {
            app.apply_edit(&id, PropertyEdit::Position(axis, text));
        });
    }
    if ui.collapsing_header("Rotation", TreeNodeFlags::DEFAULT_OPEN) {
        render_axes(ui, "rot", sheet.rotation, |axis, text| {
            app.apply_edit(&id, PropertyEdit::Rotation(axis, text));
        });
    }
    if ui.collapsing_header("Scale", TreeNodeFlags::DEFAULT_OPEN) {
        render_axes(ui, "scale", sheet.scale, |axis, text| {
            app.apply_edit(&id, PropertyEdit::Scale(axis, text));
        });
    }

    if let Some(mut rgb) = sheet.rgb() {
        if ui.color_edit3("Color", &mut rgb) {
            app.apply_edit(&id, PropertyEdit::Color(to_hex_color(rgb)));
        }
    }

    ui.spacing();
    app.render_gizmo_ui(ui);
    ui.text_wrapped(
        "You can also directly manipulate the object in the 3D view using the gizmo when selected.",
    );

    ui.spacing();
    if ui.button("Delete") {
        if let Err(err) = app.remove_node(&id) {
            log::warn!("Could not delete {}: {}", id, err);
        }
    }
}

/// One text field per axis; `on_edit` gets the raw text of whichever changed.
fn render_axes(ui: &imgui::Ui, prefix: &str, values: [f32; 3], mut on_edit: impl FnMut(Axis, String)) {
    ui.columns(3, format!("{}_columns", prefix), false);
    for (axis, value) in Axis::ALL.into_iter().zip(values) {
        ui.text(axis.label());
        ui.same_line();
        ui.set_next_item_width(-1.0);
        let mut text = format!("{:.3}", value);
        if ui
            .input_text(format!("##{}_{}", prefix, axis.label()), &mut text)
            .build()
        {
            on_edit(axis, text);
        }
        ui.next_column();
    }
    ui.columns(1, format!("{}_end", prefix), false);
}

fn render_statistics(ui: &imgui::Ui, app: &EditorApp) {
    let stats = app.scene().statistics();
    ui.text(format!(
        "Objects: {} ({} groups, {} primitives)",
        stats.object_count, stats.group_count, stats.primitive_count
    ));
    ui.text(format!("Max depth: {}", stats.max_depth));
}
