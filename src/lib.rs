// src/lib.rs
//! Sceneforge
//!
//! Core of a 3D scene editor: a scene graph of primitives and groups, safe
//! hierarchy moves, a transform codec for the interactive gizmo, single selection,
//! and the hierarchy tree with drag-and-drop zones. Rendering is left to whatever
//! implements [`gfx::render_list::SceneRenderer`].

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod selection;
pub mod ui;

// Re-export main types for convenience
pub use app::{EditorApp, ViewportEvent};
pub use config::EditorConfig;
pub use error::SceneError;

/// Installs `env_logger` with an `info` default filter (`RUST_LOG` overrides it).
///
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Creates an editor with the default configuration
pub fn default() -> EditorApp {
    EditorApp::default()
}
