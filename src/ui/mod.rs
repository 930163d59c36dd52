//! # User Interface Module
//!
//! Dear ImGui side panel for the editor plus the UI-independent logic behind it.
//!
//! ## Key Components
//!
//! - [`tree`] - Hierarchy rows, drop zones and drop resolution
//! - [`property`] - Form input parsing into node patches
//! - [`panel`] - The [`editor_sidebar`] itself
//!
//! Only [`panel`] touches imgui; the other two are plain data and fully testable.

pub mod panel;
pub mod property;
pub mod tree;

// Re-export main types
pub use panel::{editor_sidebar, SidebarState};
