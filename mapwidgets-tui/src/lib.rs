//! ratatui adapters for the mapwidgets controllers, plus the demo app.

pub mod app;
pub mod config;
pub mod edit;
pub mod frame;
pub mod keymap;
pub mod list;
pub mod pile;
pub mod terminal;
pub mod tracing_setup;
pub mod wrap;

// Re-export commonly used types
pub use app::App;
pub use config::{KeyBindings, WidgetsConfig};
pub use edit::{EditChange, KeyOutcome, MappedEdit};
pub use frame::{CommandFrame, FocusPart, FrameEvent, FrameOutcome};
pub use keymap::{KeyBinding, Keymap, NavAction};
pub use list::{navigate, MappedList};
pub use pile::{MappedPile, PileKey};
pub use wrap::MappedWrap;
