pub mod backend;
pub mod editor;
pub mod error;
pub mod keywords;
pub mod notify;
pub mod panel;
pub mod screenshot;
pub mod selection;
pub mod status;
pub mod theme;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{RegionDeletion, RequestSink, SettingsBackend};
pub use error::{EditError, SelectionError, ValidationError};
pub use panel::{PanelState, Section, WebhookForm};
pub use theme::{Theme, ThemeStore};
