mod client;
mod error;

pub use client::PanelClient;
pub use error::ApiError;
