pub mod channel;
pub mod protocol;
pub mod ws;

pub use channel::ChannelHandle;
pub use ws::{ChannelError, RealtimeChannel};

#[cfg(test)]
mod tests;
