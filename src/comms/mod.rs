//! Game channel: wire protocol, line transport and the session loop

pub mod channel;
pub mod protocol;
pub mod session;

pub use channel::TurnChannel;
