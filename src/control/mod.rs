//! Brightness control on top of powerd - connection bootstrap and sessions

pub mod bootstrap;
pub mod initial_value;
pub mod session;
pub mod session_actor;

pub use bootstrap::{connect, connect_powerd, ConnectError};
pub use session::BrightnessSession;
pub use session_actor::{spawn_session, SessionPort, SessionRequestError};

#[cfg(test)]
mod test;
