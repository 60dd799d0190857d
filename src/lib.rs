#![warn(missing_docs)]

//! Screen brightness control through the powerd system service.
//!
//! [control::connect] negotiates a connection to powerd and fetches the
//! brightness parameters, [control::BrightnessSession] (or a
//! [control::SessionPort] running it on its own task) then keeps track of the
//! brightness and pushes changes to powerd.

pub mod cancel;
pub mod config;
pub mod control;
pub mod external;
