//! Access to the powerd brightness service
pub mod interface;
pub mod mock;
pub mod powerd;

pub use interface::*;

#[cfg(test)]
mod test;
