use crate::cancel::CancelToken;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zvariant::Type;

/// Well-known bus name of the powerd service
pub const SERVICE_NAME: &str = "com.canonical.powerd";
/// Object path under which powerd exports its brightness interface
pub const OBJECT_PATH: &str = "/com/canonical/powerd";
/// Interface implementing the brightness methods
pub const INTERFACE_NAME: &str = "com.canonical.powerd";

/// Operating parameters of the display backlight, as reported by powerd's
/// `getBrightnessParams` method.
///
/// The service is trusted to report `min <= dim <= max` and
/// `min <= default <= max`, nothing here enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
pub struct BrightnessParams {
    /// Brightness used when the screen is dimmed
    pub dim: i32,
    pub min: i32,
    pub max: i32,
    /// Brightness powerd proposes when nothing else is known
    pub default: i32,
    /// Whether the device supports automatic brightness
    pub ab_supported: bool,
}

impl BrightnessParams {
    /// Constrain `value` into `[min, max]`.
    ///
    /// Mirrors GLib's `CLAMP`: anything above `max` becomes `max`, anything
    /// else below `min` becomes `min`. Unlike [Ord::clamp] this doesn't panic
    /// when powerd reports `min > max`.
    pub fn clamp(&self, value: i32) -> i32 {
        if value > self.max {
            self.max
        } else if value < self.min {
            self.min
        } else {
            value
        }
    }
}

/// The bus itself could not be reached, or no proxy could be created on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("couldn't connect to the message bus: {0}")]
    Connection(String),
    #[error("couldn't create a proxy for powerd: {0}")]
    Proxy(String),
}

/// A method call on powerd failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    /// powerd is not registered on the bus. Expected on systems without it.
    #[error("service is not registered on the bus: {0}")]
    ServiceUnknown(String),
    #[error("call timed out")]
    Timeout,
    #[error("call was cancelled")]
    Cancelled,
    #[error("malformed reply: {0}")]
    MalformedReply(String),
    #[error("{0}")]
    Bus(String),
}

/// Something able to open connections to powerd.
#[async_trait]
pub trait PowerdBus: Send {
    type Connection: PowerdConnection;

    /// Open a connection to the powerd service
    async fn connect(&mut self) -> Result<Self::Connection, BusError>;
}

/// An open connection to powerd, used for all the brightness calls.
#[async_trait]
pub trait PowerdConnection: Send + Sync + 'static {
    /// Call `getBrightnessParams`. Callers are expected to bound this call
    /// with a timeout of their own.
    async fn get_brightness_params(&self) -> Result<BrightnessParams, CallError>;

    /// Call `setUserBrightness`. Blocks until the call completes or `cancel`
    /// is triggered, in which case [CallError::Cancelled] is returned.
    async fn set_user_brightness(&self, value: i32, cancel: &CancelToken)
        -> Result<(), CallError>;

    /// Release the connection. Must be called exactly once.
    fn release(self)
    where
        Self: Sized;
}
