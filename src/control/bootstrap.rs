//! Connecting to powerd and fetching the brightness parameters.
//!
//! Both steps succeed or fail together: a caller either gets a connection it
//! can build a session on, or nothing at all.

use crate::external::{
    brightness::{
        powerd::{DBusPowerd, PowerdProxyConnection},
        BrightnessParams, BusError, CallError, PowerdBus, PowerdConnection,
    },
    dbus::BusType,
};
use std::time::Duration;
use thiserror::Error;

/// How long to wait for powerd to report the brightness parameters.
///
/// Probing on startup must not hang the caller, unlike user-initiated
/// brightness changes which are allowed to wait.
pub const PARAMS_TIMEOUT: Duration = Duration::from_millis(400);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// No connection to powerd could be established. Expected on systems
    /// without powerd.
    #[error("powerd is unreachable: {0}")]
    Unreachable(#[source] BusError),

    /// Connected, but the parameter handshake failed
    #[error("brightness parameters are unavailable: {0}")]
    ParamsUnavailable(#[source] CallError),
}

/// Connect to powerd through `bus` and fetch the brightness parameters.
///
/// If the parameters can't be fetched, the connection is released before the
/// error is returned.
pub async fn connect<B: PowerdBus>(
    bus: &mut B,
) -> Result<(B::Connection, BrightnessParams), ConnectError> {
    let connection = match bus.connect().await {
        Ok(connection) => connection,
        Err(e) => {
            log::debug!("Could not connect to powerd: {}", e);
            return Err(ConnectError::Unreachable(e));
        }
    };

    match fetch_params(&connection).await {
        Ok(params) => {
            log::debug!("Got brightness parameters from powerd: {:?}", params);
            Ok((connection, params))
        }
        Err(e) => {
            if !matches!(e, CallError::ServiceUnknown(_)) {
                log::warn!("getBrightnessParams from powerd failed: {}", e);
            }
            log::debug!("Can't get brightness parameters from powerd");
            connection.release();
            Err(ConnectError::ParamsUnavailable(e))
        }
    }
}

/// Connect to the real powerd on the given bus
pub async fn connect_powerd(
    bus: BusType,
) -> Result<(PowerdProxyConnection, BrightnessParams), ConnectError> {
    connect(&mut DBusPowerd::new(bus)).await
}

async fn fetch_params<C: PowerdConnection>(connection: &C) -> Result<BrightnessParams, CallError> {
    let sleep = tokio::time::sleep(PARAMS_TIMEOUT);
    tokio::pin!(sleep);

    tokio::select! {
        res = connection.get_brightness_params() => res,
        _ = &mut sleep => Err(CallError::Timeout),
    }
}
