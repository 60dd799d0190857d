use super::initial_value::{self, InitialValueProvider, ServiceDefault};
use crate::{
    cancel::CancelToken,
    external::brightness::{BrightnessParams, CallError, PowerdConnection},
};

/// A brightness control session with powerd.
///
/// A session is created from a connection and the parameters obtained by
/// [super::bootstrap::connect]. It keeps track of the last brightness powerd
/// confirmed and pushes new values to it. The connection is released only by
/// [BrightnessSession::teardown], which consumes the session.
#[derive(Debug)]
pub struct BrightnessSession<C: PowerdConnection> {
    connection: C,
    cancel_token: CancelToken,
    params: BrightnessParams,
    current: i32,
}

impl<C: PowerdConnection> BrightnessSession<C> {
    /// Create a new session and push powerd's default brightness to it.
    pub async fn new(
        connection: C,
        cancel_token: CancelToken,
        params: BrightnessParams,
    ) -> BrightnessSession<C> {
        Self::with_initial_value(connection, cancel_token, params, &ServiceDefault).await
    }

    /// Create a new session and push the brightness chosen by `provider` to
    /// powerd, or its default if the provider has none.
    ///
    /// The session is returned even if the initial push fails, its value then
    /// stays at 0 until a later [BrightnessSession::set_value] succeeds.
    pub async fn with_initial_value(
        connection: C,
        cancel_token: CancelToken,
        params: BrightnessParams,
        provider: &dyn InitialValueProvider,
    ) -> BrightnessSession<C> {
        let mut session = BrightnessSession {
            connection,
            cancel_token,
            params,
            current: 0,
        };
        let initial = initial_value::resolve(provider, &params);
        if session.set_value(initial).await.is_err() {
            log::debug!("Brightness not synchronized with powerd on session start");
        }
        session
    }

    /// Set the brightness, clamped into the range powerd reported.
    ///
    /// Waits for powerd without any timeout, only the session's cancellation
    /// token can interrupt the call. On failure the current value is left
    /// untouched and the write is not retried.
    pub async fn set_value(&mut self, value: i32) -> Result<(), CallError> {
        let value = self.params.clamp(value);
        match self
            .connection
            .set_user_brightness(value, &self.cancel_token)
            .await
        {
            Ok(()) => {
                log::debug!("Brightness set to {}", value);
                self.current = value;
                Ok(())
            }
            Err(e) => {
                log::warn!("setUserBrightness via powerd failed: {}", e);
                Err(e)
            }
        }
    }

    /// The last brightness powerd confirmed
    pub fn get_value(&self) -> i32 {
        self.current
    }

    pub fn get_max_value(&self) -> i32 {
        self.params.max
    }

    pub fn params(&self) -> &BrightnessParams {
        &self.params
    }

    /// Cancel any call still in flight and release the session's resources.
    ///
    /// The token is cancelled first, then dropped, and the connection is
    /// released last.
    pub fn teardown(self) {
        let BrightnessSession {
            connection,
            cancel_token,
            ..
        } = self;
        cancel_token.cancel();
        drop(cancel_token);
        connection.release();
        log::debug!("Brightness session torn down");
    }
}
