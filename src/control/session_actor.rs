//! Running a [BrightnessSession] on its own tokio task.
//!
//! The task owns the session and handles requests one at a time. The
//! [SessionPort] handed back to the caller keeps a clone of the session's
//! cancellation token, so tearing the port down aborts a `setUserBrightness`
//! call that is still waiting for powerd, even if whoever requested it has
//! already given up on it.

use super::{
    initial_value::{self, FixedValue, InitialValueProvider},
    session::BrightnessSession,
};
use crate::{
    cancel::CancelToken,
    external::brightness::{BrightnessParams, CallError, PowerdConnection},
};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

/// Messages understood by the session task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionMessage {
    SetValue(i32),
    GetValue,
}

/// A request sent to the session task.
///
/// Both messages are answered with the session's current value, or the error
/// of the call that failed.
struct Request {
    payload: SessionMessage,
    response_sender: oneshot::Sender<Result<i32, CallError>>,
}

impl Request {
    fn new(payload: SessionMessage) -> (Request, oneshot::Receiver<Result<i32, CallError>>) {
        let (response_sender, response_receiver) = oneshot::channel();
        let request = Request {
            payload,
            response_sender,
        };
        (request, response_receiver)
    }
}

/// An error occuring during the exchange of messages with the session task.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionRequestError {
    #[error("error when sending request to the brightness session")]
    Send,

    #[error("error while awaiting the brightness session's response")]
    Recv,

    #[error("brightness call failed: {0}")]
    Call(#[from] CallError),
}

/// The only way to talk to a session running on its own task.
///
/// A port is not clone-able, the session has exactly one owner. Dropping the
/// port stops the task and releases the connection, but without cancelling a
/// call in flight first. Use [SessionPort::teardown] for that.
#[derive(Debug)]
pub struct SessionPort {
    message_sender: mpsc::Sender<Request>,
    shutdown_receiver: watch::Receiver<()>,
    cancel_token: CancelToken,
    params: BrightnessParams,
}

/// Start a session on a new task.
///
/// Returns once the initial brightness has been pushed to powerd (or pushing
/// it failed).
pub async fn spawn_session<C: PowerdConnection>(
    connection: C,
    params: BrightnessParams,
    provider: &dyn InitialValueProvider,
) -> SessionPort {
    let initial = initial_value::resolve(provider, &params);
    let cancel_token = CancelToken::new();
    let session_token = cancel_token.clone();
    let (message_sender, mut message_receiver) = mpsc::channel::<Request>(8);
    let (shutdown_notifier, shutdown_receiver) = watch::channel(());
    let (initialization_sender, initialization_receiver) = oneshot::channel::<()>();

    log::debug!("Brightness session spawning");
    tokio::spawn(async move {
        // Dropped last, which is what SessionPort::teardown waits for
        let _shutdown_notifier = shutdown_notifier;
        let mut session = BrightnessSession::with_initial_value(
            connection,
            session_token,
            params,
            &FixedValue(initial),
        )
        .await;
        log::info!(
            "Brightness session started, brightness is {}",
            session.get_value()
        );
        if initialization_sender.send(()).is_err() {
            log::debug!("Brightness session spawner went away");
        }

        while let Some(request) = message_receiver.recv().await {
            let result = match request.payload {
                SessionMessage::SetValue(value) => session
                    .set_value(value)
                    .await
                    .map(|_| session.get_value()),
                SessionMessage::GetValue => Ok(session.get_value()),
            };
            if request.response_sender.send(result).is_err() {
                log::error!(
                    "Brightness session failed to respond to request (requester went away?)"
                );
            }
        }

        log::debug!("Brightness session stopping");
        session.teardown();
    });

    if initialization_receiver.await.is_err() {
        log::error!("Brightness session task terminated during initialization");
    }
    SessionPort {
        message_sender,
        shutdown_receiver,
        cancel_token,
        params,
    }
}

impl SessionPort {
    async fn request(&self, payload: SessionMessage) -> Result<i32, SessionRequestError> {
        let (request, response_receiver) = Request::new(payload);
        if self.message_sender.send(request).await.is_err() {
            return Err(SessionRequestError::Send);
        }
        match response_receiver.await {
            Err(_) => Err(SessionRequestError::Recv),
            Ok(inner_result) => Ok(inner_result?),
        }
    }

    /// Set the brightness, see [BrightnessSession::set_value]
    pub async fn set_value(&self, value: i32) -> Result<(), SessionRequestError> {
        self.request(SessionMessage::SetValue(value))
            .await
            .map(|_| ())
    }

    /// The last brightness powerd confirmed
    pub async fn get_value(&self) -> Result<i32, SessionRequestError> {
        self.request(SessionMessage::GetValue).await
    }

    pub fn get_max_value(&self) -> i32 {
        self.params.max
    }

    pub fn params(&self) -> &BrightnessParams {
        &self.params
    }

    /// Cancel the call in flight, if any, stop the session task and wait
    /// until it has released the connection.
    ///
    /// Requests still queued at this point fail with [CallError::Cancelled].
    pub async fn teardown(self) {
        self.cancel_token.cancel();
        // The task treats the closing of its request channel as the signal
        // to tear the session down.
        drop(self.message_sender);
        let mut shutdown_receiver = self.shutdown_receiver;
        let result = shutdown_receiver.changed().await;
        debug_assert!(result.is_err());
    }
}
