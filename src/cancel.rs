//! A cancellation signal shared between the owner of a remote call and the
//! call itself.

use std::sync::Arc;
use tokio::sync::watch;

/// A clone-able cancellation token.
///
/// All clones observe the same state. Once [CancelToken::cancel] has been
/// called on any of them, every pending [CancelToken::cancelled] future
/// completes and all future ones complete immediately. Cancelling more than
/// once has no further effect.
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    /// Create a new, not yet cancelled token.
    pub fn new() -> CancelToken {
        let (sender, receiver) = watch::channel(false);
        CancelToken {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Trigger the cancellation.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Whether [CancelToken::cancel] was called on this token or any of its
    /// clones.
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait until the token gets cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            // Every clone holds the sender, so this only fails if the runtime
            // is tearing us down.
            if receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        CancelToken::new()
    }
}
