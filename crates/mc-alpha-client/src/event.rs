//! Notifications delivered to the owner of a [`Client`](crate::Client).

use std::sync::Arc;

use mc_alpha_world::Chunk;
use tokio::sync::{mpsc, watch};

use crate::error::ClientError;
use crate::session::LoginState;

#[derive(Debug)]
pub enum ClientEvent {
    /// The login state machine moved. Fired once per transition, in order.
    StateChanged(LoginState),
    /// A MapChunk was decoded.
    ChunkUpdated(Chunk),
    /// The session is over. Always the last event.
    Terminated(Termination),
}

/// Why a session ended.
#[derive(Debug)]
pub enum Termination {
    /// The caller asked to disconnect, or the server closed the stream.
    Closed,
    /// The server sent a kick.
    Kicked(String),
    Failed(ClientError),
}

/// Sending side of the event channel plus the latest-state watch.
#[derive(Debug, Clone)]
pub(crate) struct Notifier {
    events: mpsc::UnboundedSender<ClientEvent>,
    state: Arc<watch::Sender<LoginState>>,
}

impl Notifier {
    pub(crate) fn new(
        events: mpsc::UnboundedSender<ClientEvent>,
        state: watch::Sender<LoginState>,
    ) -> Self {
        Self {
            events,
            state: Arc::new(state),
        }
    }

    /// A notifier whose receivers are handed back to the caller.
    #[cfg(test)]
    pub(crate) fn channel() -> (
        Self,
        mpsc::UnboundedReceiver<ClientEvent>,
        watch::Receiver<LoginState>,
    ) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(LoginState::Disconnected);
        (Self::new(events_tx, state_tx), events_rx, state_rx)
    }

    pub(crate) fn state_changed(&self, state: LoginState) {
        self.state.send_replace(state);
        self.emit(ClientEvent::StateChanged(state));
    }

    pub(crate) fn chunk_updated(&self, chunk: Chunk) {
        self.emit(ClientEvent::ChunkUpdated(chunk));
    }

    pub(crate) fn terminated(&self, termination: Termination) {
        self.emit(ClientEvent::Terminated(termination));
    }

    // A dropped receiver only means nobody is listening.
    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}
