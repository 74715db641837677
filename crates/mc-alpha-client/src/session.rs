//! Login state machine.
//!
//! `Session` reacts to decoded server messages and records what the
//! connection should do next as [`SessionEffect`]s. It never touches the
//! socket itself; the controller drains the effects after each step.

use std::collections::VecDeque;

use mc_alpha_proto::{IncomingMessage, OutgoingMessage};
use mc_alpha_world::{decode_chunk, EntityPosition};
use tracing::{debug, info, warn};

use crate::connection_info::ConnectionInfo;
use crate::error::{ClientError, SessionError};
use crate::event::{Notifier, Termination};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Disconnected,
    Connecting,
    WaitingForHandshakeResponse,
    WaitingForLoginResponse,
    WaitingForFirstPosition,
    Ready,
    Errored,
}

/// Work the session hands to the connection.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    Send(OutgoingMessage),
    /// Start the periodic position report.
    ArmHeartbeat,
}

#[derive(Debug)]
pub struct Session {
    info: ConnectionInfo,
    state: LoginState,
    position: Option<EntityPosition>,
    kick_reason: Option<String>,
    started: bool,
    effects: VecDeque<SessionEffect>,
    notifier: Notifier,
}

impl Session {
    pub(crate) fn new(info: ConnectionInfo, notifier: Notifier) -> Self {
        Self {
            info,
            state: LoginState::Disconnected,
            position: None,
            kick_reason: None,
            started: false,
            effects: VecDeque::new(),
            notifier,
        }
    }

    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Last pose the server gave us.
    pub fn position(&self) -> Option<&EntityPosition> {
        self.position.as_ref()
    }

    pub fn kick_reason(&self) -> Option<&str> {
        self.kick_reason.as_deref()
    }

    fn set_state(&mut self, state: LoginState) {
        if self.state == state {
            return;
        }
        debug!("Login state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.notifier.state_changed(state);
    }

    /// Leave `Disconnected` for `Connecting`. Returns `false` if this session
    /// has already been started, in which case nothing changes.
    pub fn begin_connect(&mut self) -> bool {
        if self.started || self.state != LoginState::Disconnected {
            return false;
        }
        self.started = true;
        self.set_state(LoginState::Connecting);
        true
    }

    /// The transport is open: greet the server.
    pub fn on_connected(&mut self) {
        if self.state != LoginState::Connecting {
            warn!("Transport opened while {:?}", self.state);
            return;
        }
        self.set_state(LoginState::WaitingForHandshakeResponse);
        self.effects
            .push_back(SessionEffect::Send(OutgoingMessage::handshake(
                self.info.username.clone(),
            )));
    }

    /// Apply one decoded server message.
    ///
    /// An error means the session cannot continue; the caller should
    /// [`fail`](Self::fail) it.
    pub fn handle_message(&mut self, message: IncomingMessage) -> Result<(), ClientError> {
        match message {
            IncomingMessage::Handshake(response) => {
                if self.state != LoginState::WaitingForHandshakeResponse {
                    return Err(SessionError::UnexpectedMessage {
                        message: "Handshake",
                        state: self.state,
                    }
                    .into());
                }
                if response.requires_authentication() {
                    return Err(SessionError::AuthenticationRequired(response.connection_hash).into());
                }
                self.effects.push_back(SessionEffect::Send(OutgoingMessage::login(
                    self.info.username.clone(),
                    self.info.password.clone(),
                )));
                // The login response carries nothing we use; the server's
                // next meaningful packet is the spawn position.
                self.set_state(LoginState::WaitingForLoginResponse);
                self.set_state(LoginState::WaitingForFirstPosition);
            }
            IncomingMessage::PlayerPositionAndLook(packet) => {
                let position = EntityPosition::from_wire(&packet);
                debug!(
                    "Position ({:.2}, {:.2}, {:.2}) yaw {:.3} pitch {:.3}",
                    position.x, position.y, position.z, position.yaw, position.pitch
                );
                self.position = Some(position);
                if self.state == LoginState::WaitingForFirstPosition {
                    info!("Spawned as {} on {}:{}", self.info.username, self.info.host, self.info.port);
                    self.set_state(LoginState::Ready);
                    self.effects.push_back(SessionEffect::ArmHeartbeat);
                }
            }
            IncomingMessage::MapChunk(packet) => {
                let chunk = decode_chunk(&packet)?;
                self.notifier.chunk_updated(chunk);
            }
            IncomingMessage::DisconnectOrKick(kick) => {
                if self.state == LoginState::Disconnected || self.kick_reason.is_some() {
                    debug!("Ignoring kick ({}) while {:?}", kick.reason, self.state);
                    return Ok(());
                }
                info!("Kicked by server: {}", kick.reason);
                self.kick_reason = Some(kick.reason);
                self.effects
                    .push_back(SessionEffect::Send(OutgoingMessage::DisconnectNow));
            }
        }
        Ok(())
    }

    /// Periodic report of the current pose, once one is known.
    pub fn position_report(&self) -> Option<OutgoingMessage> {
        self.position
            .map(|position| OutgoingMessage::PlayerPositionAndLook(position.to_wire()))
    }

    /// Next pending effect, oldest first.
    pub fn next_effect(&mut self) -> Option<SessionEffect> {
        self.effects.pop_front()
    }

    /// Abort on an error. `Errored` is final; the session never reports
    /// `Disconnected` afterwards.
    pub(crate) fn fail(&mut self, error: ClientError) {
        self.effects.clear();
        self.set_state(LoginState::Errored);
        self.notifier.terminated(Termination::Failed(error));
    }

    /// Orderly end, reported as a kick if the server sent one.
    pub(crate) fn close(&mut self) {
        let termination = match self.kick_reason.clone() {
            Some(reason) => Termination::Kicked(reason),
            None => Termination::Closed,
        };
        self.effects.clear();
        self.set_state(LoginState::Disconnected);
        self.notifier.terminated(termination);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ClientEvent;
    use bytes::Bytes;
    use mc_alpha_proto::compression::compress;
    use mc_alpha_proto::packets::{HandshakeResponse, Kick, MapChunk, PositionLookResponse};
    use tokio::sync::{mpsc, watch};

    struct Harness {
        session: Session,
        events: mpsc::UnboundedReceiver<ClientEvent>,
        state: watch::Receiver<LoginState>,
    }

    impl Harness {
        fn new() -> Self {
            let (notifier, events, state) = Notifier::channel();
            let info = ConnectionInfo::new("localhost", "steve").with_password("pw");
            Self {
                session: Session::new(info, notifier),
                events,
                state,
            }
        }

        fn connected() -> Self {
            let mut h = Self::new();
            assert!(h.session.begin_connect());
            h.session.on_connected();
            h.drain_effects();
            h.drain_events();
            h
        }

        fn ready() -> Self {
            let mut h = Self::connected();
            h.session
                .handle_message(IncomingMessage::Handshake(HandshakeResponse::offline()))
                .unwrap();
            h.session.handle_message(spawn_position()).unwrap();
            h.drain_effects();
            h.drain_events();
            h
        }

        fn drain_effects(&mut self) -> Vec<SessionEffect> {
            std::iter::from_fn(|| self.session.next_effect()).collect()
        }

        fn drain_events(&mut self) -> Vec<ClientEvent> {
            std::iter::from_fn(|| self.events.try_recv().ok()).collect()
        }

        fn states(&mut self) -> Vec<LoginState> {
            self.drain_events()
                .into_iter()
                .filter_map(|event| match event {
                    ClientEvent::StateChanged(state) => Some(state),
                    _ => None,
                })
                .collect()
        }
    }

    fn spawn_position() -> IncomingMessage {
        IncomingMessage::PlayerPositionAndLook(PositionLookResponse {
            x: 8.5,
            stance: 67.62,
            y: 66.0,
            z: -120.5,
            yaw: 90.0,
            pitch: 0.0,
            on_ground: true,
        })
    }

    #[test]
    fn starts_disconnected() {
        let h = Harness::new();
        assert_eq!(h.session.state(), LoginState::Disconnected);
        assert!(h.session.position().is_none());
        assert!(h.session.position_report().is_none());
    }

    #[test]
    fn connect_sends_handshake() {
        let mut h = Harness::new();
        assert!(h.session.begin_connect());
        h.session.on_connected();
        assert_eq!(
            h.states(),
            vec![LoginState::Connecting, LoginState::WaitingForHandshakeResponse]
        );
        assert_eq!(
            h.drain_effects(),
            vec![SessionEffect::Send(OutgoingMessage::handshake("steve"))]
        );
        assert_eq!(*h.state.borrow(), LoginState::WaitingForHandshakeResponse);
    }

    #[test]
    fn begin_connect_is_once_only() {
        let mut h = Harness::new();
        assert!(h.session.begin_connect());
        assert!(!h.session.begin_connect());
        h.session.close();
        assert!(!h.session.begin_connect());
        assert_eq!(h.session.state(), LoginState::Disconnected);
    }

    #[test]
    fn offline_handshake_sends_login() {
        let mut h = Harness::connected();
        h.session
            .handle_message(IncomingMessage::Handshake(HandshakeResponse::offline()))
            .unwrap();
        assert_eq!(
            h.drain_effects(),
            vec![SessionEffect::Send(OutgoingMessage::login("steve", "pw"))]
        );
        assert_eq!(
            h.states(),
            vec![
                LoginState::WaitingForLoginResponse,
                LoginState::WaitingForFirstPosition
            ]
        );
    }

    #[test]
    fn authenticated_handshake_is_refused() {
        let mut h = Harness::connected();
        let err = h
            .session
            .handle_message(IncomingMessage::Handshake(HandshakeResponse {
                connection_hash: "2e66f1dc032ab5f0".into(),
            }))
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(SessionError::AuthenticationRequired(_))
        ));
        assert!(h.drain_effects().is_empty());
    }

    #[test]
    fn handshake_out_of_order_is_an_error() {
        let mut h = Harness::ready();
        let err = h
            .session
            .handle_message(IncomingMessage::Handshake(HandshakeResponse::offline()))
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(SessionError::UnexpectedMessage {
                state: LoginState::Ready,
                ..
            })
        ));
    }

    #[test]
    fn first_position_makes_ready() {
        let mut h = Harness::connected();
        h.session
            .handle_message(IncomingMessage::Handshake(HandshakeResponse::offline()))
            .unwrap();
        h.drain_effects();
        h.drain_events();

        h.session.handle_message(spawn_position()).unwrap();
        assert_eq!(h.states(), vec![LoginState::Ready]);
        assert_eq!(h.drain_effects(), vec![SessionEffect::ArmHeartbeat]);
        let pos = h.session.position().unwrap();
        assert_eq!((pos.x, pos.y, pos.z), (-120.5, -8.5, 66.0));
    }

    #[test]
    fn later_positions_only_update_pose() {
        let mut h = Harness::ready();
        h.session
            .handle_message(IncomingMessage::PlayerPositionAndLook(PositionLookResponse {
                x: 1.0,
                stance: 2.0,
                y: 3.0,
                z: 4.0,
                yaw: 0.0,
                pitch: 0.0,
                on_ground: false,
            }))
            .unwrap();
        assert!(h.states().is_empty());
        assert!(h.drain_effects().is_empty());
        assert_eq!(h.session.position().unwrap().x, 4.0);
    }

    #[test]
    fn position_report_uses_wire_axes() {
        let h = Harness::ready();
        let Some(OutgoingMessage::PlayerPositionAndLook(report)) = h.session.position_report()
        else {
            panic!("expected a position report");
        };
        assert_eq!((report.x, report.y, report.z), (8.5, 66.0, -120.5));
        assert_eq!(report.stance, 67.62);
        assert!(report.on_ground);
    }

    #[test]
    fn chunk_is_published() {
        let mut h = Harness::ready();
        let packet = MapChunk {
            x: 0,
            y: 0,
            z: 0,
            size_x_minus_one: 0,
            size_y_minus_one: 1,
            size_z_minus_one: 0,
            compressed_data: Bytes::from(compress(&[3, 4], 6).unwrap()),
        };
        h.session
            .handle_message(IncomingMessage::MapChunk(packet))
            .unwrap();
        let events = h.drain_events();
        assert!(matches!(
            events.as_slice(),
            [ClientEvent::ChunkUpdated(chunk)] if chunk.len() == 2
        ));
    }

    #[test]
    fn bad_chunk_is_an_error() {
        let mut h = Harness::ready();
        let packet = MapChunk {
            x: 0,
            y: 0,
            z: 0,
            size_x_minus_one: 0,
            size_y_minus_one: 0,
            size_z_minus_one: 0,
            compressed_data: Bytes::from_static(b"not zlib"),
        };
        let err = h
            .session
            .handle_message(IncomingMessage::MapChunk(packet))
            .unwrap_err();
        assert!(matches!(err, ClientError::Chunk(_)));
    }

    #[test]
    fn kick_requests_one_disconnect() {
        let mut h = Harness::ready();
        h.session
            .handle_message(IncomingMessage::DisconnectOrKick(Kick::new("Server full")))
            .unwrap();
        h.session
            .handle_message(IncomingMessage::DisconnectOrKick(Kick::new("again")))
            .unwrap();
        assert_eq!(
            h.drain_effects(),
            vec![SessionEffect::Send(OutgoingMessage::DisconnectNow)]
        );
        assert_eq!(h.session.kick_reason(), Some("Server full"));

        h.session.close();
        let events = h.drain_events();
        assert!(matches!(
            events.as_slice(),
            [
                ClientEvent::StateChanged(LoginState::Disconnected),
                ClientEvent::Terminated(Termination::Kicked(reason)),
            ] if reason == "Server full"
        ));
    }

    #[test]
    fn kick_during_login() {
        let mut h = Harness::connected();
        h.session
            .handle_message(IncomingMessage::DisconnectOrKick(Kick::new("Outdated client!")))
            .unwrap();
        assert_eq!(
            h.drain_effects(),
            vec![SessionEffect::Send(OutgoingMessage::DisconnectNow)]
        );
    }

    #[test]
    fn fail_ends_in_errored() {
        let mut h = Harness::connected();
        h.session.fail(ClientError::Transport(std::io::Error::from(
            std::io::ErrorKind::ConnectionReset,
        )));
        let events = h.drain_events();
        assert!(matches!(
            events.as_slice(),
            [
                ClientEvent::StateChanged(LoginState::Errored),
                ClientEvent::Terminated(Termination::Failed(ClientError::Transport(_))),
            ]
        ));
        assert_eq!(h.session.state(), LoginState::Errored);
        assert_eq!(*h.state.borrow(), LoginState::Errored);
        assert!(!h.session.begin_connect());
    }
}
