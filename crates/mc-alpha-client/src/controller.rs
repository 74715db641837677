//! Connection controller.
//!
//! Every session runs on its own thread with a single-threaded runtime, so
//! transport reads, timer ticks and caller commands are handled strictly one
//! at a time. Callers talk to it through [`Client`] and hear back on the
//! [`ClientEvent`] channel.
//!
//! Requests are queued in an outbox and drained by their own `select!` arm,
//! so a peer that stops reading never holds up commands, reads or ticks.

use std::future::{self, Future};
use std::io;
use std::pin::Pin;
use std::thread;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use mc_alpha_proto::{IncomingMessageParser, OutgoingMessage};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{debug, error, info, trace, warn};

use crate::config::SessionSettings;
use crate::connection_info::ConnectionInfo;
use crate::error::ClientError;
use crate::event::{ClientEvent, Notifier};
use crate::heartbeat::PositionHeartbeat;
use crate::session::{LoginState, Session, SessionEffect};

#[derive(Debug)]
enum Command {
    Connect(ConnectionInfo),
    Disconnect,
    Submit(OutgoingMessage),
}

/// Handle to a session worker.
///
/// Every method only enqueues work and returns at once. Once the session has
/// terminated they are no-ops.
#[derive(Debug, Clone)]
pub struct Client {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<LoginState>,
}

/// Owns the worker thread; see [`Client::spawn`].
#[derive(Debug)]
pub struct WorkerHandle {
    thread: thread::JoinHandle<()>,
}

impl WorkerHandle {
    /// Block until the worker thread has exited.
    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("Session worker panicked");
        }
    }
}

impl Client {
    /// Start a worker thread. Events arrive on the returned receiver, ending
    /// with exactly one [`ClientEvent::Terminated`] for a started session.
    ///
    /// Fails with `InvalidInput` for a zero heartbeat interval.
    pub fn spawn(
        settings: SessionSettings,
    ) -> io::Result<(Self, mpsc::UnboundedReceiver<ClientEvent>, WorkerHandle)> {
        if settings.heartbeat_interval.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "heartbeat interval must be greater than zero",
            ));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(LoginState::Disconnected);

        let worker = Worker::new(settings, Notifier::new(event_tx, state_tx), command_rx);
        let thread = thread::Builder::new()
            .name("mc-alpha-session".into())
            .spawn(move || runtime.block_on(worker.run()))?;

        let client = Self {
            commands: command_tx,
            state: state_rx,
        };
        Ok((client, event_rx, WorkerHandle { thread }))
    }

    /// Open the connection and log in. Ignored unless the session is still
    /// unused.
    pub fn connect(&self, info: ConnectionInfo) {
        self.send(Command::Connect(info));
    }

    /// Close the connection. Writes submitted earlier are flushed first.
    pub fn disconnect(&self) {
        self.send(Command::Disconnect);
    }

    /// Write a message to the server, or close for `DisconnectNow`.
    pub fn submit(&self, message: OutgoingMessage) {
        self.send(Command::Submit(message));
    }

    /// Latest login state.
    pub fn state(&self) -> LoginState {
        *self.state.borrow()
    }

    /// Wait until the login state satisfies `f`, returning that state. Fails
    /// once the worker is gone.
    pub async fn wait_for_state(
        &mut self,
        mut f: impl FnMut(LoginState) -> bool,
    ) -> Result<LoginState, watch::error::RecvError> {
        self.state.wait_for(|state| f(*state)).await.map(|state| *state)
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.commands.send(command) {
            debug!("Session already terminated, dropping {:?}", e.0);
        }
    }
}

/// Longest a close waits for queued writes before dropping the socket.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Read half of an open connection.
struct Inbound {
    reader: OwnedReadHalf,
    parser: IncomingMessageParser,
}

/// Write half of an open connection.
struct Outbound {
    writer: OwnedWriteHalf,
    /// Encoded requests not yet accepted by the socket, in submission order.
    outbox: BytesMut,
}

type ConnectFuture = Pin<Box<dyn Future<Output = io::Result<TcpStream>> + Send>>;

struct Worker {
    settings: SessionSettings,
    notifier: Notifier,
    commands: mpsc::UnboundedReceiver<Command>,
    session: Option<Session>,
    connecting: Option<ConnectFuture>,
    inbound: Option<Inbound>,
    outbound: Option<Outbound>,
    heartbeat: PositionHeartbeat,
    finished: bool,
}

impl Worker {
    fn new(
        settings: SessionSettings,
        notifier: Notifier,
        commands: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        Self {
            settings,
            notifier,
            commands,
            session: None,
            connecting: None,
            inbound: None,
            outbound: None,
            heartbeat: PositionHeartbeat::new(settings.heartbeat_interval),
            finished: false,
        }
    }

    async fn run(mut self) {
        while !self.finished {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        debug!("All client handles dropped");
                        self.close().await;
                        break;
                    }
                },
                result = wait_connected(&mut self.connecting) => {
                    self.connecting = None;
                    self.handle_connected(result).await;
                }
                result = read_some(&mut self.inbound) => {
                    self.handle_read(result).await;
                }
                result = write_some(&mut self.outbound) => {
                    self.handle_write(result);
                }
                _ = self.heartbeat.tick() => {
                    self.send_position_report().await;
                }
            }
        }
        debug!("Session worker exiting");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect(info) => self.start_connect(info),
            Command::Disconnect => {
                if self.session.is_none() {
                    debug!("Disconnect requested before connect");
                    return;
                }
                info!("Disconnecting");
                self.close().await;
            }
            Command::Submit(message) => self.submit(message).await,
        }
    }

    fn start_connect(&mut self, info: ConnectionInfo) {
        if let Some(session) = &self.session {
            debug!(
                "Connect to {info} ignored, session is {:?}",
                session.state()
            );
            return;
        }
        let mut session = Session::new(info.clone(), self.notifier.clone());
        session.begin_connect();
        self.session = Some(session);

        info!("Connecting to {}:{}", info.host, info.port);
        let timeout = self.settings.connect_timeout;
        self.connecting = Some(Box::pin(async move {
            match time::timeout(timeout, TcpStream::connect((info.host.as_str(), info.port))).await
            {
                Ok(result) => result,
                Err(_) => Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no answer from {}:{} within {timeout:?}", info.host, info.port),
                )),
            }
        }));
    }

    async fn handle_connected(&mut self, result: io::Result<TcpStream>) {
        let stream = match result {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Connect failed: {e}");
                self.fail(ClientError::Transport(e));
                return;
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not set TCP_NODELAY: {e}");
        }
        match stream.peer_addr() {
            Ok(addr) => info!("Connected to {addr}"),
            Err(_) => info!("Connected"),
        }

        let (reader, writer) = stream.into_split();
        self.inbound = Some(Inbound {
            reader,
            parser: IncomingMessageParser::new(),
        });
        self.outbound = Some(Outbound {
            writer,
            outbox: BytesMut::with_capacity(4 * 1024),
        });
        if let Some(session) = self.session.as_mut() {
            session.on_connected();
        }
        self.apply_effects().await;
    }

    async fn handle_read(&mut self, result: io::Result<usize>) {
        match result {
            Ok(0) => {
                info!("Server closed the connection");
                self.close().await;
            }
            Ok(n) => {
                trace!("Read {n} bytes");
                self.drain_messages().await;
            }
            Err(e) => {
                warn!("Read failed: {e}");
                self.fail(ClientError::Transport(e));
            }
        }
    }

    /// Hand every complete buffered message to the session, in order.
    async fn drain_messages(&mut self) {
        loop {
            let Some(inbound) = self.inbound.as_mut() else {
                return;
            };
            let message = match inbound.parser.next_message() {
                Ok(Some(message)) => message,
                Ok(None) => return,
                Err(e) => {
                    error!("Dropping connection, stream cannot be framed: {e}");
                    self.fail(ClientError::Decode(e));
                    return;
                }
            };
            let Some(session) = self.session.as_mut() else {
                return;
            };
            if let Err(e) = session.handle_message(message) {
                error!("Dropping connection: {e}");
                self.fail(e);
                return;
            }
            self.apply_effects().await;
        }
    }

    fn handle_write(&mut self, result: io::Result<usize>) {
        match result {
            Ok(0) => self.fail(ClientError::Transport(io::ErrorKind::WriteZero.into())),
            Ok(n) => {
                if let Some(outbound) = self.outbound.as_mut() {
                    outbound.outbox.advance(n);
                }
            }
            Err(e) => {
                warn!("Write failed: {e}");
                self.fail(ClientError::Transport(e));
            }
        }
    }

    async fn apply_effects(&mut self) {
        while let Some(effect) = self.session.as_mut().and_then(Session::next_effect) {
            match effect {
                SessionEffect::Send(message) => self.submit(message).await,
                SessionEffect::ArmHeartbeat => {
                    debug!("Position heartbeat every {:?}", self.heartbeat.period());
                    self.heartbeat.arm();
                }
            }
        }
    }

    async fn send_position_report(&mut self) {
        if let Some(report) = self.session.as_ref().and_then(Session::position_report) {
            self.submit(report).await;
        }
    }

    async fn submit(&mut self, message: OutgoingMessage) {
        if message.is_disconnect_now() {
            self.close().await;
            return;
        }
        let Some(outbound) = self.outbound.as_mut() else {
            debug!("Transport not open, dropping {message:?}");
            return;
        };
        match message.to_bytes() {
            Ok(Some(bytes)) => outbound.outbox.extend_from_slice(&bytes),
            Ok(None) => {}
            Err(e) => {
                error!("Cannot encode {message:?}: {e}");
                self.fail(ClientError::Encode(e));
            }
        }
    }

    /// Orderly shutdown: flush what is queued, close the socket, report. A
    /// peer that stops reading gets [`CLOSE_FLUSH_TIMEOUT`] before the socket
    /// is dropped anyway.
    async fn close(&mut self) {
        self.inbound = None;
        if let Some(mut outbound) = self.outbound.take() {
            let flush = async {
                outbound.writer.write_all(&outbound.outbox).await?;
                outbound.writer.shutdown().await
            };
            match time::timeout(CLOSE_FLUSH_TIMEOUT, flush).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("Flush on close failed: {e}"),
                Err(_) => warn!(
                    "Peer not reading, dropping {} unsent bytes",
                    outbound.outbox.len()
                ),
            }
        }
        self.teardown();
        if let Some(session) = self.session.as_mut() {
            session.close();
        }
    }

    fn fail(&mut self, error: ClientError) {
        self.teardown();
        if let Some(session) = self.session.as_mut() {
            session.fail(error);
        }
    }

    fn teardown(&mut self) {
        self.connecting = None;
        self.inbound = None;
        self.outbound = None;
        self.heartbeat.disarm();
        self.finished = true;
    }
}

async fn wait_connected(connecting: &mut Option<ConnectFuture>) -> io::Result<TcpStream> {
    match connecting.as_mut() {
        Some(fut) => fut.await,
        None => future::pending().await,
    }
}

/// Hand the socket as much of the outbox as it takes in one write. Pending
/// forever while there is nothing to send.
async fn write_some(outbound: &mut Option<Outbound>) -> io::Result<usize> {
    match outbound.as_mut() {
        Some(o) if !o.outbox.is_empty() => o.writer.write(&o.outbox).await,
        _ => future::pending().await,
    }
}

async fn read_some(inbound: &mut Option<Inbound>) -> io::Result<usize> {
    match inbound.as_mut() {
        Some(t) => t.reader.read_buf(t.parser.buffer_mut()).await,
        None => future::pending().await,
    }
}
