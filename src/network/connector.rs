//! Connector
//!
//! Turns a connection attempt into one blocking call.
//!
//! The TCP connect runs on a worker thread that reports progress over a
//! channel. The caller waits on that channel, its cancellation token and the
//! connect deadline at the same time, feeding whatever happens first into the
//! [`ConnectionStateMachine`].

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::config::ClientConfig;
use crate::error::{Result, SkkError};

use super::connection::Connection;
use super::state::{ConnectionEvent, ConnectionState, ConnectionStateMachine, FailureReason};

// =============================================================================
// Cancellation
// =============================================================================

/// Create a linked cancel handle / token pair
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let flag = Arc::new(AtomicBool::new(false));
    let (tx, rx) = channel::bounded(1);
    (
        CancelHandle {
            flag: Arc::clone(&flag),
            tx,
        },
        CancelToken { flag, rx },
    )
}

/// Cancels the connect attempt holding the matching token.
///
/// Dropping every handle without calling `cancel` never cancels.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    tx: Sender<()>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // wake a waiting connect; a full channel already carries a wakeup
        let _ = self.tx.try_send(());
    }
}

/// Observed by [`Connector::connect`]
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    rx: Receiver<()>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Connector
// =============================================================================

/// Result of a connect attempt that did not fail
#[derive(Debug)]
pub enum ConnectOutcome {
    Ready(Connection),
    Cancelled,
}

/// Progress reported by the connect worker
enum Progress {
    Waiting(String),
    Connected(TcpStream),
    Failed(FailureReason),
}

/// Opens a TCP stream to one resolved address within the given time
pub type ConnectFn = Arc<dyn Fn(&SocketAddr, Duration) -> io::Result<TcpStream> + Send + Sync>;

/// Runs a single connection attempt
pub struct Connector {
    config: ClientConfig,

    /// Shared so other threads can watch the attempt
    machine: Mutex<ConnectionStateMachine>,

    connect_fn: ConnectFn,
}

impl Connector {
    /// Connector using `TcpStream::connect_timeout`
    pub fn new(config: ClientConfig) -> Self {
        Self::with_connect_fn(config, Arc::new(TcpStream::connect_timeout))
    }

    /// Connector opening streams through `connect_fn`
    pub fn with_connect_fn(config: ClientConfig, connect_fn: ConnectFn) -> Self {
        Self {
            config,
            machine: Mutex::new(ConnectionStateMachine::new()),
            connect_fn,
        }
    }

    /// Current state of the attempt
    pub fn state(&self) -> ConnectionState {
        self.machine.lock().state().clone()
    }

    /// Connect, blocking until the attempt is ready, failed or cancelled.
    ///
    /// A connector runs one attempt; calling this again fails with
    /// `InvalidTransition`.
    pub fn connect(&self, cancel: &CancelToken) -> Result<ConnectOutcome> {
        if self.config.connect_timeout_ms == 0 {
            return Err(SkkError::Config(
                "connect timeout must be greater than zero".to_string(),
            ));
        }

        let addr = self.config.addr();

        if cancel.is_cancelled() {
            self.apply(ConnectionEvent::Cancel)?;
            return Ok(ConnectOutcome::Cancelled);
        }

        self.apply(ConnectionEvent::BeginNegotiation)?;
        tracing::info!("Connecting to {}", addr);

        let deadline = Instant::now() + Duration::from_millis(self.config.connect_timeout_ms);
        let (progress_tx, progress_rx) = channel::unbounded();
        let worker_addr = addr.clone();
        let connect_fn = Arc::clone(&self.connect_fn);
        let spawned = thread::Builder::new()
            .name("skkserv-connect".to_string())
            .spawn(move || connect_worker(&worker_addr, deadline, &*connect_fn, &progress_tx));
        if let Err(e) = spawned {
            return self.fail(addr, FailureReason::Transport(e.to_string()));
        }

        let timeout = channel::at(deadline);
        let mut handles_alive = true;

        loop {
            let wake = if handles_alive {
                cancel.rx.clone()
            } else {
                channel::never()
            };

            channel::select! {
                recv(progress_rx) -> msg => match msg {
                    Ok(Progress::Waiting(reason)) => {
                        tracing::debug!("Waiting: {}", reason);
                        self.apply(ConnectionEvent::StillWaiting(reason))?;
                    }
                    Ok(Progress::Connected(stream)) => {
                        // the stream is dropped if the caller gave up meanwhile
                        if cancel.is_cancelled() {
                            self.apply(ConnectionEvent::Cancel)?;
                            return Ok(ConnectOutcome::Cancelled);
                        }
                        return self.finish(stream, addr);
                    }
                    Ok(Progress::Failed(reason)) => return self.fail(addr, reason),
                    Err(_) => {
                        let reason = FailureReason::Transport("connect worker exited".to_string());
                        return self.fail(addr, reason);
                    }
                },
                recv(wake) -> msg => {
                    if msg.is_err() {
                        // every handle is gone, nothing can cancel anymore
                        handles_alive = false;
                        continue;
                    }
                    if cancel.is_cancelled() {
                        self.apply(ConnectionEvent::Cancel)?;
                        tracing::info!("Connection to {} cancelled", addr);
                        return Ok(ConnectOutcome::Cancelled);
                    }
                },
                recv(timeout) -> _ => return self.fail(addr, FailureReason::TimedOut),
            }
        }
    }

    fn finish(&self, stream: TcpStream, addr: String) -> Result<ConnectOutcome> {
        let mut connection = match Connection::new(stream) {
            Ok(connection) => connection,
            Err(e) => return self.fail(addr, FailureReason::Transport(e.to_string())),
        };
        if let Err(e) =
            connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)
        {
            return self.fail(addr, FailureReason::Transport(e.to_string()));
        }

        self.apply(ConnectionEvent::Usable)?;
        tracing::info!("Connected to {}", connection.peer_addr());
        Ok(ConnectOutcome::Ready(connection))
    }

    fn fail(&self, addr: String, reason: FailureReason) -> Result<ConnectOutcome> {
        self.apply(ConnectionEvent::Error(reason.clone()))?;
        Err(SkkError::ConnectFailed { addr, reason })
    }

    fn apply(&self, event: ConnectionEvent) -> Result<()> {
        self.machine.lock().apply(event)?;
        Ok(())
    }
}

/// Resolve `addr` and try each address in turn until the deadline.
///
/// Runs on its own thread; a send error means nobody waits anymore.
fn connect_worker(
    addr: &str,
    deadline: Instant,
    connect: &(dyn Fn(&SocketAddr, Duration) -> io::Result<TcpStream> + Send + Sync),
    progress: &Sender<Progress>,
) {
    let addrs: Vec<SocketAddr> = match addr.to_socket_addrs() {
        Ok(addrs) => addrs.collect(),
        Err(e) => {
            let _ = progress.send(Progress::Failed(FailureReason::Resolve(e.to_string())));
            return;
        }
    };
    if addrs.is_empty() {
        let reason = FailureReason::Resolve(format!("no addresses for {}", addr));
        let _ = progress.send(Progress::Failed(reason));
        return;
    }

    let last = addrs.len() - 1;
    for (i, target) in addrs.iter().enumerate() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            let _ = progress.send(Progress::Failed(FailureReason::TimedOut));
            return;
        }

        match connect(target, remaining) {
            Ok(stream) => {
                let _ = progress.send(Progress::Connected(stream));
                return;
            }
            Err(e) if i == last => {
                let _ = progress.send(Progress::Failed(FailureReason::from(&e)));
                return;
            }
            Err(e) => {
                if progress
                    .send(Progress::Waiting(format!("{}: {}", target, e)))
                    .is_err()
                {
                    return;
                }
            }
        }
    }
}
