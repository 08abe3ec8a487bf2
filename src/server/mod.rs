//! Line-oriented TCP front end over the instrument manager.
//!
//! One thread per client; each request line is handled synchronously and
//! pending events are pumped through the manager's callback before the
//! response goes out.

pub mod protocol;

pub use protocol::SNAPSHOT_DEPTH;

use crate::events::Event;
use crate::manager::InstrumentManager;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// TCP server speaking the line protocol of [`protocol`].
///
/// Order ids are issued here, monotonically from 1, so they are unique per
/// process across all client connections.
pub struct TcpServer {
    listener: TcpListener,
    service: Arc<InstrumentManager>,
    next_order_id: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
}

impl TcpServer {
    /// Binds to `addr` (port 0 picks an ephemeral port), installs an event
    /// callback that logs engine output, and starts all instrument
    /// pipelines.
    ///
    /// # Errors
    /// Propagates the bind failure.
    pub fn bind(addr: impl ToSocketAddrs, service: Arc<InstrumentManager>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        service.set_event_callback(Arc::new(log_event));
        service.start();
        Ok(Self {
            listener,
            service,
            next_order_id: Arc::new(AtomicU64::new(1)),
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address the server is listening on.
    ///
    /// # Errors
    /// Propagates the socket query failure.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts clients until [`Self::stop`] is observed, spawning one
    /// handler thread per connection. Blocks the calling thread.
    ///
    /// # Errors
    /// Currently always returns `Ok`; the signature leaves room for fatal
    /// accept-loop errors.
    pub fn run(&self) -> io::Result<()> {
        self.running.store(true, Ordering::Release);
        if let Ok(addr) = self.local_addr() {
            info!("listening on {}", addr);
        }

        for stream in self.listener.incoming() {
            if !self.running.load(Ordering::Acquire) {
                break;
            }
            match stream {
                Ok(stream) => {
                    let service = Arc::clone(&self.service);
                    let next_order_id = Arc::clone(&self.next_order_id);
                    let running = Arc::clone(&self.running);
                    thread::spawn(move || handle_client(stream, service, next_order_id, running));
                }
                Err(err) => {
                    if self.running.load(Ordering::Acquire) {
                        warn!("failed to accept connection: {}", err);
                    }
                }
            }
        }
        Ok(())
    }

    /// Requests shutdown. Takes effect at the next accept, as with the
    /// blocking listener this races an in-flight `accept` call.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

fn handle_client(
    stream: TcpStream,
    service: Arc<InstrumentManager>,
    next_order_id: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
) {
    let peer = stream.peer_addr().ok();
    info!("client connected: {:?}", peer);

    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(err) => {
            warn!("failed to clone client stream: {}", err);
            return;
        }
    };
    let reader = BufReader::new(stream);

    for line in reader.lines() {
        if !running.load(Ordering::Acquire) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = protocol::process_request(&service, &next_order_id, &line);
        service.process_events();

        if writer.write_all(response.as_bytes()).is_err() {
            break;
        }
    }

    info!("client disconnected: {:?}", peer);
}

/// Default event callback: mirrors engine output into the log, the way the
/// management console expects to see it.
fn log_event(event: &Event) {
    match event {
        Event::Ack { order_id, .. } => info!("ACK {}", order_id),
        Event::Trade { trade, .. } => info!(
            "TRADE maker={} taker={} px={} qty={}",
            trade.maker_id, trade.taker_id, trade.price, trade.quantity
        ),
        Event::CancelAck { order_id, .. } => info!("CANCEL_ACK {}", order_id),
        Event::CancelReject { order_id, .. } => info!("CANCEL_REJECT {}", order_id),
        Event::Reject { order_id, .. } => warn!("REJECT {}", order_id),
    }
}
