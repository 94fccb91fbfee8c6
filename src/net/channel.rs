use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Mutex;

use crate::net::protocol::{ClientMessage, ServerMessage};

pub const DEFAULT_ADDR: &str = "127.0.0.1:15555";

#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    #[error("failed to connect to backend at {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("backend connection closed")]
    Closed,
}

/// The single bidirectional channel to the backend. Injected into the app so
/// tests can substitute [`InProcessBackend`].
pub trait BackendChannel: Send + Sync {
    fn send(&self, message: ClientMessage) -> Result<(), ChannelError>;
    fn try_recv(&self) -> Result<Option<ServerMessage>, ChannelError>;
}

/// Line-delimited JSON over TCP. A reader thread parses inbound pushes into a
/// queue which the UI drains once per frame; dropping the backend shuts the
/// stream down so the thread exits.
pub struct TcpBackend {
    writer: Mutex<TcpStream>,
    inbound: Mutex<Receiver<ServerMessage>>,
    stream: TcpStream,
}

impl TcpBackend {
    pub fn connect(addr: &str) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr).map_err(|source| ChannelError::Connect {
            addr: addr.to_string(),
            source,
        })?;
        let reader = stream.try_clone()?;
        let writer = stream.try_clone()?;
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || read_loop(reader, tx));
        tracing::info!("connected to backend at {addr}");
        Ok(Self {
            writer: Mutex::new(writer),
            inbound: Mutex::new(rx),
            stream,
        })
    }
}

impl BackendChannel for TcpBackend {
    fn send(&self, message: ClientMessage) -> Result<(), ChannelError> {
        let payload = serde_json::to_string(&message)?;
        let mut writer = self.writer.lock().unwrap();
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn try_recv(&self) -> Result<Option<ServerMessage>, ChannelError> {
        match self.inbound.lock().unwrap().try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::Closed),
        }
    }
}

impl Drop for TcpBackend {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

fn read_loop(stream: TcpStream, tx: Sender<ServerMessage>) {
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::info!("backend reader stopped: {e}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ServerMessage>(line.trim()) {
            Ok(message) => {
                if tx.send(message).is_err() {
                    return;
                }
            }
            Err(e) => tracing::warn!("dropping malformed backend message: {e}"),
        }
    }
    tracing::info!("backend closed the connection");
}

/// Queue-backed stand-in for the backend: tests push [`ServerMessage`]s and
/// inspect what the client sent.
#[derive(Default)]
pub struct InProcessBackend {
    inbound: Mutex<VecDeque<ServerMessage>>,
    sent: Mutex<Vec<ClientMessage>>,
}

impl InProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: ServerMessage) {
        self.inbound.lock().unwrap().push_back(message);
    }

    /// Drains and returns everything the client has sent so far.
    pub fn take_sent(&self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.sent.lock().unwrap())
    }
}

impl BackendChannel for InProcessBackend {
    fn send(&self, message: ClientMessage) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    fn try_recv(&self) -> Result<Option<ServerMessage>, ChannelError> {
        Ok(self.inbound.lock().unwrap().pop_front())
    }
}
