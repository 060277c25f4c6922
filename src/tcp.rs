//! The TCP module provides the server endpoint of the NetFS protocol.
//!
//! The listener:
//! - Accepts connections from NetFS clients
//! - Hands each accepted connection to its own detached task
//! - Decodes exactly one request per connection and streams back the reply
//!
//! Connections are one-shot by design: after the response (or a protocol
//! failure) the server closes its end and the task terminates. The accept
//! loop never waits on an in-flight connection, so a slow or malicious
//! client cannot stall admission of new ones.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::{TcpListener, TcpStream};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::protocol::message::{self, MsgType};
use crate::protocol::{wire, MAX_PATH_BYTES};

/// NetFS TCP connection handler that listens for incoming client
/// connections and serves directory listings from its configured root.
#[derive(Debug)]
pub struct NetFsTcpListener {
    /// TCP Listener for accepting incoming connections
    listener: TcpListener,
    /// Port on which the server is listening
    port: u16,
    /// Directory all request paths are resolved under. Shared read-only
    /// across connection tasks.
    root: Arc<PathBuf>,
}

/// Interface for NetFS TCP servers.
///
/// Provides methods for inspecting the listening socket and for running the
/// accept loop.
#[async_trait]
pub trait NetFsTcp: Send + Sync {
    /// Returns the actual port number on which the server is listening.
    ///
    /// Useful when binding to port 0, which lets the OS assign any
    /// available port.
    fn get_listen_port(&self) -> u16;

    /// Returns the IP address on which the server is listening.
    fn get_listen_ip(&self) -> IpAddr;

    /// Accepts client connections forever, spawning one task per
    /// connection. Returns only if the underlying listener fails.
    async fn handle_forever(&self) -> io::Result<()>;
}

impl NetFsTcpListener {
    /// Creates a new NetFS TCP listener bound to the specified address and
    /// serving the specified root directory.
    ///
    /// # Arguments
    ///
    /// * `ipstr` - IP address and port in the format "IP:PORT"
    ///   (e.g. "0.0.0.0:5555")
    /// * `root` - Directory request paths are resolved under. Startup fails
    ///   if it does not resolve to a readable directory.
    pub async fn bind(ipstr: &str, root: impl AsRef<Path>) -> io::Result<NetFsTcpListener> {
        let (ip, port) = ipstr.split_once(':').ok_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "IP Address must be of form ip:port")
        })?;
        let port = port.parse::<u16>().map_err(|_| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "Port not in range 0..=65535")
        })?;

        let root = tokio::fs::canonicalize(root.as_ref()).await?;
        if !tokio::fs::metadata(&root).await?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        let listener = TcpListener::bind(format!("{ip}:{port}")).await?;
        let port = match listener.local_addr()? {
            SocketAddr::V4(s) => s.port(),
            SocketAddr::V6(s) => s.port(),
        };
        info!("Listening on {}:{}, serving {}", ip, port, root.display());

        Ok(NetFsTcpListener { listener, port, root: Arc::new(root) })
    }
}

#[async_trait]
impl NetFsTcp for NetFsTcpListener {
    fn get_listen_port(&self) -> u16 {
        self.port
    }

    fn get_listen_ip(&self) -> IpAddr {
        self.listener.local_addr().map(|a| a.ip()).unwrap_or(IpAddr::from([0, 0, 0, 0]))
    }

    async fn handle_forever(&self) -> io::Result<()> {
        loop {
            let (socket, peer) = self.listener.accept().await?;
            info!("Accepting connection from {}", peer);
            let root = self.root.clone();
            tokio::spawn(async move {
                if let Err(e) = process_socket(socket, &root).await {
                    debug!("Connection from {} ended with error: {:#}", peer, e);
                }
            });
        }
    }
}

/// Processes one established connection: reads a single request header,
/// dispatches on its type, and closes the connection.
///
/// Only `READDIR` produces a structured response. The reserved types are
/// recognized, logged, and answered by a clean close so the peer's read
/// completes instead of blocking forever.
async fn process_socket(mut socket: TcpStream, root: &Path) -> Result<(), anyhow::Error> {
    let _ = socket.set_nodelay(true);
    let header = wire::read_header(&mut socket).await?;
    debug!("Handling request: [type {:?}; length {}]", header.msg_type, header.payload_len);

    match header.msg_type {
        MsgType::Readdir => {
            let payload = wire::read_payload(&mut socket, header.payload_len, MAX_PATH_BYTES).await?;
            let path = message::decode_path(&payload)?;
            debug!("readdir: {}", path);
            let full_path = root.join(path.trim_start_matches('/'));
            write_listing(&mut socket, &full_path).await?;
        }
        other => {
            warn!("Unsupported request type {:?}, closing connection", other);
        }
    }

    socket.shutdown().await?;
    Ok(())
}

/// Streams the listing of `dir` as length-prefixed entry records followed by
/// the zero-length terminator.
///
/// A directory that cannot be opened or enumerated yields an empty,
/// correctly terminated listing; the connection is never left open without
/// a terminator.
async fn write_listing(socket: &mut TcpStream, dir: &Path) -> Result<(), anyhow::Error> {
    match tokio::fs::read_dir(dir).await {
        Ok(mut entries) => loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let name = entry.file_name();
                    wire::write_entry(socket, name.to_string_lossy().as_bytes()).await?;
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Enumeration of {} failed: {}", dir.display(), e);
                    break;
                }
            }
        },
        Err(e) => {
            warn!("Cannot open {}: {}", dir.display(), e);
        }
    }
    wire::write_listing_end(socket).await?;
    Ok(())
}
