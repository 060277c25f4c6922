//! Client endpoint of the NetFS protocol.
//!
//! Connections are one-shot: every listing call opens a fresh TCP
//! connection, performs exactly one request/response exchange, and closes.
//! Two concurrent listing calls therefore never share a socket. The
//! exchange blocks until completion, error, or peer closure; callers that
//! need bounded latency impose their own timeout around the whole call.

use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::protocol::message::{encode_path, MsgHeader, MsgType};
use crate::protocol::wire::{self, WireError};
use crate::protocol::DEFAULT_PORT;

/// Connection parameters for reaching a NetFS server.
///
/// Constructed once at startup and passed into the adapter; operation
/// handlers never read ambient process-wide state.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Host name or address of the server.
    pub server_host: String,
    /// TCP port the server listens on.
    pub port: u16,
}

impl ClientConfig {
    pub fn new(server_host: impl Into<String>, port: u16) -> Self {
        Self { server_host: server_host.into(), port }
    }

    /// Connection parameters with the well-known default port.
    pub fn with_default_port(server_host: impl Into<String>) -> Self {
        Self::new(server_host, DEFAULT_PORT)
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.server_host, self.port)
    }
}

/// Issues listing requests against one configured server.
pub struct NetFsClient {
    config: ClientConfig,
}

impl NetFsClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs one `READDIR` exchange for `path` on a fresh connection.
    ///
    /// Entries are surfaced through `fill` one by one as the response
    /// streams in; nothing is cached across calls. Returns the number of
    /// entries the server sent before the terminator.
    pub async fn read_dir<F>(&self, path: &str, mut fill: F) -> Result<usize, WireError>
    where
        F: FnMut(&str),
    {
        let mut socket =
            TcpStream::connect(self.config.addr()).await.map_err(WireError::Transport)?;
        let _ = socket.set_nodelay(true);

        let payload = encode_path(path);
        let header = MsgHeader::new(MsgType::Readdir, payload.len() as u64);
        debug!("readdir request for {} to {}", path, self.config.addr());
        wire::write_header(&mut socket, &header).await?;
        wire::write_exact(&mut socket, &payload).await?;

        let mut count = 0;
        while let Some(name) = wire::read_entry(&mut socket).await? {
            let name = String::from_utf8_lossy(&name);
            trace!("-> {}", name);
            fill(&name);
            count += 1;
        }
        Ok(count)
    }
}
