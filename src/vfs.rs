//! The VFS module defines the interface between the OS mount driver binding
//! and the NetFS client adapter.
//!
//! This module provides:
//! - The [`MountOps`] capability trait whose operation entry points the
//!   driver invokes on behalf of a mounted path
//! - The small fixed status set the driver understands
//! - [`NetFsMount`], the adapter that maps those operations onto either a
//!   protocol exchange (directory listing) or a canned local answer
//!
//! Attribute queries, opens, and reads are not forwarded over the network:
//! they answer from a fixed single-file placeholder data set. Only the
//! directory listing operation performs a protocol exchange, and the entries
//! the exchange yields are surfaced alongside the fixed local view rather
//! than replacing it.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::{ClientConfig, NetFsClient};

/// The fixed, read-only content of the one placeholder file.
pub const TEST_DATA: &[u8] = b"hello world!\n";

/// Name of the placeholder file under the mount root.
pub const TEST_FILE: &str = "test_file";

/// Failure codes surfaced to the mount driver binding.
///
/// Operations succeed with `Ok` or fail with exactly one of these; raw
/// transport errors never escape the adapter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// No entry exists at the requested path.
    NotFound,
    /// The requested access mode is not permitted.
    PermissionDenied,
    /// Generic failure.
    Io,
}

/// Kind of a file system object, as reported by attribute queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    Regular,
}

/// Attributes of a file system object.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FileAttr {
    pub kind: FileKind,
    /// Permission bits in the usual octal convention.
    pub mode: u32,
    pub nlink: u32,
    pub size: u64,
}

/// Access mode requested by an open call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn wants_write(self) -> bool {
        !matches!(self, AccessMode::ReadOnly)
    }
}

/// Operation entry points the OS mount driver invokes.
///
/// Each receives a path rooted at the mount point. The driver serializes
/// concurrent calls itself or tolerates concurrent independent connections;
/// the adapter opens a fresh connection per listing call, so two concurrent
/// listings never share a socket.
#[async_trait]
pub trait MountOps: Send + Sync {
    /// Returns the attributes of the object at `path`.
    async fn getattr(&self, path: &str) -> Result<FileAttr, Status>;

    /// Lists the directory at `path`, invoking `fill` once per entry name.
    async fn readdir(
        &self,
        path: &str,
        fill: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), Status>;

    /// Opens the object at `path` with the requested access mode.
    async fn open(&self, path: &str, mode: AccessMode) -> Result<(), Status>;

    /// Reads up to `size` bytes starting at `offset` from the object at
    /// `path`. A short or empty result is not an error.
    async fn read(&self, path: &str, offset: u64, size: u32) -> Result<Vec<u8>, Status>;
}

/// Client filesystem adapter backed by one configured NetFS server.
pub struct NetFsMount {
    client: NetFsClient,
}

impl NetFsMount {
    pub fn new(config: ClientConfig) -> Self {
        Self { client: NetFsClient::new(config) }
    }
}

#[async_trait]
impl MountOps for NetFsMount {
    async fn getattr(&self, path: &str) -> Result<FileAttr, Status> {
        debug!("getattr: {}", path);
        if path == "/" {
            return Ok(FileAttr { kind: FileKind::Directory, mode: 0o755, nlink: 2, size: 0 });
        }
        if path.strip_prefix('/') == Some(TEST_FILE) {
            return Ok(FileAttr {
                kind: FileKind::Regular,
                mode: 0o444,
                nlink: 1,
                size: TEST_DATA.len() as u64,
            });
        }
        Err(Status::NotFound)
    }

    async fn readdir(
        &self,
        path: &str,
        fill: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), Status> {
        debug!("readdir: {}", path);
        // The networked entries are surfaced as they stream in, but the
        // fixed local triple below stays the authoritative root listing.
        match self.client.read_dir(path, &mut *fill).await {
            Ok(count) => debug!("remote listing for {} produced {} entries", path, count),
            Err(e) => warn!("remote listing for {} failed: {}", path, e),
        }

        // We only support one directory: the root directory.
        if path != "/" {
            return Err(Status::NotFound);
        }
        fill(".");
        fill("..");
        fill(TEST_FILE);
        Ok(())
    }

    async fn open(&self, path: &str, mode: AccessMode) -> Result<(), Status> {
        debug!("open: {}", path);
        if path.strip_prefix('/') != Some(TEST_FILE) {
            return Err(Status::NotFound);
        }
        // The placeholder file only supports read-only access.
        if mode.wants_write() {
            return Err(Status::PermissionDenied);
        }
        Ok(())
    }

    async fn read(&self, path: &str, offset: u64, size: u32) -> Result<Vec<u8>, Status> {
        debug!("read: {} (offset {}, size {})", path, offset, size);
        if path.strip_prefix('/') != Some(TEST_FILE) {
            return Err(Status::NotFound);
        }
        let len = TEST_DATA.len() as u64;
        // An offset at or past the end reads zero bytes, not an error.
        if offset >= len {
            return Ok(Vec::new());
        }
        let end = len.min(offset + u64::from(size)) as usize;
        Ok(TEST_DATA[offset as usize..end].to_vec())
    }
}
