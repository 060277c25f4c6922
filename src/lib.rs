//! NetFS - a remote directory tree exposed as a mounted virtual file system
//!
//! This library implements both endpoints of a small length-framed TCP
//! protocol: a server that executes directory listings against a real
//! directory on its host, and a client-side adapter that translates the
//! file system operations issued by an OS mount driver into protocol
//! exchanges or canned local answers.
//!
//! ## Main Components
//!
//! - `protocol`: The wire format. A fixed 10-byte message header (payload
//!   length and message type), the framing primitives that mask partial
//!   reads and writes on a stream socket, and the length-prefixed directory
//!   entry records that make up a listing response.
//!
//! - `tcp`: TCP-based server implementation that accepts client connections,
//!   decodes one request per connection, and streams back the listing of the
//!   requested directory under its configured root.
//!
//! - `client`: The client side of the exchange. Each listing call opens a
//!   fresh connection, sends a `READDIR` request, and surfaces the reply
//!   entries as they stream in.
//!
//! - `vfs`: The mount-facing adapter. Implements the [`vfs::MountOps`]
//!   capability trait consumed by the OS driver binding: attribute queries,
//!   opens, and reads answer locally from a fixed placeholder data set, while
//!   directory listings go over the network.
//!
//! ## Usage
//!
//! To serve a directory, bind a [`tcp::NetFsTcpListener`] and call
//! `handle_forever`. To consume one, construct a [`vfs::NetFsMount`] from a
//! [`client::ClientConfig`] and hand it to the mount driver binding.

pub mod client;
pub mod protocol;
pub mod tcp;
pub mod vfs;
