use netfs::protocol::DEFAULT_PORT;
use netfs::tcp::{NetFsTcp, NetFsTcpListener};

/// Demo NetFS server: serves directory listings of a local root over the
/// NetFS protocol.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let root = match std::env::args().nth(1) {
        Some(root) => root,
        None => {
            eprintln!("usage: server <root-dir>");
            std::process::exit(1);
        }
    };

    println!("Starting NetFS server for {root} on 0.0.0.0:{DEFAULT_PORT}");
    let listener = NetFsTcpListener::bind(&format!("0.0.0.0:{DEFAULT_PORT}"), &root)
        .await
        .unwrap();
    listener.handle_forever().await.unwrap();
}
