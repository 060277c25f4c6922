use netfs::client::ClientConfig;
use netfs::protocol::DEFAULT_PORT;
use netfs::vfs::{AccessMode, MountOps, NetFsMount, TEST_FILE};

/// Demo NetFS client: exercises the mount adapter operations against a
/// running server, standing in for the OS driver binding.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let server = match args.next() {
        Some(server) => server,
        None => {
            eprintln!("usage: client <server-host> [port]");
            std::process::exit(1);
        }
    };
    let port = match args.next() {
        Some(port) => port.parse::<u16>().unwrap_or_else(|_| {
            eprintln!("port must be in range 0..=65535");
            std::process::exit(1);
        }),
        None => DEFAULT_PORT,
    };

    let mount = NetFsMount::new(ClientConfig::new(server, port));

    let attr = mount.getattr("/").await.unwrap();
    println!("/ -> {attr:?}");

    let mut names = Vec::new();
    mount
        .readdir("/", &mut |name: &str| names.push(name.to_string()))
        .await
        .unwrap();
    for name in &names {
        println!("-> {name}");
    }

    let path = format!("/{TEST_FILE}");
    mount.open(&path, AccessMode::ReadOnly).await.unwrap();
    let data = mount.read(&path, 0, 1024).await.unwrap();
    print!("{}", String::from_utf8_lossy(&data));
}
