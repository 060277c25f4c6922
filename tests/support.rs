use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use netfs::tcp::{NetFsTcp, NetFsTcpListener};

static SCRATCH_SEQ: AtomicU32 = AtomicU32::new(0);

/// Creates a unique empty directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    let dir =
        std::env::temp_dir().join(format!("netfs-{}-{}-{}", tag, std::process::id(), seq));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Binds a server for `root` on an ephemeral port and runs its accept loop
/// in the background. Returns the bound port.
pub async fn start_server(root: &Path) -> u16 {
    let listener =
        NetFsTcpListener::bind("127.0.0.1:0", root).await.expect("bind listener");
    let port = listener.get_listen_port();
    tokio::spawn(async move {
        let _ = listener.handle_forever().await;
    });
    port
}
