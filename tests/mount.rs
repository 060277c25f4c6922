mod support;

use netfs::client::ClientConfig;
use netfs::vfs::{AccessMode, FileKind, MountOps, NetFsMount, Status, TEST_DATA, TEST_FILE};

use support::{scratch_dir, start_server};

/// Adapter pointed at a port nothing listens on. Attribute, open, and read
/// operations are purely local and never touch the network.
fn offline_mount() -> NetFsMount {
    NetFsMount::new(ClientConfig::new("127.0.0.1", 1))
}

async fn collect(mount: &NetFsMount, path: &str) -> Result<Vec<String>, Status> {
    let mut names = Vec::new();
    mount.readdir(path, &mut |name: &str| names.push(name.to_string())).await?;
    Ok(names)
}

#[tokio::test]
async fn root_attributes_are_a_directory() {
    let attr = offline_mount().getattr("/").await.expect("getattr /");
    assert_eq!(attr.kind, FileKind::Directory);
    assert_eq!(attr.mode, 0o755);
    assert_eq!(attr.nlink, 2);
}

#[tokio::test]
async fn test_file_attributes_match_placeholder_content() {
    let attr = offline_mount().getattr("/test_file").await.expect("getattr /test_file");
    assert_eq!(attr.kind, FileKind::Regular);
    assert_eq!(attr.mode, 0o444);
    assert_eq!(attr.nlink, 1);
    assert_eq!(attr.size, TEST_DATA.len() as u64);
}

#[tokio::test]
async fn missing_path_is_not_found() {
    let mount = offline_mount();
    assert_eq!(mount.getattr("/nope").await, Err(Status::NotFound));
    assert_eq!(mount.open("/nope", AccessMode::ReadOnly).await, Err(Status::NotFound));
    assert_eq!(mount.read("/nope", 0, 16).await, Err(Status::NotFound));
}

#[tokio::test]
async fn open_is_read_only() {
    let mount = offline_mount();
    mount.open("/test_file", AccessMode::ReadOnly).await.expect("read-only open");
    assert_eq!(
        mount.open("/test_file", AccessMode::WriteOnly).await,
        Err(Status::PermissionDenied)
    );
    assert_eq!(
        mount.open("/test_file", AccessMode::ReadWrite).await,
        Err(Status::PermissionDenied)
    );
}

#[tokio::test]
async fn read_clips_to_content_end() {
    let data = offline_mount().read("/test_file", 6, 100).await.expect("read");
    assert_eq!(data, b"world!\n");
}

#[tokio::test]
async fn read_at_or_past_end_is_empty() {
    let mount = offline_mount();
    assert!(mount.read("/test_file", 13, 5).await.expect("read at end").is_empty());
    assert!(mount.read("/test_file", 20, 5).await.expect("read past end").is_empty());
}

#[tokio::test]
async fn read_returns_whole_placeholder_content() {
    let data = offline_mount().read("/test_file", 0, 1024).await.expect("read");
    assert_eq!(data, TEST_DATA);
}

#[tokio::test]
async fn readdir_surfaces_remote_entries_and_fixed_triple() {
    let root = scratch_dir("mount-remote");
    std::fs::write(root.join("remote.txt"), b"x").expect("write remote.txt");
    let port = start_server(&root).await;

    let mount = NetFsMount::new(ClientConfig::new("127.0.0.1", port));
    let names = collect(&mount, "/").await.expect("readdir /");
    assert_eq!(names, vec!["remote.txt", ".", "..", TEST_FILE]);
}

#[tokio::test]
async fn readdir_of_empty_remote_root_is_still_the_fixed_triple() {
    let root = scratch_dir("mount-empty");
    let port = start_server(&root).await;

    let mount = NetFsMount::new(ClientConfig::new("127.0.0.1", port));
    let names = collect(&mount, "/").await.expect("readdir /");
    assert_eq!(names, vec![".", "..", TEST_FILE]);
}

#[tokio::test]
async fn readdir_of_nonroot_path_is_not_found() {
    let root = scratch_dir("mount-nonroot");
    std::fs::create_dir(root.join("sub")).expect("create sub dir");
    let port = start_server(&root).await;

    let mount = NetFsMount::new(ClientConfig::new("127.0.0.1", port));
    assert_eq!(collect(&mount, "/sub").await, Err(Status::NotFound));
}

#[tokio::test]
async fn readdir_without_server_still_lists_fixed_triple() {
    let names = collect(&offline_mount(), "/").await.expect("readdir /");
    assert_eq!(names, vec![".", "..", TEST_FILE]);
}
