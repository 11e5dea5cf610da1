/*!
 * RealFS Tests
 * Adapter-level tests for the sandboxed host filesystem
 */

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use vos_host::config::HostConfig;
use vos_host::vfs::{FileData, FileSystem, RealFS, VfsError};

fn setup() -> (TempDir, RealFS) {
    let temp = TempDir::new().unwrap();
    let fs = RealFS::new(&HostConfig::with_data_dir(temp.path())).unwrap();
    (temp, fs)
}

#[test]
fn test_identity_and_readiness() {
    let (_temp, fs) = setup();
    assert_eq!(fs.fs_type_name(), "real");
    fs.ready().unwrap();
}

#[test]
fn test_write_read_roundtrip_text() {
    let (_temp, fs) = setup();
    fs.write_file("/docs/hello.txt", b"hello world").unwrap();

    let data = fs.read_file("/docs/hello.txt", false).unwrap();
    assert_eq!(data, FileData::Text("hello world".into()));
}

#[test]
fn test_write_read_roundtrip_binary() {
    let (_temp, fs) = setup();
    let payload: Vec<u8> = (0..=255).collect();
    fs.write_file("/blob.bin", &payload).unwrap();

    let data = fs.read_file("/blob.bin", true).unwrap();
    assert_eq!(data, FileData::Binary(payload));
}

#[test]
fn test_write_creates_parents_and_overwrites() {
    let (_temp, fs) = setup();
    fs.write_file("/a/b/c/deep.txt", b"one").unwrap();
    fs.write_file("/a/b/c/deep.txt", b"two").unwrap();
    assert_eq!(
        fs.read_file("/a/b/c/deep.txt", false).unwrap(),
        FileData::Text("two".into())
    );
}

#[test]
fn test_read_missing_file() {
    let (_temp, fs) = setup();
    assert!(matches!(
        fs.read_file("/nope.txt", false),
        Err(VfsError::NotFound(_)),
    ));
}

#[test]
fn test_read_directory_as_file_fails() {
    let (_temp, fs) = setup();
    fs.make_dir("/d").unwrap();
    assert!(matches!(
        fs.read_file("/d", false),
        Err(VfsError::NotFound(_)),
    ));
}

#[test]
fn test_make_dir_idempotent() {
    let (_temp, fs) = setup();
    fs.make_dir("/x/y/z").unwrap();
    fs.make_dir("/x/y/z").unwrap();
    assert!(fs.dir_exists("/x/y/z").unwrap());
}

#[test]
fn test_list_dir_partitioning() {
    let (_temp, fs) = setup();
    fs.make_dir("/top/b").unwrap();
    fs.write_file("/top/a.txt", b"x").unwrap();

    let dirs_first: Vec<_> = fs
        .list_dir("/top", true)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(dirs_first, vec!["b", "a.txt"]);

    let files_first: Vec<_> = fs
        .list_dir("/top", false)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(files_first, vec!["a.txt", "b"]);
}

#[test]
fn test_list_dir_missing() {
    let (_temp, fs) = setup();
    assert!(matches!(
        fs.list_dir("/absent", true),
        Err(VfsError::NotFound(_)),
    ));
}

#[test]
fn test_list_root() {
    let (_temp, fs) = setup();
    fs.write_file("/rooted.txt", b"x").unwrap();
    let names: Vec<_> = fs
        .list_dir("/", false)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert!(names.contains(&"rooted.txt".to_string()));
}

#[test]
fn test_delete_file() {
    let (_temp, fs) = setup();
    fs.write_file("/gone.txt", b"x").unwrap();
    fs.delete_file("/gone.txt").unwrap();
    assert!(!fs.exists("/gone.txt").unwrap());

    assert!(matches!(
        fs.delete_file("/gone.txt"),
        Err(VfsError::NotFound(_)),
    ));
}

#[test]
fn test_delete_dir_non_recursive_refuses_non_empty() {
    let (_temp, fs) = setup();
    fs.write_file("/full/inner.txt", b"keep me").unwrap();

    assert!(matches!(
        fs.delete_dir("/full", false),
        Err(VfsError::NonRecursiveDirectory(_)),
    ));

    // Directory and contents remain untouched
    assert!(fs.dir_exists("/full").unwrap());
    assert_eq!(
        fs.read_file("/full/inner.txt", false).unwrap(),
        FileData::Text("keep me".into())
    );
}

#[test]
fn test_delete_dir_empty_and_recursive() {
    let (_temp, fs) = setup();
    fs.make_dir("/empty").unwrap();
    fs.delete_dir("/empty", false).unwrap();
    assert!(!fs.exists("/empty").unwrap());

    fs.write_file("/tree/a/b.txt", b"x").unwrap();
    fs.delete_dir("/tree", true).unwrap();
    assert!(!fs.exists("/tree").unwrap());
}

#[test]
fn test_delete_dir_on_file_is_not_found() {
    let (_temp, fs) = setup();
    fs.write_file("/f.txt", b"x").unwrap();
    assert!(matches!(
        fs.delete_dir("/f.txt", true),
        Err(VfsError::NotFound(_)),
    ));
}

#[test]
fn test_move_file() {
    let (_temp, fs) = setup();
    fs.write_file("/src.txt", b"payload").unwrap();
    fs.move_file("/src.txt", "/dest/renamed.txt").unwrap();

    assert!(!fs.exists("/src.txt").unwrap());
    assert_eq!(
        fs.read_file("/dest/renamed.txt", false).unwrap(),
        FileData::Text("payload".into())
    );
}

#[test]
fn test_move_missing_file() {
    let (_temp, fs) = setup();
    assert!(matches!(
        fs.move_file("/absent", "/anywhere"),
        Err(VfsError::NotFound(_)),
    ));
}

#[test]
fn test_move_dir_exact_target() {
    let (_temp, fs) = setup();
    fs.write_file("/old/f.txt", b"x").unwrap();
    fs.move_dir("/old", "/new", false).unwrap();

    assert!(!fs.exists("/old").unwrap());
    assert!(fs.exists("/new/f.txt").unwrap());
}

#[test]
fn test_move_dir_inside_nests_under_dest() {
    let (_temp, fs) = setup();
    fs.write_file("/old/f.txt", b"x").unwrap();
    fs.make_dir("/parent").unwrap();
    fs.move_dir("/old", "/parent", true).unwrap();

    assert!(!fs.exists("/old").unwrap());
    assert!(fs.exists("/parent/old/f.txt").unwrap());
}

#[test]
fn test_readonly_overlay_via_adapter() {
    let (_temp, fs) = setup();
    fs.write_file("/locked.txt", b"x").unwrap();

    assert!(!fs.is_readonly("/locked.txt").unwrap());
    fs.set_readonly("/locked.txt", true).unwrap();
    assert!(fs.is_readonly("/locked.txt").unwrap());
    fs.set_readonly("/locked.txt", false).unwrap();
    assert!(!fs.is_readonly("/locked.txt").unwrap());
}

#[test]
fn test_traversal_rejected_before_any_syscall() {
    let (_temp, fs) = setup();
    for op in [
        fs.read_file("/../../etc/passwd", false).err(),
        fs.write_file("/../escape.txt", b"x").err(),
        fs.delete_file("/../../etc/passwd").err(),
        fs.make_dir("/../outside").err(),
        fs.exists("/../..").err(),
    ] {
        assert!(matches!(op, Some(VfsError::PathTraversal(_))));
    }
}

#[test]
fn test_erase_all_idempotent() {
    let (temp, fs) = setup();
    fs.write_file("/data.txt", b"x").unwrap();
    fs.set_readonly("/data.txt", true).unwrap();

    fs.erase_all().unwrap();
    assert!(!temp.path().join("fs").exists());
    assert!(!temp.path().join("fs_readonly_list.json").exists());

    // Safe to call again with nothing left
    fs.erase_all().unwrap();
}

#[test]
fn test_erase_all_before_any_writes() {
    let (_temp, fs) = setup();
    fs.erase_all().unwrap();
}
