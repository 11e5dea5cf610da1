/*!
 * Path Sandboxer Tests
 * Property coverage for traversal containment
 */

use proptest::prelude::*;
use std::path::Path;

use vos_host::vfs::{SandboxRoot, VfsError};

proptest! {
    /// For any virtual path, resolution either fails with PathTraversal or
    /// stays inside the sandbox root. Never outside.
    #[test]
    fn prop_resolution_never_escapes(segments in prop::collection::vec("[a-z.]{0,4}|\\.\\.|\\.", 0..8)) {
        let sandbox = SandboxRoot::new("/srv/jail");
        let virtual_path = format!("/{}", segments.join("/"));

        match sandbox.resolve(&virtual_path) {
            Ok(host) => prop_assert!(host.starts_with("/srv/jail")),
            Err(e) => prop_assert!(matches!(e, VfsError::PathTraversal(_))),
        }
    }

    /// Resolutions that succeed round-trip back to a rooted virtual path.
    #[test]
    fn prop_roundtrip(segments in prop::collection::vec("[a-z]{1,4}", 1..6)) {
        let sandbox = SandboxRoot::new("/srv/jail");
        let virtual_path = format!("/{}", segments.join("/"));

        let host = sandbox.resolve(&virtual_path).unwrap();
        prop_assert_eq!(sandbox.to_virtual(&host).unwrap(), virtual_path);
    }
}

#[test]
fn test_known_escape_attempts() {
    let sandbox = SandboxRoot::new("/srv/jail");
    for attempt in [
        "/..",
        "/../",
        "/../../../etc/shadow",
        "/ok/../../etc",
        "\\..\\..\\windows",
    ] {
        assert!(
            matches!(sandbox.resolve(attempt), Err(VfsError::PathTraversal(_))),
            "{attempt} should be rejected"
        );
    }
}

#[test]
fn test_root_is_valid_resolution() {
    let sandbox = SandboxRoot::new("/srv/jail");
    assert_eq!(sandbox.resolve("/").unwrap(), Path::new("/srv/jail"));
}
