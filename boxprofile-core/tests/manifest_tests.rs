//! Manifest load/parse integration tests and artifact naming cases.

use std::path::PathBuf;

use assert_fs::prelude::*;
use boxprofile_core::{
    manifest::{self, Manifest},
    paths, Artifact, ManifestEntry, ManifestError,
};
use chrono::Utc;
use predicates::prelude::predicate;
use rstest::rstest;

// ---------------------------------------------------------------------------
// 1. Naming
// ---------------------------------------------------------------------------

#[rstest]
#[case("ubuntu-box", "distrobox", "profile", "boxprofile-distrobox-ubuntu-box.profile")]
#[case("arch", "distrobox", "profile", "boxprofile-distrobox-arch.profile")]
#[case("web", "ssh", "desktop", "boxprofile-ssh-web.desktop")]
fn file_names(
    #[case] name: &str,
    #[case] source: &str,
    #[case] suffix: &str,
    #[case] expected: &str,
) {
    let a = Artifact::new(name, source, None, format!("{source} {name}"));
    assert_eq!(a.file_name(suffix), expected);
}

#[rstest]
#[case("profile")]
#[case("desktop")]
fn every_file_name_matches_its_glob(#[case] suffix: &str) {
    let a = Artifact::new("fedora-40", "distrobox", None, "distrobox enter fedora-40");
    let glob = Artifact::file_glob(suffix);
    let (head, tail) = glob.split_once("-*-*").expect("glob shape");
    let name = a.file_name(suffix);
    assert!(name.starts_with(head));
    assert!(name.ends_with(tail));
}

// ---------------------------------------------------------------------------
// 2. Manifest on disk
// ---------------------------------------------------------------------------

#[test]
fn load_reads_written_manifest() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let m = Manifest::new(
        "konsole",
        vec![ManifestEntry {
            name: "ubuntu-box".into(),
            source: "distrobox".into(),
            exec: "distrobox enter ubuntu-box".into(),
            icon: Some(PathBuf::from("/icons/ubuntu.svg")),
        }],
    );
    let text = manifest::render(&m, Utc::now()).expect("render");
    dir.child(paths::MANIFEST_FILE).write_str(&text).expect("write");

    dir.child(paths::MANIFEST_FILE)
        .assert(predicate::str::contains("exec: distrobox enter ubuntu-box"));

    let loaded = manifest::load_at(dir.path()).expect("load").expect("present");
    assert_eq!(loaded, m);
}

#[test]
fn missing_profiles_key_defaults_to_empty() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child(paths::MANIFEST_FILE)
        .write_str("# banner\ntarget: konsole\n")
        .expect("write");
    let loaded = manifest::load_at(dir.path()).expect("load").expect("present");
    assert!(loaded.profiles.is_empty());
}

#[test]
fn wrong_shape_is_a_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child(paths::MANIFEST_FILE)
        .write_str("- this is a list, not a mapping\n")
        .expect("write");
    let err = manifest::load_at(dir.path()).unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }), "got: {err}");
}
