//! End-to-end passes against a temporary home with the Konsole target.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use boxprofile_core::{manifest, paths, Artifact};
use boxprofile_source::{Source, SourceError};
use boxprofile_sync::{run, KonsoleTarget, Target, TargetOutcome, WriteResult};
use tempfile::TempDir;

struct ListedSource(Vec<Artifact>);

impl ListedSource {
    fn of(names: &[&str]) -> Self {
        Self(
            names
                .iter()
                .map(|n| Artifact::new(*n, "distrobox", None, format!("distrobox enter {n}")))
                .collect(),
        )
    }
}

impl Source for ListedSource {
    fn name(&self) -> &'static str {
        "distrobox"
    }

    fn check_dependencies(&self) -> Result<(), SourceError> {
        Ok(())
    }

    fn enumerate(&self) -> Result<Vec<Artifact>, SourceError> {
        Ok(self.0.clone())
    }
}

fn konsole(home: &Path) -> Vec<Box<dyn Target>> {
    // `sh` stands in for the konsole binary so the dependency check passes.
    vec![Box::new(KonsoleTarget::at(home).unwrap().with_program("sh"))]
}

fn profile_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn setup() -> TempDir {
    let home = TempDir::new().unwrap();
    let dir = paths::konsole_profiles_dir(home.path());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Dark.profile"), "[General]\nName=Dark\n").unwrap();
    home
}

#[test]
fn profiles_follow_container_set() {
    let home = setup();
    let dir = paths::konsole_profiles_dir(home.path());
    let targets = konsole(home.path());

    run(&ListedSource::of(&["arch", "ubuntu-box"]), &targets, false).unwrap();
    assert_eq!(
        profile_names(&dir),
        BTreeSet::from([
            "Dark.profile".to_string(),
            "boxprofile-distrobox-arch.profile".to_string(),
            "boxprofile-distrobox-ubuntu-box.profile".to_string(),
            "boxprofile-manifest.yaml".to_string(),
        ])
    );

    run(&ListedSource::of(&["ubuntu-box"]), &targets, false).unwrap();
    assert_eq!(
        profile_names(&dir),
        BTreeSet::from([
            "Dark.profile".to_string(),
            "boxprofile-distrobox-ubuntu-box.profile".to_string(),
            "boxprofile-manifest.yaml".to_string(),
        ])
    );
    assert_eq!(
        fs::read_to_string(dir.join("Dark.profile")).unwrap(),
        "[General]\nName=Dark\n"
    );

    let doc = manifest::load_at(&dir).unwrap().expect("manifest present");
    assert_eq!(doc.target, "konsole");
    assert_eq!(doc.profiles.len(), 1);
    assert_eq!(doc.profiles[0].name, "ubuntu-box");
}

#[test]
fn repeated_pass_is_idempotent() {
    let home = setup();
    let dir = paths::konsole_profiles_dir(home.path());
    let targets = konsole(home.path());
    let source = ListedSource::of(&["arch"]);

    run(&source, &targets, false).unwrap();
    let profile = dir.join("boxprofile-distrobox-arch.profile");
    let first = fs::read_to_string(&profile).unwrap();

    let outcomes = run(&source, &targets, false).unwrap();
    let TargetOutcome::Synced(report) = &outcomes[0] else {
        panic!("konsole should be synced: {outcomes:?}");
    };
    assert!(matches!(report.manifest, WriteResult::Unchanged { .. }));
    assert!(report.reconcile.deleted.is_empty());
    assert_eq!(fs::read_to_string(&profile).unwrap(), first);
}

#[test]
fn generated_profile_has_konsole_layout() {
    let home = setup();
    let rc = paths::konsolerc_path(home.path());
    fs::create_dir_all(rc.parent().unwrap()).unwrap();
    fs::write(&rc, "[Desktop Entry]\nDefaultProfile=Dark.profile\n").unwrap();

    run(&ListedSource::of(&["arch"]), &konsole(home.path()), false).unwrap();

    let dir = paths::konsole_profiles_dir(home.path());
    let text = fs::read_to_string(dir.join("boxprofile-distrobox-arch.profile")).unwrap();
    assert_eq!(
        text,
        format!(
            "[General]\nCommand=distrobox enter arch\nName=distrobox – arch\nParent={}\n",
            dir.join("Dark.profile").display()
        )
    );
}

#[test]
fn empty_source_removes_every_generated_profile() {
    let home = setup();
    let dir = paths::konsole_profiles_dir(home.path());
    let targets = konsole(home.path());

    run(&ListedSource::of(&["a", "b"]), &targets, false).unwrap();
    run(&ListedSource::of(&[]), &targets, false).unwrap();

    assert_eq!(
        profile_names(&dir),
        BTreeSet::from(["Dark.profile".to_string(), "boxprofile-manifest.yaml".to_string()])
    );
}
