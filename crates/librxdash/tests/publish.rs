//! Publishing into a fake Dash-User-Contributions checkout.
#![allow(clippy::tests_outside_test_module)]

mod utils;

use std::{fs, path::PathBuf};

use librxdash::{Catalog, DocsetBuilder, Publisher, RxdashError, VersionEntry};
use pretty_assertions::assert_eq;
use serde_json::json;
use utils::{Fixture, write_file};

/// Fixture with a stand-in docset, a catalog template, and an empty destination.
fn publish_fixture() -> (Fixture, PathBuf) {
    let f = Fixture::new();
    f.navigation(json!([]), "7.8.1");
    write_file(&f.work().join("RxJS.docset/Contents/Info.plist"), "plist");
    write_file(&f.work().join("templates/icon.png"), "icon");
    write_file(
        &f.work().join("templates/docset.json"),
        &serde_json::to_string_pretty(&json!({
            "name": "RxJS",
            "author": { "name": "Template Author", "link": "https://example.com" },
            "aliases": ["rx"],
            "version": "x.y.z",
            "specific_versions": []
        }))
        .unwrap(),
    );
    let dest = f.dir.path().join("contrib/docsets/RxJS");
    fs::create_dir_all(&dest).unwrap();
    (f, dest)
}

fn seed_catalog(dest: &std::path::Path, current: &str, versions: &[&str]) {
    let catalog = Catalog {
        name: "RxJS".into(),
        version: current.into(),
        specific_versions: versions
            .iter()
            .map(|v| VersionEntry::for_product("RxJS", v))
            .collect(),
        ..Catalog::default()
    };
    catalog.save(&dest.join("docset.json")).unwrap();
    for version in versions {
        write_file(&dest.join(format!("versions/{version}/RxJS.tgz")), "old");
    }
}

fn versions_of(catalog: &Catalog) -> Vec<&str> {
    catalog
        .specific_versions
        .iter()
        .map(|entry| entry.version.as_str())
        .collect()
}

#[test]
fn first_publish_starts_from_template() {
    let (f, dest) = publish_fixture();
    let report = Publisher::new(f.rxjs(), f.work(), &dest).publish().unwrap();

    assert_eq!(report.version, "7.8.1");
    assert!(report.current);
    assert!(report.pruned.is_empty());
    assert!(dest.join("versions/7.8.1/RxJS.tgz").is_file());
    assert!(dest.join("RxJS.tgz").is_file());
    assert!(dest.join("icon.png").is_file());

    let saved = Catalog::load(&dest.join("docset.json")).unwrap();
    assert_eq!(saved.version, "7.8.1");
    assert_eq!(versions_of(&saved), vec!["7.8.1"]);
    assert_eq!(saved.specific_versions[0].archive, "versions/7.8.1/RxJS.tgz");
    assert_eq!(saved.author.name, "Template Author");
    assert_eq!(saved.extra.get("aliases"), Some(&json!(["rx"])));
}

#[test]
fn patch_release_replaces_its_minor_line() {
    let (f, dest) = publish_fixture();
    seed_catalog(&dest, "6.5.2", &["6.5.2", "6.4.0"]);

    let report = Publisher::new(f.rxjs(), f.work(), &dest)
        .with_version(Some("6.5.3".into()))
        .publish()
        .unwrap();

    assert!(report.current);
    assert_eq!(versions_of(&report.catalog), vec!["6.5.3", "6.4.0"]);
    assert_eq!(report.pruned.iter().map(String::as_str).collect::<Vec<_>>(), vec!["6.5.2"]);
    assert!(!dest.join("versions/6.5.2").exists());
    assert!(dest.join("versions/6.4.0/RxJS.tgz").is_file());
    assert!(dest.join("versions/6.5.3/RxJS.tgz").is_file());
    assert_eq!(Catalog::load(&dest.join("docset.json")).unwrap(), report.catalog);
}

#[test]
fn older_line_is_not_current() {
    let (f, dest) = publish_fixture();
    seed_catalog(&dest, "6.5.2", &["6.5.2"]);

    let report = Publisher::new(f.rxjs(), f.work(), &dest)
        .with_version(Some("6.4.1".into()))
        .publish()
        .unwrap();

    assert!(!report.current);
    assert_eq!(report.catalog.version, "6.5.2");
    assert_eq!(versions_of(&report.catalog), vec!["6.5.2", "6.4.1"]);
    assert!(dest.join("versions/6.4.1/RxJS.tgz").is_file());
    assert!(!dest.join("RxJS.tgz").exists());
}

#[test]
fn older_patch_on_current_line_is_rejected() {
    let (f, dest) = publish_fixture();
    seed_catalog(&dest, "6.5.3", &["6.5.3"]);
    let before = fs::read_to_string(dest.join("docset.json")).unwrap();

    let err = Publisher::new(f.rxjs(), f.work(), &dest)
        .with_version(Some("6.5.2".into()))
        .publish()
        .unwrap_err();
    assert!(matches!(
        err,
        RxdashError::StaleVersion { ref version, ref published }
            if version == "6.5.2" && published == "6.5.3"
    ));
    assert!(dest.join("versions/6.5.3/RxJS.tgz").is_file());
    assert!(!dest.join("versions/6.5.2").exists());
    assert_eq!(fs::read_to_string(dest.join("docset.json")).unwrap(), before);
}

#[test]
fn failed_catalog_write_places_no_archives() {
    let (f, dest) = publish_fixture();
    // A directory where the catalog belongs makes the final rename fail.
    fs::create_dir_all(dest.join("docset.json")).unwrap();

    Publisher::new(f.rxjs(), f.work(), &dest).publish().unwrap_err();
    assert!(!dest.join("RxJS.tgz").exists());
    assert!(!dest.join("versions/7.8.1").exists());
    let leftovers: Vec<_> = fs::read_dir(&dest)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[cfg(unix)]
#[test]
fn published_files_are_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let (f, dest) = publish_fixture();
    Publisher::new(f.rxjs(), f.work(), &dest).publish().unwrap();
    for path in ["docset.json", "RxJS.tgz", "versions/7.8.1/RxJS.tgz"] {
        let mode = fs::metadata(dest.join(path)).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644, "{path}");
    }
}

#[test]
fn stray_version_folders_are_pruned() {
    let (f, dest) = publish_fixture();
    seed_catalog(&dest, "7.8.0", &["7.8.0"]);
    fs::create_dir_all(dest.join("versions/5.0.0")).unwrap();

    let report = Publisher::new(f.rxjs(), f.work(), &dest).publish().unwrap();
    assert_eq!(
        report.pruned.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["5.0.0", "7.8.0"]
    );
    let left: Vec<_> = fs::read_dir(dest.join("versions"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(left, vec!["7.8.1".to_string()]);
}

#[test]
fn author_overrides_are_written() {
    let (f, dest) = publish_fixture();
    let report = Publisher::new(f.rxjs(), f.work(), &dest)
        .with_author(Some("Someone".into()), None)
        .publish()
        .unwrap();
    assert_eq!(report.catalog.author.name, "Someone");
    assert_eq!(report.catalog.author.link, "https://example.com");
}

#[test]
fn missing_catalog_and_template() {
    let (f, dest) = publish_fixture();
    fs::remove_file(f.work().join("templates/docset.json")).unwrap();
    let err = Publisher::new(f.rxjs(), f.work(), &dest).publish().unwrap_err();
    assert!(matches!(err, RxdashError::MissingCatalog { .. }));
    assert!(!dest.join("versions").exists());
}

#[test]
fn missing_docset_or_destination() {
    let (f, dest) = publish_fixture();
    let err = Publisher::new(f.rxjs(), f.work(), f.dir.path().join("nowhere"))
        .publish()
        .unwrap_err();
    assert!(matches!(err, RxdashError::DestinationNotFound(_)));

    fs::remove_dir_all(f.work().join("RxJS.docset")).unwrap();
    let err = Publisher::new(f.rxjs(), f.work(), &dest).publish().unwrap_err();
    assert!(matches!(err, RxdashError::DocsetNotFound(ref p) if p.ends_with("RxJS.docset")));
}

#[test]
fn malformed_version_touches_nothing() {
    let (f, dest) = publish_fixture();
    let err = Publisher::new(f.rxjs(), f.work(), &dest)
        .with_version(Some("7.0.0-rc.1".into()))
        .publish()
        .unwrap_err();
    assert!(matches!(err, RxdashError::MalformedVersion(ref v) if v == "7.0.0-rc.1"));
    assert!(!dest.join("docset.json").exists());
}

#[test]
fn build_then_publish() {
    let f = Fixture::standard();
    write_file(
        &f.work().join("templates/docset.json"),
        r#"{ "name": "RxJS", "author": { "name": "a", "link": "b" } }"#,
    );
    DocsetBuilder::new(f.rxjs(), f.work()).build().unwrap();

    let dest = f.dir.path().join("dest");
    fs::create_dir_all(&dest).unwrap();
    let report = Publisher::new(f.rxjs(), f.work(), &dest).publish().unwrap();
    assert_eq!(report.version, "7.8.1");
    assert!(dest.join("versions/7.8.1/RxJS.tgz").is_file());
    assert!(f.work().join("RxJS.tgz").is_file());
}
