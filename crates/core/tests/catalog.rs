//! Tests for the per-project signature catalog

use factoscope_api::models::{FactoryMethodSignature, ProjectId, SignatureKind};
use factoscope_core::{
    Catalog, CatalogConfig, CatalogRegistry, CatalogSnapshot, LoadOutcome, PersistOutcome,
    SnapshotStore,
};
use factoscope_plugin::AlwaysEnrolled;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

fn signature(path: &str, class: &str, method: &str) -> FactoryMethodSignature {
    FactoryMethodSignature::new(path, class, method, 0)
}

fn open(temp: &TempDir) -> Catalog {
    let config = CatalogConfig::new(temp.path());
    let project = ProjectId::from("/ws/app");
    Catalog::new(
        project.clone(),
        SnapshotStore::new(config.snapshot_path(&project)),
        Arc::new(AlwaysEnrolled),
    )
}

fn as_set(signatures: &[FactoryMethodSignature]) -> HashSet<(String, String, String)> {
    signatures
        .iter()
        .map(|s| {
            (
                s.defining_path.clone(),
                s.declaring_class.clone(),
                s.method_name.clone(),
            )
        })
        .collect()
}

#[test]
fn test_added_signatures_survive_reload() {
    let temp = TempDir::new().unwrap();
    let catalog = open(&temp);
    let added = vec![
        signature("/a.php", "App\\Container", "make")
            .with_alias("cache", "App\\ObjectCache")
            .with_fallback("App\\Default"),
        signature("/a.php", "App\\Container", "build"),
        signature("/b.php", "App\\Registry", "service"),
    ];
    for sig in &added {
        assert_eq!(catalog.add(sig.clone()), PersistOutcome::Written);
    }
    assert_eq!(as_set(&catalog.all()), as_set(&added));

    // A fresh catalog over the same directory reads the snapshot back.
    let reopened = open(&temp);
    let loaded = reopened.all();
    assert_eq!(reopened.last_load(), Some(LoadOutcome::Loaded));
    assert_eq!(as_set(&loaded), as_set(&added));
    let make = loaded.iter().find(|s| s.method_name == "make").unwrap();
    assert_eq!(make.aliases.get("cache").map(String::as_str), Some("App\\ObjectCache"));
    assert_eq!(make.fallback_alias, "App\\Default");
    assert_eq!(make.kind, SignatureKind::INSTANCE_METHOD);
}

#[test]
fn test_reset_for_path_only_touches_that_path() {
    let temp = TempDir::new().unwrap();
    let catalog = open(&temp);
    catalog.add(signature("/a.php", "App\\A", "make"));
    catalog.add(signature("/a.php", "App\\A", "build"));
    catalog.add(signature("/b.php", "App\\B", "make"));

    assert_eq!(catalog.reset_for_path("/a.php"), PersistOutcome::Written);
    let remaining = catalog.all();
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|s| s.defining_path != "/a.php"));

    assert_eq!(open(&temp).all().len(), 1);
}

#[test]
fn test_rename_path_relabels_without_loss() {
    let temp = TempDir::new().unwrap();
    let catalog = open(&temp);
    catalog.add(signature("/old.php", "App\\A", "make"));
    catalog.add(signature("/old.php", "App\\A", "build"));
    catalog.add(signature("/other.php", "App\\B", "make"));

    assert_eq!(catalog.rename_path("/old.php", "/new.php"), PersistOutcome::Written);
    let all = catalog.all();
    assert_eq!(all.len(), 3);
    assert_eq!(all.iter().filter(|s| s.defining_path == "/new.php").count(), 2);
    assert!(all.iter().all(|s| s.defining_path != "/old.php"));

    assert_eq!(
        catalog.rename_path("/missing.php", "/elsewhere.php"),
        PersistOutcome::Unchanged
    );
}

#[test]
fn test_corrupt_snapshot_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let catalog = open(&temp);
    std::fs::create_dir_all(catalog.store().path().parent().unwrap()).unwrap();
    std::fs::write(catalog.store().path(), b"\x00garbage").unwrap();

    assert!(catalog.all().is_empty());
    assert_eq!(catalog.last_load(), Some(LoadOutcome::Unreadable));

    // The catalog stays usable and overwrites the broken snapshot.
    assert_eq!(
        catalog.add(signature("/a.php", "App\\A", "make")),
        PersistOutcome::Written
    );
    assert_eq!(open(&temp).all().len(), 1);
}

#[test]
fn test_stale_snapshot_version_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let catalog = open(&temp);
    let mut stale = CatalogSnapshot::new("/ws/app", vec![signature("/a.php", "App\\A", "make")]);
    stale.version += 1;
    catalog.store().save(&stale).unwrap();

    assert!(catalog.all().is_empty());
    assert_eq!(catalog.last_load(), Some(LoadOutcome::Unreadable));
}

#[test]
fn test_missing_snapshot_is_reported() {
    let temp = TempDir::new().unwrap();
    let catalog = open(&temp);
    assert!(catalog.all().is_empty());
    assert_eq!(catalog.last_load(), Some(LoadOutcome::Missing));
}

#[test]
fn test_reset_rereads_persisted_state() {
    let temp = TempDir::new().unwrap();
    let catalog = open(&temp);
    catalog.add(signature("/a.php", "App\\A", "make"));

    // Another writer replaces the snapshot behind this catalog's back.
    let other = open(&temp);
    other.add(signature("/b.php", "App\\B", "make"));
    assert_eq!(catalog.all().len(), 1);

    catalog.reset();
    assert_eq!(catalog.all().len(), 2);
}

#[test]
fn test_clear_all_deletes_persisted_state() {
    let temp = TempDir::new().unwrap();
    let catalog = open(&temp);
    catalog.add(signature("/a.php", "App\\A", "make"));
    let project_dir = catalog.store().path().parent().unwrap().to_path_buf();
    assert!(project_dir.exists());

    assert_eq!(catalog.clear_all(), PersistOutcome::Removed);
    assert!(catalog.all().is_empty());
    assert!(!project_dir.exists());
}

#[test]
fn test_concurrent_adds_lose_nothing() {
    let temp = TempDir::new().unwrap();
    let registry = CatalogRegistry::new(CatalogConfig::new(temp.path()));
    let project = ProjectId::from("/ws/app");

    (0..64).into_par_iter().for_each(|i| {
        let catalog = registry.get(&project);
        catalog.add(signature(&format!("/f{i}.php"), "App\\Container", "make"));
    });

    assert_eq!(registry.get(&project).all().len(), 64);

    registry.release(&project);
    assert_eq!(registry.get(&project).all().len(), 64);
}

#[test]
fn test_concurrent_readers_and_writers() {
    let temp = TempDir::new().unwrap();
    let registry = CatalogRegistry::new(CatalogConfig::new(temp.path()));
    let project = ProjectId::from("/ws/app");

    (0..64).into_par_iter().for_each(|i| {
        let catalog = registry.get(&project);
        if i % 2 == 0 {
            catalog.add(signature(&format!("/f{i}.php"), "App\\Container", "make"));
        } else {
            let _ = catalog.find_by_method_name("make", SignatureKind::INSTANCE_METHOD);
        }
    });

    assert_eq!(registry.get(&project).all().len(), 32);
}
