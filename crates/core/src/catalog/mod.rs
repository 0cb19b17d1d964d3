//! Per-project catalog of factory method signatures.
//!
//! The in-memory set is loaded lazily from the project's snapshot and
//! rewritten in full after every mutation. Storage problems never reach the
//! caller: reads degrade to an empty catalog, writes keep the in-memory state
//! and are reported as a [`PersistOutcome`].

pub mod snapshot;

pub use snapshot::{CatalogSnapshot, SNAPSHOT_VERSION, SnapshotStore};

use factoscope_api::models::{FactoryMethodSignature, ProjectId, SignatureKind};
use factoscope_plugin::EnrollmentProbe;
use std::sync::{Arc, Mutex, MutexGuard};

/// How the last lazy load went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// No snapshot on disk yet.
    Missing,
    /// The snapshot exists but could not be read; the catalog starts empty.
    Unreadable,
}

/// Result of a mutation with respect to persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The set did not change, nothing was written.
    Unchanged,
    Written,
    /// The set became empty and the snapshot was deleted.
    Removed,
    /// The in-memory set changed but could not be persisted.
    Failed,
}

#[derive(Default)]
struct CatalogState {
    /// `None` until loaded, and again after a reset.
    signatures: Option<Arc<Vec<FactoryMethodSignature>>>,
    enrolled: Option<bool>,
    last_load: Option<LoadOutcome>,
    disposed: bool,
}

pub struct Catalog {
    project: ProjectId,
    store: SnapshotStore,
    enrollment: Arc<dyn EnrollmentProbe>,
    state: Mutex<CatalogState>,
}

impl Catalog {
    pub fn new(
        project: ProjectId,
        store: SnapshotStore,
        enrollment: Arc<dyn EnrollmentProbe>,
    ) -> Self {
        Self {
            project,
            store,
            enrollment,
            state: Mutex::new(CatalogState::default()),
        }
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Every signature of the project. Empty for disposed or non-enrolled
    /// catalogs, and when the snapshot cannot be read.
    pub fn all(&self) -> Arc<Vec<FactoryMethodSignature>> {
        let mut state = self.lock();
        if !self.accepts(&mut state) {
            return Arc::new(Vec::new());
        }
        self.loaded(&mut state).clone()
    }

    /// Append one signature and persist the whole set.
    pub fn add(&self, signature: FactoryMethodSignature) -> PersistOutcome {
        if !signature.is_valid() {
            return PersistOutcome::Unchanged;
        }
        let mut state = self.lock();
        if !self.accepts(&mut state) {
            return PersistOutcome::Unchanged;
        }
        let signatures = Arc::make_mut(self.loaded(&mut state));
        signatures.push(signature);
        self.persist(&state)
    }

    /// Drop every signature declared by `path`.
    pub fn reset_for_path(&self, path: &str) -> PersistOutcome {
        let mut state = self.lock();
        if !self.accepts(&mut state) {
            return PersistOutcome::Unchanged;
        }
        let current = self.loaded(&mut state);
        if !current.iter().any(|s| s.defining_path == path) {
            return PersistOutcome::Unchanged;
        }
        Arc::make_mut(current).retain(|s| s.defining_path != path);
        tracing::debug!("Dropped signatures of {} in {}", path, self.project);
        self.persist(&state)
    }

    /// Swap the signatures declared by `path` for `signatures` under a single
    /// lock, so re-scans of one file never interleave. Entries declared by
    /// another path, invalid entries and duplicates are skipped.
    pub fn replace_for_path(
        &self,
        path: &str,
        signatures: Vec<FactoryMethodSignature>,
    ) -> PersistOutcome {
        let mut state = self.lock();
        if !self.accepts(&mut state) {
            return PersistOutcome::Unchanged;
        }
        let current = self.loaded(&mut state);
        let mut next: Vec<FactoryMethodSignature> = current
            .iter()
            .filter(|s| s.defining_path != path)
            .cloned()
            .collect();
        for signature in signatures {
            if signature.is_valid() && signature.defining_path == path && !next.contains(&signature)
            {
                next.push(signature);
            }
        }
        if next == **current {
            return PersistOutcome::Unchanged;
        }
        *current = Arc::new(next);
        tracing::debug!("Replaced signatures of {} in {}", path, self.project);
        self.persist(&state)
    }

    /// Relabel signatures declared by `old_path` as declared by `new_path`.
    pub fn rename_path(&self, old_path: &str, new_path: &str) -> PersistOutcome {
        if old_path == new_path || new_path.is_empty() {
            return PersistOutcome::Unchanged;
        }
        let mut state = self.lock();
        if !self.accepts(&mut state) {
            return PersistOutcome::Unchanged;
        }
        let current = self.loaded(&mut state);
        if !current.iter().any(|s| s.defining_path == old_path) {
            return PersistOutcome::Unchanged;
        }
        for signature in Arc::make_mut(current).iter_mut() {
            if signature.defining_path == old_path {
                signature.defining_path = new_path.to_string();
            }
        }
        self.persist(&state)
    }

    /// Signatures for a method name (case-insensitive) whose kind intersects
    /// `kind_mask`.
    pub fn find_by_method_name(
        &self,
        name: &str,
        kind_mask: SignatureKind,
    ) -> Vec<FactoryMethodSignature> {
        self.all()
            .iter()
            .filter(|s| s.matches_method(name) && s.kind.intersects(kind_mask))
            .cloned()
            .collect()
    }

    pub fn has_method(&self, name: &str, kind_mask: SignatureKind) -> bool {
        self.all()
            .iter()
            .any(|s| s.matches_method(name) && s.kind.intersects(kind_mask))
    }

    /// Forget everything and delete the project's persisted state. A
    /// disposed catalog leaves the disk alone.
    pub fn clear_all(&self) -> PersistOutcome {
        let mut state = self.lock();
        if state.disposed {
            return PersistOutcome::Unchanged;
        }
        state.signatures = Some(Arc::new(Vec::new()));
        state.last_load = None;
        match self.store.remove_dir() {
            Ok(()) => PersistOutcome::Removed,
            Err(e) => {
                tracing::warn!(
                    "Failed to delete catalog state at {}: {}",
                    self.store.path().display(),
                    e
                );
                PersistOutcome::Failed
            }
        }
    }

    /// Drop the memory cache and the enrollment answer; both are re-read
    /// lazily.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.signatures = None;
        state.enrolled = None;
        state.last_load = None;
        tracing::debug!("Reset catalog of {}", self.project);
    }

    /// Detach this catalog: it reads as empty and ignores mutations from now
    /// on. Persisted state is left alone.
    pub fn dispose(&self) {
        let mut state = self.lock();
        state.disposed = true;
        state.signatures = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    pub fn is_enrolled(&self) -> bool {
        let mut state = self.lock();
        self.enrolled(&mut state)
    }

    /// Outcome of the most recent lazy load, if one happened since the last
    /// reset.
    pub fn last_load(&self) -> Option<LoadOutcome> {
        self.lock().last_load
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enrolled(&self, state: &mut CatalogState) -> bool {
        *state
            .enrolled
            .get_or_insert_with(|| self.enrollment.is_enrolled(&self.project))
    }

    fn accepts(&self, state: &mut CatalogState) -> bool {
        !state.disposed && self.enrolled(state)
    }

    fn loaded<'a>(&self, state: &'a mut CatalogState) -> &'a mut Arc<Vec<FactoryMethodSignature>> {
        if state.signatures.is_none() {
            let (signatures, outcome) = self.load();
            state.last_load = Some(outcome);
            state.signatures = Some(Arc::new(signatures));
        }
        state.signatures.get_or_insert_with(Default::default)
    }

    fn load(&self) -> (Vec<FactoryMethodSignature>, LoadOutcome) {
        match self.store.load() {
            Ok(Some(snapshot)) => {
                let signatures: Vec<_> = snapshot
                    .signatures
                    .into_iter()
                    .filter(FactoryMethodSignature::is_valid)
                    .collect();
                tracing::debug!(
                    "Loaded {} signatures for {} from {}",
                    signatures.len(),
                    self.project,
                    self.store.path().display()
                );
                (signatures, LoadOutcome::Loaded)
            }
            Ok(None) => (Vec::new(), LoadOutcome::Missing),
            Err(e) => {
                tracing::warn!(
                    "Failed to read catalog at {}: {}. Starting empty.",
                    self.store.path().display(),
                    e
                );
                (Vec::new(), LoadOutcome::Unreadable)
            }
        }
    }

    fn persist(&self, state: &CatalogState) -> PersistOutcome {
        let signatures = state.signatures.as_deref().map(Vec::as_slice).unwrap_or(&[]);
        if signatures.is_empty() {
            return match self.store.remove() {
                Ok(()) => PersistOutcome::Removed,
                Err(e) => {
                    tracing::warn!(
                        "Failed to delete empty catalog at {}: {}",
                        self.store.path().display(),
                        e
                    );
                    PersistOutcome::Failed
                }
            };
        }

        let snapshot = CatalogSnapshot::new(self.project.as_str(), signatures.to_vec());
        match self.store.save(&snapshot) {
            Ok(()) => PersistOutcome::Written,
            Err(e) => {
                tracing::warn!(
                    "Failed to persist catalog at {}: {}",
                    self.store.path().display(),
                    e
                );
                PersistOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("project", &self.project)
            .field("store", &self.store.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factoscope_plugin::AlwaysEnrolled;
    use tempfile::tempdir;

    struct NeverEnrolled;

    impl EnrollmentProbe for NeverEnrolled {
        fn is_enrolled(&self, _project: &ProjectId) -> bool {
            false
        }
    }

    fn catalog_at(dir: &std::path::Path, probe: Arc<dyn EnrollmentProbe>) -> Catalog {
        Catalog::new(
            ProjectId::from("/ws/app"),
            SnapshotStore::new(dir.join("factory_methods.bin")),
            probe,
        )
    }

    fn make(path: &str) -> FactoryMethodSignature {
        FactoryMethodSignature::new(path, "App\\Container", "make", 0)
    }

    #[test]
    fn test_reset_for_unknown_path_writes_nothing() {
        let dir = tempdir().unwrap();
        let catalog = catalog_at(dir.path(), Arc::new(AlwaysEnrolled));
        assert_eq!(catalog.add(make("/a.php")), PersistOutcome::Written);
        assert_eq!(catalog.reset_for_path("/b.php"), PersistOutcome::Unchanged);
        assert_eq!(catalog.reset_for_path("/a.php"), PersistOutcome::Removed);
        assert!(!catalog.store().exists());
    }

    #[test]
    fn test_invalid_signature_is_ignored() {
        let dir = tempdir().unwrap();
        let catalog = catalog_at(dir.path(), Arc::new(AlwaysEnrolled));
        assert_eq!(catalog.add(make("")), PersistOutcome::Unchanged);
        assert!(catalog.all().is_empty());
    }

    #[test]
    fn test_not_enrolled_reads_empty_and_ignores_adds() {
        let dir = tempdir().unwrap();
        let catalog = catalog_at(dir.path(), Arc::new(NeverEnrolled));
        assert!(!catalog.is_enrolled());
        assert_eq!(catalog.add(make("/a.php")), PersistOutcome::Unchanged);
        assert!(catalog.all().is_empty());
        assert!(!catalog.store().exists());
    }

    #[test]
    fn test_disposed_catalog_reads_empty() {
        let dir = tempdir().unwrap();
        let catalog = catalog_at(dir.path(), Arc::new(AlwaysEnrolled));
        catalog.add(make("/a.php"));
        catalog.dispose();

        assert!(catalog.is_disposed());
        assert!(catalog.all().is_empty());
        assert_eq!(catalog.add(make("/b.php")), PersistOutcome::Unchanged);
        // Persisted state survives disposal.
        assert!(catalog.store().exists());
    }

    #[test]
    fn test_disposed_catalog_clear_keeps_disk() {
        let dir = tempdir().unwrap();
        let catalog = catalog_at(dir.path(), Arc::new(AlwaysEnrolled));
        catalog.add(make("/a.php"));
        catalog.dispose();

        assert_eq!(catalog.clear_all(), PersistOutcome::Unchanged);
        assert!(catalog.store().exists());
    }

    #[test]
    fn test_replace_for_path_swaps_one_file() {
        let dir = tempdir().unwrap();
        let catalog = catalog_at(dir.path(), Arc::new(AlwaysEnrolled));
        catalog.add(make("/a.php"));
        catalog.add(make("/b.php"));

        let replacement = make("/a.php").with_alias("cache", "App\\ObjectCache");
        assert_eq!(
            catalog.replace_for_path("/a.php", vec![replacement.clone(), replacement.clone()]),
            PersistOutcome::Written
        );
        assert_eq!(
            catalog.replace_for_path("/a.php", vec![replacement.clone()]),
            PersistOutcome::Unchanged
        );

        let all = catalog.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|s| **s == replacement).count(), 1);
        assert!(all.iter().any(|s| s.defining_path == "/b.php"));
    }

    #[test]
    fn test_replace_for_path_skips_foreign_entries() {
        let dir = tempdir().unwrap();
        let catalog = catalog_at(dir.path(), Arc::new(AlwaysEnrolled));
        catalog.add(make("/a.php"));

        assert_eq!(
            catalog.replace_for_path("/a.php", vec![make("/other.php")]),
            PersistOutcome::Removed
        );
        assert!(catalog.all().is_empty());
    }

    #[test]
    fn test_find_filters_by_kind_mask() {
        let dir = tempdir().unwrap();
        let catalog = catalog_at(dir.path(), Arc::new(AlwaysEnrolled));
        catalog.add(make("/a.php"));

        assert_eq!(
            catalog
                .find_by_method_name("MAKE", SignatureKind::INSTANCE_METHOD)
                .len(),
            1
        );
        assert!(
            catalog
                .find_by_method_name("make", SignatureKind::empty())
                .is_empty()
        );
        assert!(
            catalog
                .find_by_method_name("build", SignatureKind::all())
                .is_empty()
        );
    }
}
