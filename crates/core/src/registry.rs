//! Process-wide table of live catalogs, one per project.

use crate::catalog::{Catalog, SnapshotStore};
use crate::config::CatalogConfig;
use dashmap::DashMap;
use factoscope_api::ProjectEvent;
use factoscope_api::models::ProjectId;
use factoscope_plugin::{AlwaysEnrolled, EnrollmentProbe};
use once_cell::sync::Lazy;
use std::sync::{Arc, Weak};

static GLOBAL_REGISTRY: Lazy<Arc<CatalogRegistry>> =
    Lazy::new(|| Arc::new(CatalogRegistry::new(CatalogConfig::from_env())));

/// The registry shared by everything in this process.
pub fn global_registry() -> Arc<CatalogRegistry> {
    GLOBAL_REGISTRY.clone()
}

pub struct CatalogRegistry {
    config: CatalogConfig,
    enrollment: Arc<dyn EnrollmentProbe>,
    catalogs: DashMap<ProjectId, Arc<Catalog>>,
}

impl CatalogRegistry {
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_enrollment(config, Arc::new(AlwaysEnrolled))
    }

    pub fn with_enrollment(config: CatalogConfig, enrollment: Arc<dyn EnrollmentProbe>) -> Self {
        Self {
            config,
            enrollment,
            catalogs: DashMap::new(),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The catalog of `project`, created on first access.
    pub fn get(&self, project: &ProjectId) -> Arc<Catalog> {
        if let Some(existing) = self.catalogs.get(project) {
            return existing.clone();
        }
        self.catalogs
            .entry(project.clone())
            .or_insert_with(|| {
                tracing::debug!("Creating catalog for {}", project);
                Arc::new(Catalog::new(
                    project.clone(),
                    SnapshotStore::new(self.config.snapshot_path(project)),
                    self.enrollment.clone(),
                ))
            })
            .clone()
    }

    /// A non-owning handle, for evaluators that may outlive the project.
    pub fn get_weak(&self, project: &ProjectId) -> Weak<Catalog> {
        Arc::downgrade(&self.get(project))
    }

    /// The catalog of `project` if one is live.
    pub fn peek(&self, project: &ProjectId) -> Option<Arc<Catalog>> {
        self.catalogs.get(project).map(|entry| entry.clone())
    }

    /// Drop and dispose the catalog of `project`. Persisted state is kept.
    pub fn release(&self, project: &ProjectId) {
        if let Some((_, catalog)) = self.catalogs.remove(project) {
            catalog.dispose();
            tracing::debug!("Released catalog of {}", project);
        }
    }

    /// Dispose the catalog of `project` first, then delete its persisted
    /// state, so a mutation still in flight cannot write the snapshot back.
    fn forget(&self, project: &ProjectId) {
        self.release(project);
        let store = SnapshotStore::new(self.config.snapshot_path(project));
        if let Err(e) = store.remove_dir() {
            tracing::warn!(
                "Failed to delete catalog state of {} at {}: {}",
                project,
                store.path().display(),
                e
            );
        }
    }

    /// Reset the live catalog of `project`, if any.
    pub fn notify_config_changed(&self, project: &ProjectId) {
        if let Some(catalog) = self.peek(project) {
            catalog.reset();
        }
    }

    pub fn live_projects(&self) -> Vec<ProjectId> {
        self.catalogs.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Route one lifecycle notification.
    pub fn dispatch(&self, event: &ProjectEvent) {
        tracing::debug!("Lifecycle event {:?}", event);
        match event {
            ProjectEvent::Opened { project } => {
                self.get(project);
            }
            ProjectEvent::Closed { project } => self.release(project),
            ProjectEvent::Deleted { project } => self.forget(project),
            ProjectEvent::DescriptionChanged { project } => self.notify_config_changed(project),
            ProjectEvent::FileRemoved { project, path } => {
                self.get(project).reset_for_path(path);
            }
            ProjectEvent::FileMoved { project, from, to } => {
                if from != to {
                    self.get(project).rename_path(from, to);
                }
            }
        }
    }

    /// Delete the persisted state of every project and drop every live
    /// catalog.
    pub fn clear_all_projects(&self) -> crate::error::Result<()> {
        for project in self.live_projects() {
            self.release(&project);
        }
        match std::fs::remove_dir_all(&self.config.state_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
