use factoscope_api::models::ProjectId;
use factoscope_core::CatalogRegistry;
use tracing::info;

pub fn run(
    registry: &CatalogRegistry,
    project: Option<ProjectId>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(project) = project {
        info!("Clearing catalog for project {}...", project);
        registry.get(&project).clear_all();
        registry.release(&project);
        info!("Project catalog cleared.");
    } else {
        info!(
            "Clearing all catalogs at: {}...",
            registry.config().state_dir.display()
        );
        registry.clear_all_projects()?;
        info!("All catalogs cleared.");
    }
    Ok(())
}
