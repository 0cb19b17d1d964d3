use factoscope_api::ast::SourceModule;
use factoscope_api::models::ProjectId;
use factoscope_core::CatalogRegistry;
use factoscope_php::SignatureExtractor;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

const MODULE_EXTENSION: &str = "json";

pub fn run(
    registry: &CatalogRegistry,
    project: &ProjectId,
    paths: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    let files = collect_module_files(paths);
    info!("Indexing {} modules into {}...", files.len(), project);

    let catalog = registry.get(project);
    let enrolled = catalog.is_enrolled();
    let extractor = SignatureExtractor::new(registry);

    let added: usize = files
        .par_iter()
        .filter_map(|file| read_module(file))
        .map(|module| extractor.index_module(project, &module, enrolled))
        .sum();

    info!("Indexing complete!");
    println!(
        "{} modules read, {} signatures indexed, {} in catalog",
        files.len(),
        added,
        catalog.all().len()
    );
    Ok(())
}

/// Module files named by `paths`, each listed once even when inputs overlap.
fn collect_module_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(canonical(path));
            continue;
        }
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let candidate = entry.path();
            if entry.file_type().is_file()
                && candidate.extension().and_then(|e| e.to_str()) == Some(MODULE_EXTENSION)
            {
                files.push(canonical(candidate));
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn read_module(file: &Path) -> Option<SourceModule> {
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read {}: {}", file.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(module) => Some(module),
        Err(e) => {
            warn!("Skipping {}: not a source module ({})", file.display(), e);
            None
        }
    }
}
