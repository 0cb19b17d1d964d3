mod clear;
mod index;
mod list;
mod resolve;

use clap::{Parser, Subcommand};
use factoscope_api::models::ProjectId;
use factoscope_api::models::naming::portable_path;
use factoscope_core::{CatalogConfig, CatalogRegistry};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "factoscope",
    version,
    about = "Factory method catalogs for container calls",
    long_about = "Factoscope discovers factory method declarations (container `make`/`build` \
                  style calls and their alias tables) in exported source modules, keeps one \
                  catalog per project, and resolves factory calls to the class they construct."
)]
pub struct Cli {
    /// Directory holding the per-project catalogs. Defaults to
    /// $FACTOSCOPE_STATE_DIR or ~/.factoscope/state.
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index exported source modules into a project's catalog
    #[command(
        long_about = "Reads source modules exported as JSON (files, or directories searched \
                            for *.json) and re-indexes the factory declarations they contain."
    )]
    Index {
        /// Project identity (usually its root path)
        #[arg(value_name = "PROJECT")]
        project: String,
        /// Module files or directories
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },
    /// List the signatures of a project
    List {
        #[arg(value_name = "PROJECT")]
        project: String,
        /// Only signatures of this method
        #[arg(long)]
        method: Option<String>,
    },
    /// Resolve a factory call against a project's catalog
    Resolve {
        #[arg(value_name = "PROJECT")]
        project: String,
        /// Receiver class, fully qualified
        #[arg(long)]
        class: String,
        /// Called method
        #[arg(long)]
        method: String,
        /// Call arguments as written
        #[arg(value_name = "ARG")]
        args: Vec<String>,
    },
    /// Forget the signatures declared by one file
    Forget {
        #[arg(value_name = "PROJECT")]
        project: String,
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Record that a file moved
    Rename {
        #[arg(value_name = "PROJECT")]
        project: String,
        #[arg(value_name = "FROM")]
        from: PathBuf,
        #[arg(value_name = "TO")]
        to: PathBuf,
    },
    /// Delete persisted catalogs
    #[command(
        long_about = "Removes persisted catalogs. If a project is given, only that project's \
                            catalog is removed. Otherwise, the whole state directory is cleared."
    )]
    Clear {
        #[arg(value_name = "PROJECT")]
        project: Option<String>,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = factoscope_core::logging::init_logging("cli", false);

    let config = match cli.state_dir {
        Some(dir) => CatalogConfig::new(dir),
        None => CatalogConfig::from_env(),
    };
    let registry = CatalogRegistry::new(config);

    match cli.command {
        Commands::Index { project, paths } => {
            index::run(&registry, &ProjectId::new(project), &paths)
        }
        Commands::List { project, method } => {
            list::run(&registry, &ProjectId::new(project), method.as_deref())
        }
        Commands::Resolve {
            project,
            class,
            method,
            args,
        } => resolve::run(&registry, &ProjectId::new(project), &class, &method, args),
        Commands::Forget { project, path } => {
            let path = portable_path(&path);
            let outcome = registry.get(&ProjectId::new(project)).reset_for_path(&path);
            info!("Forgot {}: {:?}", path, outcome);
            println!("{:?}", outcome);
            Ok(())
        }
        Commands::Rename { project, from, to } => {
            let (from, to) = (portable_path(&from), portable_path(&to));
            let outcome = registry
                .get(&ProjectId::new(project))
                .rename_path(&from, &to);
            info!("Renamed {} -> {}: {:?}", from, to, outcome);
            println!("{:?}", outcome);
            Ok(())
        }
        Commands::Clear { project } => clear::run(&registry, project.map(ProjectId::new)),
    }
}
