use blueprint_doc::{
    BlueprintConfig, Document, OutputLayout, Project, ProjectSnapshot, UnitReport,
};
use blueprint_kernel::MemorySymbolStore;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "blueprint.toml";

pub fn load_config_or_exit(explicit: Option<&Path>) -> BlueprintConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !fallback.exists() {
                return BlueprintConfig::default();
            }
            fallback
        }
    };
    BlueprintConfig::load(&path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn load_project_or_exit(
    path: &Path,
    config: BlueprintConfig,
) -> (Project<MemorySymbolStore>, Vec<UnitReport>) {
    let snapshot = ProjectSnapshot::load(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        std::process::exit(1);
    });
    let (project, reports) = Project::from_snapshot(snapshot, config);
    debug!(
        path = %path.display(),
        units = reports.len(),
        nodes = project.registry().len(),
        "loaded project"
    );
    (project, reports)
}

pub fn or_exit<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Print a document, or write documents under the configured output root.
pub fn emit_or_exit(config: &BlueprintConfig, documents: &[Document], write: bool) {
    if !write {
        for document in documents {
            print!("{}", document.content);
        }
        return;
    }
    let layout = OutputLayout::new(&config.output.root);
    let written = or_exit(layout.write_all(documents));
    for (path, document) in written.iter().zip(documents) {
        println!("wrote {} ({})", path.display(), document.digest());
    }
}
