use crate::support::{emit_or_exit, load_project_or_exit, or_exit};
use blueprint_doc::{BlueprintConfig, Format};
use std::path::PathBuf;

pub fn run(
    config: BlueprintConfig,
    project: PathBuf,
    collection: String,
    format: Format,
    write: bool,
) {
    let (project, _) = load_project_or_exit(&project, config);
    let index = or_exit(project.render_collection(&collection, format));
    if !write {
        emit_or_exit(project.config(), &[index], false);
        return;
    }

    // Compute every document before writing any of them.
    let units = or_exit(project.collection_units(&collection));
    let mut documents: Vec<_> = units
        .iter()
        .map(|unit| or_exit(project.render_unit(unit, format)))
        .collect();
    documents.push(index);
    emit_or_exit(project.config(), &documents, true);
}
