use crate::support::{emit_or_exit, load_project_or_exit, or_exit};
use blueprint_doc::{BlueprintConfig, Format};
use std::path::PathBuf;

pub fn run(config: BlueprintConfig, project: PathBuf, unit: String, format: Format, write: bool) {
    let (project, _) = load_project_or_exit(&project, config);
    let document = or_exit(project.render_unit(&unit, format));
    emit_or_exit(project.config(), &[document], write);
}
