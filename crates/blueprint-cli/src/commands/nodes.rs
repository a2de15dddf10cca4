use crate::support::{load_project_or_exit, or_exit};
use blueprint_doc::BlueprintConfig;
use std::path::PathBuf;

pub fn run(config: BlueprintConfig, project: PathBuf) {
    let (project, _) = load_project_or_exit(&project, config);
    let exports = project.export_nodes();
    println!("{}", or_exit(serde_json::to_string_pretty(&exports)));
}
