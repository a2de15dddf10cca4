use crate::support::{load_project_or_exit, or_exit};
use blueprint_doc::BlueprintConfig;
use serde_json::json;
use std::path::PathBuf;

pub fn run(config: BlueprintConfig, project_path: PathBuf, json_output: bool) {
    let (project, reports) = load_project_or_exit(&project_path, config);
    let failures: usize = reports.iter().map(|r| r.failures.len()).sum();
    let incomplete = project
        .registry()
        .nodes()
        .filter(|node| !node.is_complete())
        .count();

    if json_output {
        let payload = json!({
            "project": project_path.display().to_string(),
            "nodeCount": project.registry().len(),
            "incompleteCount": incomplete,
            "failureCount": failures,
            "units": reports,
        });
        println!("{}", or_exit(serde_json::to_string_pretty(&payload)));
    } else {
        println!("blueprint check");
        println!("  Project: {}", project_path.display());
        println!("  Nodes: {}", project.registry().len());
        println!("  Incomplete: {incomplete}");
        for report in &reports {
            println!(
                "  Unit {}: {} registered, {} failed",
                report.unit,
                report.registered.len(),
                report.failures.len()
            );
            for failure in &report.failures {
                println!("    - {}: {}", failure.name, failure.error);
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
