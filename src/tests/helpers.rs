//! Shared test utilities

use crate::{config::EditorConfig, project::Project};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A project without the starter files.
pub fn empty_project() -> Project {
    Project::with_config(EditorConfig {
        seed_project: false,
        ..Default::default()
    })
}

/// A project holding `files` (path, content) in the given order and nothing else.
pub fn project_with(files: &[(&str, &str)]) -> Project {
    init_logging();
    let mut project = empty_project();
    for (path, content) in files {
        project
            .create_file(path, *content)
            .expect("test paths are valid");
    }
    project
}
