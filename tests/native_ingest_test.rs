//! Integration tests for ingesting a directory from disk and previewing it.
//!
//! Both native source shapes are exercised: the directory-picker shape (`scan_directory`, a flat
//! list with relative paths) and the dropped-entry shape (`NativeDirectory`, walked lazily).

mod common;

use common::{create_test_site, init_logging};
use livecode_core::{
    config::EditorConfig,
    ingest::native::{scan_directory, NativeDirectory},
    ingest::IngestionPipeline,
    preview::PreviewCompiler,
    project::{PreviewOutcome, Project},
    tree::NodeKind,
};
use tempfile::TempDir;
use test_log::test;

fn empty_project() -> Project {
    Project::with_config(EditorConfig {
        seed_project: false,
        ..Default::default()
    })
}

#[test(tokio::test)]
async fn test_directory_picker_shape() {
    init_logging();
    let temp_dir = TempDir::new().unwrap();
    let site = create_test_site(&temp_dir);
    let files = scan_directory(&site).unwrap();
    assert_eq!(files.len(), 5);

    let mut project = empty_project();
    let pipeline = IngestionPipeline::new(project.config().text_gate());
    let progress = pipeline.subscribe();
    let report = pipeline.ingest_files(&mut project, files).await;

    assert_eq!(report.progress.processed, 5);
    assert_eq!(*progress.borrow(), report.progress);
    assert_eq!(report.skipped, vec!["site/logo.bin"]);
    assert_eq!(report.ingested.len(), 4);
    assert_eq!(report.entry_point.as_deref(), Some("site/index.html"));

    // reads complete in any order, so insertion order is not fixed
    let mut folders: Vec<_> = project
        .tree()
        .traverse()
        .into_iter()
        .filter(|e| e.kind == NodeKind::Folder)
        .map(|e| e.path)
        .collect();
    folders.sort();
    assert_eq!(folders, vec!["site", "site/css", "site/js", "site/pages"]);
}

#[test(tokio::test)]
async fn test_dropped_directory_shape() {
    let temp_dir = TempDir::new().unwrap();
    let site = create_test_site(&temp_dir);
    let entry = NativeDirectory::entry(site, 2).await.unwrap();

    let mut project = empty_project();
    let pipeline = IngestionPipeline::default();
    let report = pipeline.ingest_entries(&mut project, vec![entry]).await;

    assert_eq!(report.progress.total, 5);
    assert!(report.failed.is_empty());
    assert_eq!(project.store().len(), 4);
    assert!(project.tree().contains_file("site/pages/about.html"));
    assert_eq!(report.entry_point.as_deref(), Some("site/index.html"));
}

#[test(tokio::test)]
async fn test_ingested_site_previews() {
    let temp_dir = TempDir::new().unwrap();
    let site = create_test_site(&temp_dir);
    let mut project = empty_project();
    let report = IngestionPipeline::default()
        .ingest_files(&mut project, scan_directory(&site).unwrap())
        .await;
    let entry = report.entry_point.unwrap();
    assert!(project.open_file(&entry, None));

    let PreviewOutcome::Rendered(compiled) = project.compile_preview() else {
        panic!("expected a preview");
    };
    assert_eq!(compiled.entry, "site/index.html");
    assert_eq!(compiled.inlined, vec!["site/css/main.css", "site/js/app.js"]);
    assert_eq!(compiled.unresolved, vec!["https://cdn.example.com/reset.css"]);
    assert!(compiled.html.contains("h1 { color: red; }"));
    assert!(compiled
        .html
        .contains("<link rel=\"stylesheet\" href=\"https://cdn.example.com/reset.css\">"));

    let about = PreviewCompiler::new(project.store())
        .compile("site/pages/about.html")
        .unwrap();
    assert_eq!(about.inlined, vec!["site/css/main.css"]);
}

#[test]
fn test_scan_missing_directory() {
    assert!(scan_directory("/definitely/not/a/dir").is_err());
}
