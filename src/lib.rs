//! # livecode-core
//!
//! The engine behind a browser-based multi-file code editor with a live preview.
//!
//! ## Overview
//!
//! livecode-core keeps a virtual project (a folder tree plus a content store), decides which HTML
//! document the preview should show, and compiles that document into a single self-contained page
//! by inlining the project's stylesheets and scripts. Files arrive through a concurrent ingestion
//! pipeline that accepts flat uploads, directory pickers and dropped directory trees.
//!
//! The editing widget and the preview frame belong to the host; they are reached only through the
//! [`surface`] traits.
//!
//! ### Key Features
//!
//! - **Path algebra**: relative asset references resolve against the HTML file's directory
//! - **Self-contained previews**: `<link>`/`<script src>` tags become inline `<style>`/`<script>`
//!   blocks; anything external or missing is left byte-for-byte
//! - **Preview target selection**: the active HTML file, else the last one viewed, else one near
//!   the active file, else `root/index.html`, else the first HTML file
//! - **Concurrent ingestion**: every read of a batch is in flight at once; progress is published
//!   on a watch channel; failures become diagnostics instead of aborting the batch
//!
//! ## Architecture
//!
//! - **[`paths`]**: reference resolution and path helpers
//! - **[`tree`]**: arena folder/file tree
//! - **[`store`]**: insertion-ordered file contents
//! - **[`tracker`]**: active file, last HTML file, preview target selection
//! - **[`preview`]**: the HTML compiler and placeholder documents
//! - **[`ingest`]**: file/directory handle traits and the ingestion pipeline
//! - **[`project`]**: the owned context tying the above together
//! - **[`session`]**: host glue for editor and render surfaces
//!
//! ## Quick Start
//!
//! ```rust
//! use livecode_core::project::{PreviewOutcome, Project};
//!
//! let mut project = Project::new(); // seeded with root/index.html, style.css, script.js
//! project
//!     .save("root/style.css", "h1 { color: tomato; }")
//!     .unwrap();
//!
//! match project.compile_preview() {
//!     PreviewOutcome::Rendered(compiled) => {
//!         assert_eq!(compiled.entry, "root/index.html");
//!         assert!(compiled.html.contains("/* root/style.css */\nh1 { color: tomato; }"));
//!     }
//!     PreviewOutcome::NoEntry => unreachable!(),
//! }
//! ```
//!
//! ### Ingesting files
//!
//! ```rust
//! use livecode_core::{
//!     ingest::{memory::MemoryFile, IngestionPipeline},
//!     project::Project,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut project = Project::new();
//! let pipeline = IngestionPipeline::new(project.config().text_gate());
//! let files = vec![
//!     MemoryFile::new("index.html", "<h1>hi</h1>").with_relative_path("demo/index.html"),
//!     MemoryFile::new("app.js", "run()").with_relative_path("demo/app.js"),
//! ];
//! let report = pipeline.ingest_files(&mut project, files).await;
//! assert_eq!(report.entry_point.as_deref(), Some("demo/index.html"));
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `bin`: the `livecode` command line tool (`tree`, `preview`)
//! - `wasm`: wasm-bindgen bindings ([`wasm::ProjectWasm`])

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod event;
pub mod ingest;
pub mod language;
pub mod paths;
pub mod preview;
pub mod project;
pub mod session;
pub mod store;
pub mod surface;
#[cfg(test)]
mod tests;
pub mod tracker;
pub mod tree;
#[cfg(feature = "wasm")]
pub mod wasm;
