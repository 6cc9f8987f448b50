//! Turning an HTML entry file into a self-contained document for the rendering surface.
//!
//! [`compiler`] inlines project stylesheets and scripts; [`documents`] holds the placeholder
//! documents shown when there is nothing to compile.

pub mod compiler;
pub mod documents;

pub use compiler::{CompiledPreview, PreviewCompiler, RELOAD_GUARD};
pub use documents::{error_document, html_escape, no_preview_document, paused_document, preview_title};
