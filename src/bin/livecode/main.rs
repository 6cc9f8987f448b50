//! livecode CLI tool
//!
//! Loads a directory from disk into a virtual project the same way the browser editor ingests a
//! directory picker selection, then prints its tree or compiles a preview document.
//!
//! ## Commands
//!
//! - `tree <dir>`: Walk the directory lazily, like a dropped folder, and print the project tree
//! - `preview <dir>`: Ingest the directory like a picker selection and compile the entry HTML file
//!   into one self-contained document

use clap::{Parser, Subcommand};
use livecode_core::{
    config::EditorConfig,
    ingest::{
        native::{scan_directory, NativeDirectory},
        IngestReport, IngestionPipeline,
    },
    preview::PreviewCompiler,
    project::Project,
    tree::NodeKind,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "livecode")]
#[command(author, version, about = "Inspect and preview a multi-file web project", long_about = None)]
struct Cli {
    /// Editor configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the project tree of a directory
    Tree {
        /// Directory to load
        dir: PathBuf,
    },

    /// Compile a preview document from a directory
    Preview {
        /// Directory to load
        dir: PathBuf,

        /// HTML file to compile, as a project path (default: `<dir name>/index.html`)
        #[arg(long)]
        entry: Option<String>,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    config.seed_project = false;

    match cli.command {
        Commands::Tree { dir } => {
            let batch_size = config.dir_batch_size;
            let mut project = Project::with_config(config);
            let pipeline = IngestionPipeline::new(project.config().text_gate());
            let root = NativeDirectory::entry(dir.canonicalize()?, batch_size).await?;
            let report = pipeline.ingest_entries(&mut project, vec![root]).await;
            summarize(&dir, &report);

            for entry in project.tree().traverse() {
                let marker = match entry.kind {
                    NodeKind::Folder => "/",
                    NodeKind::File => "",
                };
                println!("{}{}{}", "  ".repeat(entry.depth), entry.name, marker);
            }
            Ok(())
        }

        Commands::Preview { dir, entry, output } => {
            let (mut project, report) = load(&dir, config).await?;
            let Some(entry) = entry.or(report.entry_point) else {
                eprintln!("Error: no index.html under {dir:?}; pass --entry");
                std::process::exit(1);
            };
            if !project.open_file(&entry, None) {
                eprintln!("Error: {entry} is not a file in the project");
                std::process::exit(1);
            }

            let compiled = PreviewCompiler::new(project.store()).compile(&entry)?;
            for reference in &compiled.unresolved {
                eprintln!("Left as-is: {reference}");
            }
            match output {
                Some(path) => {
                    std::fs::write(&path, &compiled.html)?;
                    eprintln!(
                        "✓ Preview of {} written to {} ({} assets inlined)",
                        compiled.entry,
                        path.display(),
                        compiled.inlined.len()
                    );
                }
                None => print!("{}", compiled.html),
            }
            Ok(())
        }
    }
}

async fn load(
    dir: &Path,
    config: EditorConfig,
) -> Result<(Project, IngestReport), Box<dyn std::error::Error>> {
    let files = scan_directory(dir)?;
    let mut project = Project::with_config(config);
    let pipeline = IngestionPipeline::new(project.config().text_gate());
    let report = pipeline.ingest_files(&mut project, files).await;
    summarize(dir, &report);
    Ok((project, report))
}

fn summarize(dir: &Path, report: &IngestReport) {
    for diagnostic in &report.diagnostics {
        eprintln!("{diagnostic}");
    }
    tracing::info!(
        "Loaded {} files from {:?} ({} skipped, {} failed)",
        report.ingested.len(),
        dir,
        report.skipped.len(),
        report.failed.len()
    );
}
