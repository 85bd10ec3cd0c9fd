//! The `tag` command: annotate collected artifacts with entity columns.

use std::path::PathBuf;

use trendwatch_tagger::{annotate_file, Tagger};

pub fn run(files: &[PathBuf], column: &str) -> anyhow::Result<()> {
    if files.is_empty() {
        anyhow::bail!("provide at least one TSV file to annotate");
    }

    let tagger = Tagger::with_default_models();
    for file in files {
        match annotate_file(&tagger, file, column) {
            Ok(output) => {
                println!("annotated {} -> {}", file.display(), output.display());
            }
            Err(e) => {
                tracing::error!(file = %file.display(), error = %e, "annotation failed — skipping file");
            }
        }
    }
    Ok(())
}
