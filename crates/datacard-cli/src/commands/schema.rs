//! Schema command - print the inferred field classification.

use std::path::PathBuf;

use colored::Colorize;
use datacard::{FieldKind, Loader, SchemaInference};

pub fn run(file: PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (dataset, source) = Loader::new().load_file(&file)?;
    let schema = SchemaInference::new().infer(&dataset);

    if verbose {
        eprintln!(
            "{} {} ({} records, {} fields)",
            "Schema for".cyan().bold(),
            source.file.white(),
            source.record_count,
            source.field_count
        );
        for kind in FieldKind::ALL {
            for name in schema.fields(kind) {
                eprintln!("  {:24} {}", name, kind.label());
            }
        }
        eprintln!();
    }

    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
