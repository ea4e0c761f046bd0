//! Example: Generate a DataCard for a data file.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>
//!
//! Example:
//!   cargo run --example analyze -- test_data/golden/trades/input.json

use std::env;
use std::path::Path;

use datacard::{Correlations, DataCardGenerator, Loader, Severity};

fn main() -> datacard::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- test_data/golden/trades/input.json");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("DataCard: {}", file_path);
    println!("{}", separator);
    println!();

    let (dataset, source) = Loader::new().load_file(path)?;
    let card = DataCardGenerator::new().analyze(&dataset)?;

    println!("## Source");
    println!("  File: {}", source.file);
    println!("  Format: {}", source.format);
    println!("  Records: {}", source.record_count);
    println!("  Fields: {}", source.field_count);
    println!();

    println!("## Numeric fields ({})", card.numeric_stats.len());
    for (field, stats) in &card.numeric_stats {
        println!(
            "  {:20} count={:<6} mean={:<12} std={:<12} outliers={}",
            field,
            stats.count,
            fmt_measure(stats.mean),
            fmt_measure(stats.std),
            stats.outliers.count()
        );
    }
    println!();

    println!("## Categorical fields ({})", card.categorical_stats.len());
    for (field, stats) in &card.categorical_stats {
        let top = stats
            .top_entity()
            .map(|t| format!("{} ({}%)", t.value, fmt_measure(t.percent)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:20} unique={:<6} hhi={:<8} top={}",
            field,
            stats.unique_count,
            fmt_measure(stats.concentration_risk),
            top
        );
    }
    println!();

    println!("## Temporal fields ({})", card.temporal_stats.len());
    for (field, stats) in &card.temporal_stats {
        println!(
            "  {:20} {} .. {} ({} days)",
            field,
            stats.range.start.as_deref().unwrap_or("-"),
            stats.range.end.as_deref().unwrap_or("-"),
            stats.range.days
        );
    }
    println!();

    if let Correlations::Pearson(matrix) = &card.correlations {
        println!("## Significant correlations ({})", matrix.significant.len());
        for pair in &matrix.significant {
            println!(
                "  {} ~ {}: r={} ({:?})",
                pair.field1,
                pair.field2,
                fmt_measure(pair.r),
                pair.strength
            );
        }
        println!();
    }

    println!(
        "## Anomalies ({} high, {} medium)",
        card.anomaly_count(Severity::High),
        card.anomaly_count(Severity::Medium)
    );
    for anomaly in &card.anomalies {
        println!("  [{}] {}", anomaly.severity.label(), anomaly.description);
    }

    Ok(())
}

fn fmt_measure(measure: Option<f64>) -> String {
    measure.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}
