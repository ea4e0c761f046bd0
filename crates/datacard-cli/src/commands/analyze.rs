//! Analyze command - generate a DataCard for a data file.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use datacard::{
    AnalysisOptions, AnalysisRequest, DataCardGenerator, FieldSchema, Loader, Severity,
};

use crate::cli::MethodChoice;

/// Arguments of `datacard analyze`.
pub struct AnalyzeArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub outlier_method: MethodChoice,
    pub outlier_threshold: f64,
    pub top_n: usize,
    pub no_correlations: bool,
    pub no_distributions: bool,
    pub pretty: bool,
}

impl AnalyzeArgs {
    fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            compute_correlations: !self.no_correlations,
            outlier_method: self.outlier_method.into(),
            outlier_threshold: self.outlier_threshold,
            top_n: self.top_n,
            include_distributions: !self.no_distributions,
        }
    }
}

pub fn run(args: AnalyzeArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    eprintln!(
        "{} {}",
        "Analyzing".cyan().bold(),
        args.file.display().to_string().white()
    );

    let (dataset, source) = Loader::new().load_file(&args.file)?;

    if verbose {
        eprintln!(
            "  {} records, {} fields ({}, {})",
            source.record_count, source.field_count, source.format, source.hash
        );
    }

    let mut request = AnalysisRequest::new(dataset).with_options(args.options());
    if let Some(path) = &args.schema {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read schema {}: {}", path.display(), e))?;
        let schema: FieldSchema = serde_json::from_str(&content)?;
        request = request.with_schema(schema);
    }
    request.validate()?;

    let card = DataCardGenerator::new().generate(&request)?;
    let json = card.to_json(args.pretty)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n")
                .map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
            eprintln!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => println!("{}", json),
    }

    eprintln!();
    eprintln!(
        "Analyzed {} records: {} numeric, {} categorical, {} temporal fields",
        card.summary.record_count.to_string().white().bold(),
        card.numeric_stats.len(),
        card.categorical_stats.len(),
        card.temporal_stats.len()
    );

    if card.anomalies.is_empty() {
        eprintln!("{}", "No anomalies detected".green());
        return Ok(());
    }

    eprintln!(
        "Found {} anomalies ({} high, {} medium)",
        card.anomalies.len().to_string().white().bold(),
        card.anomaly_count(Severity::High).to_string().red(),
        card.anomaly_count(Severity::Medium).to_string().yellow()
    );
    for anomaly in &card.anomalies {
        let tag = match anomaly.severity {
            Severity::High => "HIGH".red().bold(),
            Severity::Medium => "MEDIUM".yellow().bold(),
        };
        eprintln!("  {:8} {}", tag, anomaly.description);
    }

    Ok(())
}
