//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use datacard::OutlierMethod;

/// DataCard: statistical reports for tabular records
#[derive(Parser)]
#[command(name = "datacard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a data file and write its DataCard as JSON
    Analyze {
        /// Path to the data file (JSON, JSON Lines, CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the card (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with field classification hints
        #[arg(long, value_name = "SCHEMA")]
        schema: Option<PathBuf>,

        /// Outlier detection method
        #[arg(long, default_value = "zscore")]
        outlier_method: MethodChoice,

        /// Z-score cutoff or IQR multiplier
        #[arg(long, default_value = "3.0")]
        outlier_threshold: f64,

        /// Number of top categories per categorical field
        #[arg(long, default_value = "10")]
        top_n: usize,

        /// Skip the correlation matrix
        #[arg(long)]
        no_correlations: bool,

        /// Skip chart data
        #[arg(long)]
        no_distributions: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the inferred field schema of a data file
    Schema {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Serve the analysis API over HTTP
    Serve {
        /// Port for the web server
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}

/// Outlier method as accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodChoice {
    /// Distance from the mean in standard deviations
    Zscore,
    /// Distance outside the interquartile fences
    Iqr,
}

impl From<MethodChoice> for OutlierMethod {
    fn from(choice: MethodChoice) -> Self {
        match choice {
            MethodChoice::Zscore => OutlierMethod::Zscore,
            MethodChoice::Iqr => OutlierMethod::Iqr,
        }
    }
}
