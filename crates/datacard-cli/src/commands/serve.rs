//! Serve command - run the analysis HTTP API.

use colored::Colorize;

use crate::server::{app, state::AppState};

pub fn run(port: u16, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new();

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting analysis server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  POST {}/api/v1/analyze/dataset", url);
    println!("  GET  {}/health", url);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))
}
