//! gradio-modal - Deploy Gradio apps to Modal

use std::process::ExitCode;

use clap::Parser;
use gradio_modal::cli::Cli;
use gradio_modal::output::json::{error_code, format_error};
use gradio_modal::output::wants_color;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    let color = wants_color(
        cli.no_color,
        console::Term::stderr().is_term(),
        std::env::var_os("NO_COLOR").is_some(),
    );
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                let msg = format!("{e:#}");
                match format_error(&msg, error_code(&e)) {
                    Ok(out) => println!("{out}"),
                    Err(_) => eprintln!("Error: {msg}"),
                }
            } else if color {
                eprintln!("{} {e:#}", "Error:".red().bold());
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gradio_modal=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
