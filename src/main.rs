use clap::Parser;
use reportdesk::cli::commands::Cli;
use reportdesk::cli::handlers;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI (no stderr logging; failures
            // surface in the status row instead)
            if let Err(e) = reportdesk::tui::run() {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(std::io::stderr)
                .init();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
