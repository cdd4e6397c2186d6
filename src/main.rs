use clap::Parser;
use colored::Colorize;

use subtrack::cli::{Cli, Commands, run_command};
use subtrack::config;
use subtrack::server::run_server;
use subtrack::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    config::init_config();
    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(config::get_config());

    match cli.command {
        None | Some(Commands::Serve) => run_server().await,
        Some(command) => {
            if let Err(e) = run_command(command, cli.api_url) {
                eprintln!("{} {}", "✖".bold().red(), e);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
