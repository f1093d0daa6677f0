//! Sophic CLI - operator surface for the Sophic journal core
//!
//! Reads and writes the encrypted settings blob, manages categories, and
//! exposes the sanitizer and envelope encryption for scripting.

mod app;
mod cli;
mod commands;
mod config;
mod errors;

use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use app::AppContext;
use cli::{CategoryCommand, Cli, Commands, SettingsCommand};
use errors::CliError;

const LOG_ENV: &str = "SOPHIC_LOG";

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Unable to set global default subscriber");
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(cli);
    match &cli.command {
        Commands::Settings(SettingsCommand::Show { json }) => {
            commands::settings::handle_show(&ctx, *json)
        }
        Commands::Settings(SettingsCommand::Set { field, value }) => {
            commands::settings::handle_set(&ctx, *field, value)
        }
        Commands::Settings(SettingsCommand::Reset) => commands::settings::handle_reset(&ctx),
        Commands::Category(CategoryCommand::Add { name }) => {
            commands::category::handle_add(&ctx, name)
        }
        Commands::Category(CategoryCommand::List { json }) => {
            commands::category::handle_list(&ctx, *json)
        }
        Commands::Sanitize(args) => commands::sanitize::handle_sanitize(args),
        Commands::Encrypt(args) => commands::crypt::handle_encrypt(&ctx, args),
        Commands::Decrypt(args) => commands::crypt::handle_decrypt(&ctx, args),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            cli_err.exit();
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
