//! Jotter CLI - open, edit and file notes from the terminal
//!
//! Every note command routes to the same note page the other front ends use.

mod cli;
mod commands;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::archive::run_archive;
use crate::commands::common::{resolve_config_path, resolve_data_path, App};
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, TextEdit};
use crate::commands::list::run_list;
use crate::commands::pin::run_pin;
use crate::commands::show::run_show;
use crate::error::CliError;

const DEFAULT_LOG_DIRECTIVE: &str = "jotter=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
        )
        .init();

    let cli = Cli::parse();
    let data_path = resolve_data_path(cli.data_path)?;
    let config_path = resolve_config_path(cli.config);
    let app = App::open(&data_path, config_path.as_deref())?;

    let result = dispatch(cli.command, &app, cli.from_list).await;
    if let Err(CliError::Core(error)) = &result {
        app.store().report_failure(error);
    }
    result
}

async fn dispatch(command: Commands, app: &App, from_list: bool) -> Result<(), CliError> {
    match command {
        Commands::Add { content } => run_add(app, &content).await,
        Commands::List { archived, json } => run_list(app, archived, json).await,
        Commands::Show { id, json } => run_show(app, &id, from_list, json).await,
        Commands::Edit { id, text, append } => {
            let edit = match (text, append) {
                (Some(text), _) => TextEdit::Replace(text),
                (None, Some(suffix)) => TextEdit::Append(suffix),
                (None, None) => return Err(CliError::EmptyContent),
            };
            run_edit(app, &id, &edit, from_list).await
        }
        Commands::Pin { id } => run_pin(app, &id, from_list).await,
        Commands::Archive { id } => run_archive(app, &id, from_list).await,
        Commands::Delete { id, yes } => run_delete(app, &id, yes, from_list).await,
    }
}
