use crate::commands::common::{resolve_note_content, App};
use crate::error::CliError;

pub async fn run_add(app: &App, content_parts: &[String]) -> Result<(), CliError> {
    let content = resolve_note_content(content_parts)?;
    let note = app.storage().create_note(&content).await?;

    println!("{}", note.id);
    Ok(())
}
