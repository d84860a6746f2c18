use std::sync::Arc;

use jotter_core::page::NeverConfirm;

use crate::commands::common::{print_lines, App};
use crate::error::CliError;

pub async fn run_show(app: &App, id: &str, from_list: bool, as_json: bool) -> Result<(), CliError> {
    let opened = app.open_page(id, from_list, Arc::new(NeverConfirm)).await?;

    if as_json {
        let Some(note) = opened.page.note() else {
            return Err(CliError::NoteNotFound(id.to_string()));
        };
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        print_lines(&opened.settled_lines(app.store()).await);
    }

    Ok(())
}
