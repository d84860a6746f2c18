use crate::commands::common::{
    format_note_lines, note_to_list_item, print_lines, App, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(app: &App, include_archived: bool, as_json: bool) -> Result<(), CliError> {
    let notes = app.storage().list_notes(include_archived).await?;

    if as_json {
        let json_items = notes
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        print_lines(&format_note_lines(&notes));
    }

    Ok(())
}
