use std::sync::Arc;

use jotter_core::page::NeverConfirm;
use jotter_core::Error;

use crate::commands::common::{print_lines, render_view, App};
use crate::error::CliError;

/// Change applied to the editor before saving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextEdit {
    Replace(String),
    Append(String),
}

impl TextEdit {
    pub fn apply(&self, current: &str) -> String {
        match self {
            Self::Replace(text) => text.clone(),
            Self::Append(suffix) => format!("{current}{suffix}"),
        }
    }
}

pub async fn run_edit(
    app: &App,
    id: &str,
    edit: &TextEdit,
    from_list: bool,
) -> Result<(), CliError> {
    let opened = app.open_page(id, from_list, Arc::new(NeverConfirm)).await?;
    let current = opened.page.note().ok_or(Error::NoteNotLoaded)?;

    opened.page.change_text(edit.apply(current.text_or_empty()));
    let outcome = opened.page.save().await?;

    print_lines(&opened.report(outcome, app.store()));
    print_lines(&render_view(&opened.page.view()));
    Ok(())
}
