use std::sync::Arc;

use jotter_core::page::NeverConfirm;

use crate::commands::common::{print_lines, App};
use crate::error::CliError;

pub async fn run_archive(app: &App, id: &str, from_list: bool) -> Result<(), CliError> {
    let opened = app.open_page(id, from_list, Arc::new(NeverConfirm)).await?;
    let outcome = opened.page.archive().await?;

    print_lines(&opened.report(outcome, app.store()));
    Ok(())
}
