use std::io::{self, Write};
use std::sync::Arc;

use jotter_core::page::{AlwaysConfirm, Confirm, ConfirmFuture};

use crate::commands::common::{print_lines, App};
use crate::error::CliError;

/// Asks on the terminal; anything but "y"/"yes" declines.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm<'a>(&'a self, message: &'a str) -> ConfirmFuture<'a> {
        let prompt = message.to_string();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || prompt_yes_no(&prompt))
                .await
                .unwrap_or(false)
        })
    }
}

fn prompt_yes_no(message: &str) -> bool {
    eprint!("{message} [y/N] ");
    let _ = io::stderr().flush();

    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(error) => {
            tracing::warn!("Failed to read confirmation: {error}");
            false
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub async fn run_delete(
    app: &App,
    id: &str,
    skip_prompt: bool,
    from_list: bool,
) -> Result<(), CliError> {
    let confirm: Arc<dyn Confirm> = if skip_prompt {
        Arc::new(AlwaysConfirm)
    } else {
        Arc::new(TerminalConfirm)
    };
    let opened = app.open_page(id, from_list, confirm).await?;
    let outcome = opened.page.delete().await?;

    print_lines(&opened.report(outcome, app.store()));
    Ok(())
}
