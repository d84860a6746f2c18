//! Yes/no confirmation capability for destructive actions.

use std::future::Future;
use std::pin::Pin;

/// Pending answer of a confirmation prompt.
pub type ConfirmFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// Ask the user to confirm something. Implementations may block on a
/// terminal or show a modal; the page only awaits the answer.
pub trait Confirm: Send + Sync {
    fn confirm<'a>(&'a self, message: &'a str) -> ConfirmFuture<'a>;
}

/// Accepts every prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm<'a>(&'a self, _message: &'a str) -> ConfirmFuture<'a> {
        Box::pin(async { true })
    }
}

/// Declines every prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm<'a>(&'a self, _message: &'a str) -> ConfirmFuture<'a> {
        Box::pin(async { false })
    }
}
