pub mod add;
pub mod archive;
pub mod common;
pub mod delete;
pub mod edit;
pub mod list;
pub mod pin;
pub mod show;
