pub mod app;
pub mod commands;
pub mod interaction;
pub mod output;
mod shell;
pub mod ui;

pub use shell::{run_cli, usage, CliMode, SCRIPT_ENV};
