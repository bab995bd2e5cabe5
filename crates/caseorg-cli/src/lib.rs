//! Terminal front end for the case browser.
//!
//! One-shot subcommands print results and exit; `browse` (the default) runs
//! the interactive browser. Both drive the same headless components from
//! `caseorg-core`.

mod args;
mod commands;
pub mod context;
mod handlers;
pub mod logging;
pub mod output;
mod tui;
pub mod types;

pub use args::{CaseLawArgs, Cli, Commands, ConfigCommand, SearchArgs};
pub use commands::run;
