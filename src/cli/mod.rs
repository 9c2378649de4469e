//! Command-line interface components
//!
//! This module contains CLI-specific code: argument parsing, progress
//! display, and the command handlers.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, CloneArgs, Commands, DownloadArgs, GlobalArgs, InitArgs, InspectArgs};
pub use commands::{handle_clone, handle_download, handle_init, handle_inspect};
pub use progress::ProgressDisplay;
