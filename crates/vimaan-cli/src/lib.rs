//! Library components of the `vimaan` command-line tool.

pub mod commands;
pub mod logging;
pub mod render;
