//! Library components of the `conform` command-line tool.

pub mod config;
pub mod logging;
