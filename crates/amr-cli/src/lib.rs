//! Library components of the `amr` command-line tool.

pub mod logging;
pub mod output;
