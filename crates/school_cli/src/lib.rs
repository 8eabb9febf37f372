//! Library half of the `school` binary: argument definitions, command
//! dispatch and output formatting.

pub mod cli;
pub mod commands;
pub mod output;
