//! Command line interface for bunkatsu.

pub mod args;
pub mod commands;
pub mod output;
