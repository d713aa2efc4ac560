//! Subcommands of the `quarto` binary

pub mod evaluate;
pub mod play;
pub mod train;
