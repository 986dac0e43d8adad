/// CLI layer: argument parsing, cell formatting, and output rendering.
pub mod args;
pub mod format;
pub mod output;

pub use args::Cli;
pub use output::{OutputCtx, write_error, write_stdout};
