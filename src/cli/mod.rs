mod args;
mod paths;

pub use args::{BootArgs, Cli, Commands};
pub use paths::{locales_dir, resolve_data_dir};
