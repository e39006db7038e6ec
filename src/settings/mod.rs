//! Command line and layered settings (defaults, TOML file, `LECTERN__*`
//! environment).

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
