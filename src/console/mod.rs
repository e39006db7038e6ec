mod commands;
mod console;

pub use console::*;
