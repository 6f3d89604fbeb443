//! Production adapters for the port traits.

mod log_console;

pub use log_console::LogConsole;
