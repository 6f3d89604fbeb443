//! Log-based console sink adapter.
//!
//! Implements [`ConsoleSink`] by writing through the `log` facade, with
//! the color rendered as a bracketed tag. A terminal adapter with real
//! ANSI colors would implement the same trait.

use log::info;

use crate::ports::{ConsoleColor, ConsoleSink};

/// Adapter that routes console output to the `log` crate.
pub struct LogConsole;

impl LogConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for LogConsole {
    fn log(&mut self, msg: &str, color: ConsoleColor) {
        let tag = match color {
            ConsoleColor::Orange => "orange",
            ConsoleColor::Red => "red",
            ConsoleColor::Green => "green",
            ConsoleColor::White => "white",
        };
        info!("[{tag}] {msg}");
    }
}
