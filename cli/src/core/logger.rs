use std::fmt::Display;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

const GREEN: &str = "\u{001B}[0;32m";
const RED: &str = "\u{001B}[0;31m";
const RESET: &str = "\u{001B}[0;0m";

/// Console output for the user. Diagnostics go through `tracing` instead.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    color: bool,
}

impl Logger {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colours output only when stdout is a terminal.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }

    pub fn print(&self, message: impl Display) {
        println!("{message}");
    }

    pub fn info(&self, message: impl Display) {
        println!("{}", self.paint(GREEN, &message.to_string()));
    }

    pub fn error(&self, message: impl Display) {
        eprintln!("{}", self.paint(RED, &format!("Error: {message}")));
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Installs the stderr `tracing` subscriber. `RUST_LOG` applies unless `debug` is set.
pub fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("spark=debug,spark_lib=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
