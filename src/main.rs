//! callboard CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments and dispatches (via cli::run)
//! 2. Logs failures and prints them as a JSON error object on stdout
//! 3. Exits with non-zero on failure
//!
//! All logic is delegated to the CLI module.

use callboard::cli;
use callboard::observability::Logger;

fn main() {
    if let Err(e) = cli::run() {
        Logger::error("COMMAND_FAILED", &[("code", e.code_str())]);
        if cli::write_error(e.code_str(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
