//! # Catalog CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/catalogapp/`: the engine library (sync, maintenance, stores)
//! - `crates/catalog/`: this operator CLI, a client of `catalogapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/catalog/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config loading, logging, dispatch (commands.rs)          │
//! │  - Terminal rendering with console styles (render.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/catalogapp/src/api.rs)                   │
//! │  - Dispatches to command modules                            │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI layer owns argument
//! parsing, context initialization, rendering, log routing and exit codes.
//!
//! ## Exit Codes
//!
//! - `0`: the command succeeded (for `batch`: every operation succeeded)
//! - `1`: the command failed, or at least one batch operation failed
//!
//! ## Testing Approach
//!
//! Engine behavior is tested in `catalogapp`. Here, `tests/cli_e2e.rs` drives
//! the compiled binary against the file backend in a temp directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
