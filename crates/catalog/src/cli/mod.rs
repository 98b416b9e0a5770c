//! # CLI Behavior
//!
//! **One possible UI client** for the catalog engine. The CLI is the only place
//! that knows about terminal I/O, exit codes and output formatting.
//!
//! ## Commands
//!
//! - `catalog sync [--dry-run]`: rewrite the artifact from the store
//! - `catalog rename <id> <name>`
//! - `catalog archive <id>` / `catalog unarchive <id>`
//! - `catalog rekey <old-id> <new-id>`
//! - `catalog batch <ops.json>`: an explicit list of the operations above
//! - `catalog list [--archived | --all] [--json]`
//! - `catalog seed <records.json>`: upsert raw rows (local bootstrap)
//! - `catalog config`: print the resolved configuration
//!
//! Running `catalog` with no subcommand prints help.
//!
//! ## Output Streams
//!
//! Command output goes to stdout. Logs go to stderr through `tracing`; the
//! default level is `warn`, each `-v` raises it one step and `RUST_LOG`
//! applies when no `-v` is given.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap, version string
//! - `commands`: Context setup and per-command handlers
//! - `render`: Output formatting (messages, tables, summaries)

mod commands;
mod render;
pub mod setup;

pub use commands::run;
