//! # Catalog Architecture
//!
//! Catalog keeps a storefront's embedded product dataset in step with the
//! product table in a remote store, and carries out the small set of
//! maintenance operations (rename, archive, rekey) that store needs.
//!
//! Like its CLI, this is a library first: the binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/catalog)                                 │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Installs the tracing subscriber                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Supplies artifact target, aliases and the clock          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - sync, rename, archive, rekey, batch, list, seed          │
//! │  - Built on normalize.rs and artifact.rs                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RemoteStore trait                                        │
//! │  - RestStore (production), FileStore, MemStore (testing)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow of a Sync
//!
//! ```text
//! store rows ──► RawRecord ──normalize──► CanonicalRecord ──render──► artifact block
//! ```
//!
//! A sync is read-only against the store and all-or-nothing against the
//! artifact. Maintenance commands are the only writers to the store.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Diagnostics go through `tracing`; the embedding application decides
//! where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each operation
//! - [`normalize`]: Raw row → canonical record mapping
//! - [`artifact`]: Locating and rewriting the dataset block
//! - [`store`]: Store abstraction and backends
//! - [`model`]: Record types
//! - [`config`]: Layered configuration
//! - [`init`]: Config → API wiring
//! - [`error`]: Error types

pub mod api;
pub mod artifact;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod normalize;
pub mod store;
