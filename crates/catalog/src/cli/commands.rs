//! # CLI Layer
//!
//! The **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Decides the process exit status
//! - Installs the log subscriber
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: `setup::Cli` via clap
//! 2. **Logging**: `tracing-subscriber` on stderr, level from `-v` or `RUST_LOG`
//! 3. **Context Setup**: load config, build the API through `catalogapp::init`
//! 4. **Dispatch**: one handler per subcommand
//! 5. **Output**: hand `CmdResult`s to `render`

use super::render;
use super::setup::{Cli, Commands, ListArgs};
use anyhow::{bail, Context, Result};
use catalogapp::api::CatalogApi;
use catalogapp::commands::{batch, list::ListFilter, seed, CmdResult};
use catalogapp::config::CatalogConfig;
use catalogapp::init::{initialize, DynStore};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = CatalogConfig::load(cli.config.as_deref(), &cwd)?;
    debug!(
        backend = %config.store.backend,
        artifact = %config.artifact.path.display(),
        "resolved configuration"
    );

    if let Commands::Config = command {
        return handle_config(&config);
    }

    let api = initialize(&config, &cwd)?;
    match command {
        Commands::Sync { dry_run } => handle_sync(&api, dry_run),
        Commands::Rename { id, name } => print_result(api.rename(&id, &name)?),
        Commands::Archive { id } => print_result(api.archive(&id)?),
        Commands::Unarchive { id } => print_result(api.unarchive(&id)?),
        Commands::Rekey { from, to } => print_result(api.rekey(&from, &to)?),
        Commands::Batch { file } => handle_batch(&api, &file),
        Commands::List { filter, json } => handle_list(&api, &filter, json),
        Commands::Seed { file } => handle_seed(&api, &file),
        Commands::Config => Ok(()),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_result(result: CmdResult) -> Result<()> {
    print!("{}", render::render_messages(&result.messages));
    Ok(())
}

fn handle_sync(api: &CatalogApi<DynStore>, dry_run: bool) -> Result<()> {
    print_result(api.sync(dry_run)?)
}

fn handle_batch(api: &CatalogApi<DynStore>, file: &Path) -> Result<()> {
    let ops = batch::load_ops(file)
        .with_context(|| format!("cannot read batch file {}", file.display()))?;
    let result = api.run_batch(&ops)?;

    if let Some(summary) = &result.batch {
        print!("{}", render::render_batch(summary));
    }
    print!("{}", render::render_messages(&result.messages));

    match &result.batch {
        Some(summary) if !summary.is_clean() => {
            bail!("{} of {} operations failed", summary.failed(), ops.len())
        }
        _ => Ok(()),
    }
}

fn handle_list(api: &CatalogApi<DynStore>, args: &ListArgs, json: bool) -> Result<()> {
    let filter = if args.all {
        ListFilter::All
    } else if args.archived {
        ListFilter::Archived
    } else {
        ListFilter::Active
    };
    let result = api.list(filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.listed_records)?);
        return Ok(());
    }
    print!("{}", render::render_list(&result.listed_records, Utc::now()));
    print!("{}", render::render_messages(&result.messages));
    Ok(())
}

fn handle_seed(api: &CatalogApi<DynStore>, file: &Path) -> Result<()> {
    let records = seed::load_records(file)
        .with_context(|| format!("cannot read records file {}", file.display()))?;
    print_result(api.seed(&records)?)
}

fn handle_config(config: &CatalogConfig) -> Result<()> {
    let mut shown = config.clone();
    if shown.store.api_key.is_some() {
        shown.store.api_key = Some("********".to_string());
    }
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}
