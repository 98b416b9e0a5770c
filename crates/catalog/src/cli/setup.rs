use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "catalog",
    bin_name = "catalog",
    version = get_version(),
    disable_help_subcommand = true,
    arg_required_else_help = true
)]
#[command(
    about = "Sync the storefront product dataset and maintain the product table",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (takes priority over ./catalog.toml and the user config)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite the artifact's product block from the store
    Sync {
        /// Report whether the artifact would change without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Change a product's name
    Rename {
        id: String,
        name: String,
    },

    /// Archive a product (stamps the archive time)
    Archive {
        id: String,
    },

    /// Unarchive a product (clears the archive time)
    Unarchive {
        id: String,
    },

    /// Move a product to a new identifier
    Rekey {
        #[arg(value_name = "OLD_ID")]
        from: String,
        #[arg(value_name = "NEW_ID")]
        to: String,
    },

    /// Run a JSON list of maintenance operations
    Batch {
        #[arg(value_name = "OPS_JSON")]
        file: PathBuf,
    },

    /// Show products as they would appear in the artifact
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: ListArgs,

        /// Print canonical records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upsert raw product rows from a JSON file into the store
    Seed {
        #[arg(value_name = "RECORDS_JSON")]
        file: PathBuf,
    },

    /// Print the resolved configuration
    Config,
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct ListArgs {
    /// Only archived products
    #[arg(long)]
    pub archived: bool,

    /// Active and archived products
    #[arg(long)]
    pub all: bool,
}
