//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Skeg - concurrent chart fetch cache
///
/// Resolves charts against configured repositories and keeps one verified
/// archive per chart version on disk.
#[derive(Parser, Debug)]
#[command(name = "skeg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SKEG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Home directory holding the archive cache
    #[arg(long, global = true, env = "SKEG_HOME")]
    pub home: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch charts into the local archive cache
    Fetch(FetchArgs),

    /// Show which version a reference resolves to, without fetching
    Resolve(ResolveArgs),

    /// Inspect the archive cache
    Cache(CacheArgs),

    /// Inspect configured repositories
    Repo(RepoArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Prepare release operations for a deployment manager
    Plan(PlanArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Charts to fetch (repository/chart)
    #[arg(required = true)]
    pub charts: Vec<String>,

    /// Version constraint applied to every chart (default: highest)
    #[arg(long)]
    pub version: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Chart reference (repository/chart)
    pub chart: String,

    /// Version constraint (default: highest)
    #[arg(long)]
    pub version: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List stored archives
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the archive directory
    Path,
}

/// Arguments for the repo command
#[derive(Parser, Debug)]
pub struct RepoArgs {
    /// Subcommand for repo
    #[command(subcommand)]
    pub action: RepoAction,
}

/// Repo subcommands
#[derive(Subcommand, Debug)]
pub enum RepoAction {
    /// List configured repositories
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Subcommand for plan
    #[command(subcommand)]
    pub action: PlanAction,
}

/// Plan subcommands. Each prints the prepared operation as JSON.
#[derive(Subcommand, Debug)]
pub enum PlanAction {
    /// Fetch a chart and plan a new release
    Install {
        /// Chart reference (repository/chart)
        chart: String,

        /// Version constraint (default: highest)
        #[arg(long)]
        version: Option<String>,

        /// Target namespace
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Simulate the install
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch a chart and plan an upgrade of an existing release
    Upgrade {
        /// Release name
        release: String,

        /// Chart reference (repository/chart)
        chart: String,

        /// Version constraint (default: highest)
        #[arg(long)]
        version: Option<String>,

        /// Target namespace
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Simulate the upgrade
        #[arg(long)]
        dry_run: bool,

        /// Seconds to wait for any single cluster operation
        #[arg(long, default_value_t = crate::release::options::DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
    },

    /// Plan deletion of a release
    Delete {
        /// Release name
        release: String,

        /// Simulate the delete
        #[arg(long)]
        dry_run: bool,

        /// Skip hooks during deletion
        #[arg(long)]
        disable_hooks: bool,

        /// Remove the release record so the name can be reused
        #[arg(long)]
        purge: bool,

        /// Seconds to wait for any single cluster operation
        #[arg(long, default_value_t = crate::release::options::DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
    },

    /// Plan a release listing
    List {
        /// Sort key
        #[arg(long, default_value = "name")]
        sort_by: SortKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Maximum releases returned
        #[arg(long, default_value_t = crate::release::options::DEFAULT_LIST_LIMIT)]
        limit: u32,

        /// Release name to start after
        #[arg(long, default_value = "")]
        offset: String,

        /// Regular expression release names must match
        #[arg(long, default_value = "")]
        filter: String,

        /// Only releases in this namespace
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Status filter: "all" or a comma-separated list
        /// (deployed, deleted, deleting, failed, superseded, pending)
        #[arg(long)]
        status: Option<String>,
    },
}

/// Sort key for planned listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    /// Release name
    Name,
    /// Time of the last release
    LastReleased,
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
