use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Contentful Content Type Synchronization Tool
///
/// Copy field definitions between content types and retire fields, across one or more Contentful spaces
#[derive(Parser, Debug)]
#[command(name = "ctsync")]
#[command(long_about = None, version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Overwrite conflicting fields without prompting
    #[arg(long, global = true)]
    pub yes_all: bool,

    /// Preview changes without saving or publishing (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Use specific config file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where and how to reach the spaces
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Space to operate on, as [name:]space-id:access-token (repeatable, comma separated)
    #[arg(short, long = "spaces", alias = "space", global = true, value_name = "SPACE", value_delimiter = ',')]
    pub spaces: Vec<String>,

    /// Environment within each space [default: master]
    #[arg(short, long, global = true, value_name = "ENV")]
    pub environment: Option<String>,

    /// Management API host [default: api.contentful.com]
    #[arg(long, global = true, value_name = "HOST")]
    pub host: Option<String>,

    /// Management API port
    #[arg(long, global = true, value_name = "PORT")]
    pub port: Option<u16>,

    /// Use http instead of https
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Proxy hostname
    #[arg(long, global = true, value_name = "HOST", requires = "proxy_port")]
    pub proxy_host: Option<String>,

    /// Proxy port
    #[arg(long, global = true, value_name = "PORT", requires = "proxy_host")]
    pub proxy_port: Option<u16>,

    /// Milliseconds to wait between saving and publishing [default: 5000]
    #[arg(long, global = true, value_name = "MS")]
    pub pre_publish_delay: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy fields from one content type into others
    CopyFields {
        /// Field ids to copy
        #[arg(required = true, num_args = 1.., value_name = "FIELD")]
        fields: Vec<String>,

        /// Content type to copy from, as [space/]content-type-id
        #[arg(long, value_name = "SELECTOR")]
        source: String,

        /// Content types to copy into, as [space/]content-type-id
        #[arg(short, long = "target", alias = "targets", required = true, num_args = 1.., value_name = "SELECTOR")]
        targets: Vec<String>,

        /// Publish content types after saving them
        #[arg(short, long)]
        publish: bool,

        /// Overwrite existing fields of the same type without prompting
        #[arg(long)]
        force: bool,
    },

    /// Delete fields from content types
    ///
    /// Fields must be omitted before they can be deleted; --force omits them first.
    DeleteFields {
        /// Field ids to delete
        #[arg(required = true, num_args = 1.., value_name = "FIELD")]
        fields: Vec<String>,

        /// Content types to delete from, as [space/]content-type-id
        #[arg(short, long = "target", alias = "targets", required = true, num_args = 1.., value_name = "SELECTOR")]
        targets: Vec<String>,

        /// Omit active fields first, then delete them
        #[arg(long)]
        force: bool,
    },
}
