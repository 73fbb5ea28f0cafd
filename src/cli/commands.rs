//! CLI commands and argument parsing

use crate::resources::ImageKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// DigitalOcean API client
#[derive(Parser, Debug)]
#[command(name = "doclient")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Access token (overrides config file and environment)
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Items requested per page
    #[arg(long, global = true)]
    pub per_page: Option<u32>,

    /// Maximum concurrent page fetches per listing
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Droplet commands
    #[command(subcommand)]
    Droplet(DropletCommand),

    /// Image commands
    #[command(subcommand)]
    Image(ImageCommand),

    /// Size commands
    #[command(subcommand)]
    Size(SizeCommand),

    /// Action commands
    #[command(subcommand)]
    Action(ActionCommand),

    /// Volume commands
    #[command(subcommand)]
    Volume(VolumeCommand),
}

/// A numeric droplet id
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropletId {
    /// Droplet id
    pub id: u64,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum DropletCommand {
    /// List droplets
    List {
        /// Only droplets carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show one droplet
    Get(DropletId),
    /// Delete a droplet
    Delete(DropletId),
    /// List kernels available to a droplet
    Kernels(DropletId),
    /// List a droplet's snapshots
    Snapshots(DropletId),
    /// List a droplet's backups
    Backups(DropletId),
    /// List a droplet's actions
    Actions(DropletId),
    /// List droplets sharing hardware with a droplet
    Neighbors(DropletId),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ImageCommand {
    /// List images
    List {
        /// Which images to list
        #[arg(long, default_value = "all")]
        kind: ImageKindArg,

        /// Include public images
        #[arg(long)]
        public: bool,
    },
    /// Show an image by id or slug
    Get {
        /// Image id or slug
        image: String,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SizeCommand {
    /// List sizes
    List,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ActionCommand {
    /// List actions
    List,
    /// Show one action
    Get {
        /// Action id
        id: u64,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum VolumeCommand {
    /// List volumes
    List,
    /// Show one volume
    Get {
        /// Volume id
        id: String,
    },
    /// Delete a volume
    Delete {
        /// Volume id
        id: String,
    },
}

/// Image kind selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageKindArg {
    All,
    Distribution,
    Application,
    User,
}

impl From<ImageKindArg> for ImageKind {
    fn from(arg: ImageKindArg) -> Self {
        match arg {
            ImageKindArg::All => Self::All,
            ImageKindArg::Distribution => Self::Distribution,
            ImageKindArg::Application => Self::Application,
            ImageKindArg::User => Self::User,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one object per line)
    Json,
    /// Indented JSON
    Pretty,
}
