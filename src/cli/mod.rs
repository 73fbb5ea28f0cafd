//! CLI module
//!
//! Command-line interface over the resource services.
//!
//! # Commands
//!
//! - `droplet` - list, inspect and delete droplets
//! - `image` - list and inspect images
//! - `size` - list sizes
//! - `action` - list and inspect actions
//! - `volume` - list, inspect and delete volumes

mod commands;
mod runner;

pub use commands::{
    ActionCommand, Cli, Commands, DropletCommand, DropletId, ImageCommand, ImageKindArg,
    OutputFormat, SizeCommand, VolumeCommand,
};
pub use runner::{render_list, render_one, Runner};
