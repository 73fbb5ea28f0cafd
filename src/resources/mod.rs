//! Resource services
//!
//! One module per API resource. Each exposes its model types, a service
//! trait and an implementation over a shared [`Client`](crate::Client).

pub mod actions;
pub mod droplets;
pub mod images;
pub mod sizes;
pub mod volumes;

pub use actions::{wait_for_action, Action, ActionStatus, Actions, ActionsService};
pub use droplets::{
    Droplet, DropletCreateRequest, DropletImage, DropletMultiCreateRequest, Droplets,
    DropletsService, InterfaceType, Kernel, NetworkV4, NetworkV6, Networks,
};
pub use images::{Image, ImageKind, ImageUpdateRequest, Images, ImagesService};
pub use sizes::{Size, Sizes, SizesService};
pub use volumes::{Volume, VolumeCreateRequest, Volumes, VolumesService};
