//! CLI runner - executes commands

use crate::cli::commands::{
    ActionCommand, Cli, Commands, DropletCommand, ImageCommand, OutputFormat, SizeCommand,
    VolumeCommand,
};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::resources::{
    ActionsService, DropletsService, ImagesService, SizesService, VolumesService,
};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing results to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out).await
    }

    /// Run the CLI command, writing results to `out`
    pub async fn run_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.resolve_config(std::env::var(crate::config::TOKEN_ENV_VAR).ok())?;
        let client = Arc::new(Client::new(&config)?);
        let format = self.cli.format;
        let start = Instant::now();

        match &self.cli.command {
            Commands::Droplet(cmd) => self.droplet(&client, cmd, out).await?,
            Commands::Image(cmd) => self.image(&client, cmd, out).await?,
            Commands::Size(SizeCommand::List) => {
                render_list(format, &client.sizes().list().await?, out)?;
            }
            Commands::Action(cmd) => match cmd {
                ActionCommand::List => render_list(format, &client.actions().list().await?, out)?,
                ActionCommand::Get { id } => {
                    render_one(format, &client.actions().get(*id).await?, out)?;
                }
            },
            Commands::Volume(cmd) => match cmd {
                VolumeCommand::List => render_list(format, &client.volumes().list().await?, out)?,
                VolumeCommand::Get { id } => {
                    render_one(format, &client.volumes().get(id).await?, out)?;
                }
                VolumeCommand::Delete { id } => {
                    client.volumes().delete(id).await?;
                    info!(volume_id = %id, "Deleted volume");
                }
            },
        }

        if let Some(rate) = client.http().rate() {
            debug!(
                limit = rate.limit,
                remaining = rate.remaining,
                reset = %rate.reset,
                "API quota"
            );
        }
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "Command finished");
        Ok(())
    }

    /// Layer config file, environment token and CLI flags
    pub fn resolve_config(&self, env_token: Option<String>) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        }
        .with_env_token(env_token);

        if let Some(token) = &self.cli.token {
            config.access_token = Some(token.clone());
        }
        if let Some(api_url) = &self.cli.api_url {
            config.api_url.clone_from(api_url);
        }
        if let Some(per_page) = self.cli.per_page {
            config.per_page = per_page;
        }
        if let Some(concurrency) = self.cli.concurrency {
            config.max_concurrency = Some(concurrency);
        }

        config.validate()?;
        Ok(config)
    }

    async fn droplet<W: Write>(
        &self,
        client: &Arc<Client>,
        cmd: &DropletCommand,
        out: &mut W,
    ) -> Result<()> {
        let droplets = client.droplets();
        let format = self.cli.format;

        match cmd {
            DropletCommand::List { tag: Some(tag) } => {
                render_list(format, &droplets.list_by_tag(tag).await?, out)
            }
            DropletCommand::List { tag: None } => render_list(format, &droplets.list().await?, out),
            DropletCommand::Get(d) => render_one(format, &droplets.get(d.id).await?, out),
            DropletCommand::Delete(d) => {
                droplets.delete(d.id).await?;
                info!(droplet_id = d.id, "Deleted droplet");
                Ok(())
            }
            DropletCommand::Kernels(d) => render_list(format, &droplets.kernels(d.id).await?, out),
            DropletCommand::Snapshots(d) => {
                render_list(format, &droplets.snapshots(d.id).await?, out)
            }
            DropletCommand::Backups(d) => render_list(format, &droplets.backups(d.id).await?, out),
            DropletCommand::Actions(d) => render_list(format, &droplets.actions(d.id).await?, out),
            DropletCommand::Neighbors(d) => {
                render_list(format, &droplets.neighbors(d.id).await?, out)
            }
        }
    }

    async fn image<W: Write>(
        &self,
        client: &Arc<Client>,
        cmd: &ImageCommand,
        out: &mut W,
    ) -> Result<()> {
        let images = client.images();
        let format = self.cli.format;

        match cmd {
            ImageCommand::List { kind, public } => {
                let list = images.list_kind((*kind).into(), *public).await?;
                render_list(format, &list, out)
            }
            ImageCommand::Get { image } => {
                let found = match image.parse::<u64>() {
                    Ok(id) => images.get_by_id(id).await?,
                    Err(_) => images.get_by_slug(image).await?,
                };
                render_one(format, &found, out)
            }
        }
    }
}

/// Write a list of items
///
/// `Json` writes one compact object per line; `Pretty` writes one indented
/// array.
pub fn render_list<T: Serialize, W: Write>(format: OutputFormat, items: &[T], out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            for item in items {
                serde_json::to_writer(&mut *out, item)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut *out, items)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Write a single item
pub fn render_one<T: Serialize, W: Write>(format: OutputFormat, item: &T, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => serde_json::to_writer(&mut *out, item)?,
        OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *out, item)?,
    }
    writeln!(out)?;
    Ok(())
}
