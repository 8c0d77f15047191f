use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use editorial::{
    config::Config,
    gallery::{Direction, GalleryViewer},
    model::network::PageQuery,
    session::{DetailSession, Site, View},
    source::Snapshot,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "editorial")]
#[command(about = "Build blog page models from a content snapshot")]
struct Cli {
    /// Path to the TOML config
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the listing page
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Print an article page and the state of its gallery viewer
    Post {
        slug: String,
        #[arg(long)]
        category: Option<String>,
        /// Open the gallery viewer on this image
        #[arg(long)]
        open: Option<usize>,
        /// Step the open viewer, in order
        #[arg(long, value_enum)]
        step: Vec<Step>,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum Step {
    Previous,
    Next,
}

impl From<Step> for Direction {
    fn from(step: Step) -> Self {
        match step {
            Step::Previous => Direction::Previous,
            Step::Next => Direction::Next,
        }
    }
}

#[derive(Serialize)]
struct PostOutput<'a, P> {
    view: P,
    viewer: &'a GalleryViewer,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    tracing::debug!(?config, "loaded config");

    let source = Snapshot::load(&config.source.snapshot_file).await?;
    let site = Site::new(source, config.assets()?, config.listing);

    let json = match cli.command {
        Command::List { category } => {
            let view = site.listing(&PageQuery { category }).await;
            serde_json::to_string_pretty(&view)?
        }

        Command::Post {
            slug,
            category,
            open,
            step,
        } => {
            let view = site.detail(&slug, &PageQuery { category }).await;

            let mut session = DetailSession::default();
            if let View::Ready(page) = &view {
                session.show(page);
                if let Some(index) = open {
                    session.viewer_mut().open_at(index);
                }
                for step in step {
                    session.viewer_mut().step(step.into());
                }
            }

            serde_json::to_string_pretty(&PostOutput {
                view: &view,
                viewer: session.viewer(),
            })?
        }
    };

    println!("{}", json);
    Ok(())
}
