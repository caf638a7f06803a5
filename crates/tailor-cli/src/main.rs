//! Virtual Tailor CLI: browse the catalog and run a virtual try-on.
//!
//! Backends are configured through the environment (see `TailorConfig`); the
//! default compositor is the offline simulation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tailor_cli::{init_tracing, load_upload, user_error, ConsoleNotifier};
use tailor_core::{Catalog, TailorConfig};
use tailor_services::{ResultDownloader, TryOnSession};

#[derive(Parser)]
#[command(name = "tailor", about = "Virtual Tailor CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the clothing catalog
    Catalog {
        /// Only show items of this category ("All" shows everything)
        #[arg(long)]
        category: Option<String>,
    },
    /// Run a virtual try-on with a photo, a catalog item and body measurements
    TryOn {
        /// Path to the photo
        #[arg(long)]
        image: PathBuf,
        /// Treat the photo as a camera capture
        #[arg(long)]
        camera: bool,
        /// Catalog item id
        #[arg(long)]
        clothing: String,
        /// Height in centimeters
        #[arg(long)]
        height: String,
        /// Weight in kilograms
        #[arg(long)]
        weight: String,
        /// Save the composite image into this directory
        #[arg(long)]
        download: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct CatalogListing<'a> {
    categories: Vec<&'a str>,
    items: Vec<&'a tailor_core::ClothingItem>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

fn load_catalog(config: &TailorConfig) -> anyhow::Result<Catalog> {
    match &config.catalog_path {
        Some(path) => Catalog::from_path(path),
        None => Ok(Catalog::builtin()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Reads `.env` into the environment; must precede init_tracing
    let config = TailorConfig::from_env().context("Failed to load configuration")?;
    init_tracing();

    match cli.command {
        Commands::Catalog { category } => {
            let catalog = load_catalog(&config)?;
            let items = match category.as_deref() {
                Some(category) => catalog.by_category(category),
                None => catalog.items().iter().collect(),
            };
            print_json(&CatalogListing {
                categories: catalog.categories(),
                items,
            })?;
        }
        Commands::TryOn {
            image,
            camera,
            clothing,
            height,
            weight,
            download,
        } => {
            config.validate().context("Invalid configuration")?;
            tracing::debug!(config = ?config, "Configuration loaded");

            let session = TryOnSession::from_config(&config, Arc::new(ConsoleNotifier))
                .context("Failed to create try-on session")?;

            session
                .acquire_image(load_upload(&image, camera)?)
                .map_err(user_error)?;
            session.select_clothing(&clothing).map_err(user_error)?;
            session
                .submit_body_details(&height, &weight)
                .map_err(user_error)?;

            let outcome = session.submit().await;

            if let Some(dir) = download {
                let downloader =
                    ResultDownloader::new(Duration::from_secs(config.collaborator_timeout_secs))?;
                session
                    .download_result(&downloader, &dir)
                    .await
                    .map_err(user_error)?;
            }

            print_json(&serde_json::json!({
                "session_id": session.session_id(),
                "result": session.view(),
                "download": session.download_request(),
            }))?;

            outcome.map_err(user_error)?;
        }
    }

    Ok(())
}
