#![cfg_attr(debug_assertions, allow(warnings))]

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use spark_guidance::{GuidanceEngine, Vocabulary};
use spark_starlight::config::{Cli, Config};
use spark_starlight::server::{self, AppState};
use spark_starlight::stream::run_eviction;

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    tracing_subscriber::fmt()
        .with_max_level(config.level_filter()?)
        .with_target(false)
        .init();

    let vocabulary = match &config.vocabulary.path {
        Some(path) => Vocabulary::from_path(path)
            .with_context(|| format!("Failed to load vocabulary {}", path.display()))?,
        None => Vocabulary::default(),
    };
    let state = web::Data::new(AppState::new(GuidanceEngine::new(vocabulary), &config)?);

    actix_web::rt::spawn(run_eviction(state.sessions.clone(), config.idle()));

    let address = (config.server.host.clone(), config.server.port);
    info!(
        "Starting guidance service on {}:{} (throttle {:?}, repeat {:?})",
        address.0,
        address.1,
        config.throttle(),
        config.repeat()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(server::configure)
    })
    .bind(address)
    .context("Failed to bind the guidance service")?
    .run()
    .await?;

    Ok(())
}
