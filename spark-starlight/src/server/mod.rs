pub mod error;
pub mod routes;

use crate::config::Config;
use crate::stream::StreamSessions;
use actix_web::web;
use anyhow::Result;
use spark_guidance::{FrameContext, GuidanceEngine};
use std::sync::Arc;

/// Shared by every worker. The engine only holds read-only tables.
pub struct AppState {
    pub engine: GuidanceEngine,
    pub sessions: Arc<StreamSessions>,
    pub default_frame: FrameContext,
}

impl AppState {
    pub fn new(engine: GuidanceEngine, config: &Config) -> Result<Self> {
        Ok(Self {
            engine,
            sessions: Arc::new(StreamSessions::new(config.throttle(), config.repeat())),
            default_frame: config.default_frame()?,
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .route("/", web::get().to(routes::root))
        .route("/health", web::get().to(routes::health))
        .route("/guide", web::post().to(routes::guide))
        .route("/analyze", web::post().to(routes::analyze))
        .route("/find-object", web::post().to(routes::find_object))
        .route("/navigate-to", web::post().to(routes::navigate_to))
        .route("/stream/{session}", web::post().to(routes::stream_frame))
        .route("/stream/{session}", web::delete().to(routes::close_stream));
}
