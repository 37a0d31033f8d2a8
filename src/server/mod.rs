//! HTTP front door.
//!
//! Exposes the upload form, the upload endpoint that drives the dispatch
//! pipeline, and a liveness probe. All state the handlers need is explicit
//! in [`AppState`] and passed to the app at startup.

pub mod handlers;
mod upload;

pub use upload::{secure_filename, validate_extension, SavedUpload};

use crate::client::MessageSender;
use crate::config::Config;
use crate::metrics::Metrics;
use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing::info;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sender: Arc<dyn MessageSender>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: Config, sender: Arc<dyn MessageSender>, metrics: Metrics) -> Self {
        Self {
            config,
            sender,
            metrics,
        }
    }
}

/// Route table, shared between the real server and the test harness.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/upload", web::post().to(handlers::upload))
        .route("/health", web::get().to(handlers::health));
}

/// Run the HTTP server until shutdown.
pub async fn run_server(state: AppState) -> io::Result<()> {
    let bind_addr = state.config.bind_addr.clone();
    let data = web::Data::new(state);

    info!("listening on {}", bind_addr);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(routes))
        .bind(bind_addr)?
        .run()
        .await
}
