pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod forms;
pub mod ranking;
pub mod routes;
pub mod store;
pub mod templates;
pub mod tmdb;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{config::Config, store::MovieStore, tmdb::TmdbClient};

/// Everything a handler needs, built once at startup.
pub struct AppState {
    pub store: MovieStore,
    pub tmdb: TmdbClient,
}

impl AppState {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("movierank/", env!("CARGO_PKG_VERSION")))
            .timeout(config.tmdb_timeout)
            .connect_timeout(config.tmdb_connect_timeout)
            .build()?;

        let db = db::connect_and_migrate(&config.database_url).await?;

        let tmdb = TmdbClient::new(
            http,
            config.tmdb_api_key.clone(),
            config.tmdb_base_url.clone(),
            config.tmdb_image_base_url.clone(),
            config.tmdb_language.clone(),
        );

        Ok(Self { store: MovieStore::new(db), tmdb })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/edit", get(routes::edit_form).post(routes::edit_submit))
        .route("/delete", get(routes::delete))
        .route("/add", get(routes::add_form).post(routes::add_search))
        .route("/find", get(routes::find))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
