//! Documentation of the recipe reaction backend.
//!
//!
//!
//! # General Infrastructure
//! - User talks to the reverse proxy, which owns login and session checks
//! - Proxy forwards requests here with the authenticated user id in a header (`x-user-id` by default)
//! - Requests without that header are anonymous, they can browse but not react or submit
//! - Recipes live in a Redis hash when `REDIS_URL` is set, in process memory otherwise
//!
//!
//!
//! # Routes
//!
//! All routes sit under `/api/recipes`.
//!
//! - `GET /` lists recipes oldest first, each tagged with the caller's `userReaction` when identified
//! - `POST /` submits a recipe, needs an identity
//! - `POST /{id}/react` with `{"reaction": "like" | "dislike" | "neutral"}`, needs an identity
//! - `GET /recommendations` returns the five most liked recipes
//! - `GET /user-reactions` returns `{title, reaction}` for every recipe the caller reacted to
//!
//! Errors come back as `{"message": "..."}`.
//!
//!
//!
//! # Reactions
//!
//! **Goal**: one reaction per user per recipe, with counts that always match the reaction list.
//!
//! - Sending the reaction you already have removes it
//! - Sending a different one moves your entry and both counts in a single save
//! - Updates to the same recipe run one at a time inside this process
//! - Saves are compare-and-swap on the recipe revision, so a second instance cannot overwrite a newer ledger
//! - A ledger whose counts drifted from its list is reported as a server error and left untouched
//!
//!
//!
//! # Setup
//!
//! Run against Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 RUST_LOG=info cargo run -p recipes
//! ```
//!
//! Run in memory with sample data.
//! ```sh
//! SEED_PATH=data/recipes.json RUST_LOG=debug cargo run -p recipes
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{future::pending, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;

use config::Config;
use routes::{
    create_handler, list_handler, react_handler, recommendations_handler, user_reactions_handler,
};
use state::State;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");
    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, state.config.identity_header.clone()])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/recipes", get(list_handler).post(create_handler))
        .route("/api/recipes/", get(list_handler).post(create_handler))
        .route("/api/recipes/recommendations", get(recommendations_handler))
        .route("/api/recipes/user-reactions", get(user_reactions_handler))
        .route("/api/recipes/{id}/react", post(react_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
