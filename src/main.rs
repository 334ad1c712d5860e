//! PitchConnect Back binary entrypoint wiring REST, auth, and store layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

mod auth;
mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::{MemoryStore, models::UserRecord};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = Arc::new(MemoryStore::new());
    let app_state = AppState::new(config, store);

    provision_bootstrap_accounts(&app_state).await;
    tokio::spawn(run_session_janitor(app_state.clone()));

    let app = build_router(app_state.clone());

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    app_state.audit().shutdown();

    Ok(())
}

/// Install the operator-provisioned accounts and their static sessions.
///
/// Credential and OAuth verification belong to the identity collaborator;
/// configuration-driven provisioning is how trusted callers authenticate
/// against a fresh deployment.
async fn provision_bootstrap_accounts(state: &SharedState) {
    for account in state.config().bootstrap_users.clone() {
        let user = UserRecord {
            id: account.id.unwrap_or_else(Uuid::new_v4),
            email: account.email,
            display_name: account.display_name,
            roles: account.roles,
            is_super_admin: account.super_admin,
            club_id: None,
            team_id: None,
        };

        if let Err(err) = state.store().save_user(user.clone()).await {
            warn!(error = %err, "failed to provision bootstrap account");
            continue;
        }

        if let Some(token) = account.session_token {
            state.sessions().install(token, &user);
        }
        info!(
            email = %services::audit::redact_email(&user.email),
            roles = user.roles.len(),
            "provisioned bootstrap account"
        );
    }
}

/// Periodically drop expired sessions so the registry does not grow without
/// bound.
async fn run_session_janitor(state: SharedState) {
    let mut ticker = tokio::time::interval(state.config().janitor_interval);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let pruned = state.sessions().prune_expired();
        if pruned > 0 {
            info!(pruned, "pruned expired sessions");
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
