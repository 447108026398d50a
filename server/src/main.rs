mod config;
mod db;
mod feeds;
mod redirect;
mod security;

use app::{component, shell, types::AppState};
use axum::{Extension, Router, http::StatusCode, response::Json, routing::get};
use dotenvy::dotenv;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes as _, generate_route_list};
use leptos_config::get_configuration;
use serde_json::json;
use std::sync::Arc;
use tower_http::compression::predicate::{NotForContentType, SizeAbove};
use tower_http::compression::{CompressionLayer, Predicate as _};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::SiteConfig;
use feeds::{rss_handler, sitemap_handler};
use redirect::redirect_www;
use security::security_headers;

async fn health_handler() -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "studio",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

fn tracing_level() -> tracing::Level {
    if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_file(true)
        .with_line_number(true)
        .with_max_level(tracing_level())
        .init();

    if dotenv().is_err() {
        tracing::warn!("There is no corresponding .env file");
    }

    let site = match SiteConfig::from_env() {
        Ok(site) => Arc::new(site),
        Err(err) => {
            tracing::error!("Invalid site configuration: {err}");
            return;
        }
    };

    let Ok(conf) = get_configuration(Some("Cargo.toml")) else {
        tracing::error!("Failed to get configuration");
        return;
    };

    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let routes = generate_route_list(component);

    let db = match db::connect(&site).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("Giving up on SurrealDB: {err}");
            return;
        }
    };
    let app_state = AppState {
        db: Arc::new(db),
        leptos_options: Arc::new(leptos_options.clone()),
    };

    let app = Router::new()
        .leptos_routes_with_context(
            &app_state,
            routes,
            {
                let app_state = app_state.clone();
                move || provide_context(app_state.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .route("/health", get(health_handler))
        .route("/rss.xml", get(rss_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .nest_service("/storage", ServeDir::new(&site.static_dir))
        .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
        .layer(
            tower::ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(redirect_www))
                .layer(axum::middleware::from_fn(security_headers)),
        )
        .layer(CompressionLayer::new().compress_when(
            NotForContentType::new("application/rss+xml").and(SizeAbove::new(1024)),
        ))
        .layer(Extension(Arc::clone(&site)))
        .with_state(app_state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind tcp listener to {addr}: {err}");
            return;
        }
    };
    tracing::info!("Listening on http://{addr}");

    if let Err(err) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Failed to serve app: {err:?}");
    } else {
        tracing::info!("Server shutdown gracefully");
    }
}
