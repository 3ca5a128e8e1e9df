mod api;
mod config;
mod models;
mod planner;
mod timetable;

use axum::http::{HeaderValue, Method, header};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa_swagger_ui::SwaggerUi;

use api::AppState;
use config::Config;
use planner::PlannerClient;
use timetable::{RouteDirectory, Severity, TimetableStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ferry_planner=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    info!(path = %config_path, "Loading configuration");
    let config = Config::load(&config_path)?;

    let departures = config.timetable.load()?;
    let mut store = TimetableStore::from_records(departures)?;
    info!(
        departures = store.len(),
        routes = config.routes.len(),
        "Loaded timetable"
    );
    if store.is_empty() {
        warn!("Timetable source has no departures");
    }

    // Every store event ends up in the log; mutations mark listings as stale
    store.subscribe(|event| match event.notification.severity {
        Severity::Success => info!(
            message = %event.notification.message,
            refresh = event.change.mutates(),
            "Timetable event"
        ),
        Severity::Error => warn!(
            message = %event.notification.message,
            "Timetable change rejected"
        ),
    });

    let state = AppState {
        timetable: Arc::new(RwLock::new(store)),
        routes: Arc::new(RouteDirectory::new(config.routes.clone())),
        planner: PlannerClient::new(&config.planner)?,
    };

    let cors = cors_layer(&config)?;

    let (app, api) = api::router(state);
    let app = app
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Ferry planner listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &Config) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if config.cors_permissive {
        warn!("CORS is permissive, all origins are allowed");
        return Ok(cors.allow_origin(Any));
    }

    if config.cors_origins.is_empty() {
        error!("No CORS origins configured and cors_permissive is false");
        return Err("cors_origins must be set unless cors_permissive is true".into());
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(cors.allow_origin(origins))
}
