use std::env;
use std::path::Path;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acara_api::router::create_router;
use acara_api::state::AppState;
use acara_core::config::LayeredConfig;
use acara_core::geo::Boundary;
use acara_core::moderation::{ModerationService, WorkflowPolicy};
use acara_core::ports::EventStore;
use acara_store::{MemoryEventStore, PostgresConfig, PostgresEventStore};

/// Fallback boundary shipped with the binary: a simplified outline of the
/// Yogyakarta province.
const BUNDLED_BOUNDARY: &str = include_str!("../data/province-boundary.geojson");
const BUNDLED_BOUNDARY_NAME: &str = "Daerah Istimewa Yogyakarta";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "acara_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = LayeredConfig::with_defaults();
    if Path::new("acara.toml").exists() {
        config = match config.load_from_file("acara.toml") {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load acara.toml: {}", e);
                std::process::exit(1);
            }
        };
    }
    let config = config.load_from_env();

    let boundary = match &config.boundary_path.value {
        Some(path) => match Boundary::load("province", path) {
            Ok(boundary) => {
                tracing::info!(path = %path.display(), "Loaded province boundary");
                Arc::new(boundary)
            }
            Err(e) => {
                tracing::error!("Failed to load boundary from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("Using bundled province boundary (set ACARA_BOUNDARY to override)");
            Arc::new(
                Boundary::from_geojson_str(BUNDLED_BOUNDARY_NAME, BUNDLED_BOUNDARY)
                    .expect("bundled boundary is valid GeoJSON"),
            )
        }
    };

    // Storage backend selected by DATABASE_URL presence.
    let store: Arc<dyn EventStore> = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            match init_postgres_store(&database_url).await {
                Ok(store) => {
                    tracing::info!("Connected to PostgreSQL");
                    store
                }
                Err(e) => {
                    tracing::error!("Failed to connect to PostgreSQL: {}", e);
                    tracing::error!(
                        "Remediation:\n\
                        1. Ensure PostgreSQL is running\n\
                        2. Verify DATABASE_URL is correct\n\
                        3. Check that the database exists and is accessible"
                    );
                    std::process::exit(1);
                }
            }
        }
        Err(_) => {
            tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
            Arc::new(seeded_memory_store())
        }
    };

    let moderation = ModerationService::new(
        store.clone(),
        boundary.clone(),
        WorkflowPolicy { direct_takedown: config.direct_takedown.value },
    );

    let state = Arc::new(AppState::new(
        store,
        boundary,
        moderation,
        config.proximity_radius_km.value,
    ));

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port.value);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize PostgreSQL storage from a database URL
async fn init_postgres_store(database_url: &str) -> Result<Arc<dyn EventStore>, String> {
    let config = PostgresConfig::new(database_url)
        .map_err(|e| format!("Invalid DATABASE_URL: {}", e))?;

    PostgresEventStore::with_migrations(config)
        .await
        .map(|store| Arc::new(store) as Arc<dyn EventStore>)
        .map_err(|e| format!("Connection failed: {}", e))
}

/// In-memory store with the reference data submissions need.
fn seeded_memory_store() -> MemoryEventStore {
    let store = MemoryEventStore::new();
    for name in ["music", "art", "sport", "culinary", "exhibition"] {
        store.seed_category(name);
    }
    store.seed_organizer("Demo Organizer", "demo@acara.example");
    store
}
