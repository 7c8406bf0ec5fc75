use rusty_booking_ddd::{
    adapters::{
        SystemClock,
        postgres::{PostgresBookingStore, PostgresSpotDirectory, PostgresUserDirectory},
    },
    api::{handlers::AppState, router::create_router},
    application::booking::ServiceDependencies,
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_booking_ddd=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!(
        boundary_policy = config.policy.boundary.as_str(),
        allow_owner_self_booking = config.policy.allow_owner_self_booking,
        "Booking policy loaded"
    );

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Initialize adapters
    let booking_store = Arc::new(PostgresBookingStore::new(pool.clone()));
    let spot_directory = Arc::new(PostgresSpotDirectory::new(pool.clone()));
    let user_directory = Arc::new(PostgresUserDirectory::new(pool.clone()));

    // Create service dependencies
    let service_deps = ServiceDependencies {
        booking_store,
        spot_directory,
        user_directory,
        clock: Arc::new(SystemClock),
        policy: config.policy,
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
