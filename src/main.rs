// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use quiz_backend::config::Config;
use quiz_backend::error::AppError;
use quiz_backend::models::user::{NewUser, Role};
use quiz_backend::repositories::{IdentityStore, MemoryStore, PgStore};
use quiz_backend::routes;
use quiz_backend::state::AppState;
use quiz_backend::utils::hash::hash_password_async;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let state = match config.database_url.as_deref() {
        Some(database_url) => {
            let store = connect_postgres(database_url).await;
            AppState::new(Arc::new(store), config.clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store. Data is lost on exit.");
            AppState::new(Arc::new(MemoryStore::new()), config.clone())
        }
    };

    // Seed Admin User
    if let Err(e) = seed_admin_user(state.identities.as_ref(), &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}

/// Connects with retry, then applies migrations.
async fn connect_postgres(database_url: &str) -> PgStore {
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    let store = PgStore::new(pool);

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    store
        .migrate()
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    store
}

async fn seed_admin_user(identities: &dyn IdentityStore, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    if identities.find_by_email(&email, Role::Admin).await?.is_none() {
        tracing::info!("Seeding admin user: {}", email);
        let hashed_password = hash_password_async(password.clone()).await?;

        identities
            .insert(NewUser {
                name: config.admin_name.clone().unwrap_or_else(|| "Admin".to_string()),
                email,
                password: hashed_password,
                role: Role::Admin,
            })
            .await?;
        tracing::info!("Admin user created successfully.");
    }
    Ok(())
}
