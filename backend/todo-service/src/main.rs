//! Todo Service Main Entry Point
//!
//! Starts gRPC server with:
//! - PostgreSQL connection pool (migrations applied at startup)
//! - Access gate in front of every service
//! - Auth, User and Todo services
use anyhow::{Context, Result};
use crypto_core::TokenCodec;
use grpc_jwt_propagation::{AccessGate, AccessGateLayer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use todo_service::{
    config::Settings,
    db::{PgCredentialVerifier, PgTodoRepository, PgUserRepository},
    grpc::pb::{
        auth_service_server::AuthServiceServer, todo_service_server::TodoServiceServer,
        user_service_server::UserServiceServer,
    },
    AuthServiceHandler, LoginFlow, TodoServiceHandler, UserServiceHandler, LOGIN_METHOD,
};
use tokio::signal;
use tonic::transport::Server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "todo_service=info,grpc_jwt_propagation=info,info".into()
        }))
        .with_target(false)
        .json()
        .init();

    info!("Starting Todo Service");

    let settings = Settings::load().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let codec = Arc::new(
        TokenCodec::new(&settings.auth.jwt_secret).context("Failed to initialize token codec")?,
    );

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&settings.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!(
        "Database pool initialized with {} max connections",
        settings.database.max_connections
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let login_flow = Arc::new(LoginFlow::new(
        Arc::new(PgCredentialVerifier::new(db_pool.clone())),
        codec.clone(),
        settings.auth.required_role.clone(),
    ));
    let gate = AccessGate::new(codec, settings.auth.required_role.clone(), LOGIN_METHOD);

    let auth_service = AuthServiceHandler::new(login_flow);
    let user_service = UserServiceHandler::new(Arc::new(PgUserRepository::new(db_pool.clone())));
    let todo_service = TodoServiceHandler::new(Arc::new(PgTodoRepository::new(db_pool)));

    let addr = settings
        .server
        .addr()
        .parse()
        .context("Invalid server address")?;

    info!(
        required_role = %settings.auth.required_role,
        "Starting gRPC server on {}", addr
    );

    Server::builder()
        .layer(AccessGateLayer::new(gate))
        .add_service(AuthServiceServer::new(auth_service))
        .add_service(UserServiceServer::new(user_service))
        .add_service(TodoServiceServer::new(todo_service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .context("gRPC server error")?;

    info!("Todo service shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
