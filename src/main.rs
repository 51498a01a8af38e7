//! Link feed backend - entry point
//!
//! All link operations are exposed via GraphQL at /graphql.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkfeed::cli::{Command, issue_user_token};
use linkfeed::config::Config;
use linkfeed::db::{CreateUser, Database};
use linkfeed::graphql::schema_sdl;
use linkfeed::{AppState, build_app};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let command = Command::from_args()?;

    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkfeed=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    if command == Command::PrintSchema {
        println!("{}", schema_sdl());
        return Ok(());
    }

    let config = Config::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    db.migrate().await?;
    tracing::info!(url = %config.database_url, "Database ready");

    match command {
        Command::AddUser { name, email } => {
            let user = db.users().create(CreateUser { name, email }).await?;
            tracing::info!(user_id = user.id, "User created");
            println!("{}", user.id);
            Ok(())
        }
        Command::AddVote { link_id, user_id } => {
            let added = db.votes().add(link_id, user_id).await?;
            tracing::info!(link_id, user_id, added, "Vote recorded");
            Ok(())
        }
        Command::IssueToken { user_id, ttl_hours } => {
            let token = issue_user_token(&db, &config.app_secret, user_id, ttl_hours).await?;
            println!("{}", token);
            Ok(())
        }
        _ => serve(config, db).await,
    }
}

async fn serve(config: Config, db: Database) -> Result<()> {
    let addr = config.bind_addr();
    let app = build_app(AppState::new(config, db));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}; GraphQL: http://{}/graphql", addr, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum::serve")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
