use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use jobtrack_api::config::ApiConfig;
use jobtrack_api::database::{users, Database};
use jobtrack_api::engine::{JobListing, StatsAggregator};
use jobtrack_api::helpers;
use jobtrack_api::storage::{JobStore, SqliteJobStore};

#[get("/health")]
async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    let connected = match db.async_connection.lock().await {
        Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
        Err(_) => false,
    };

    if connected {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        }))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, global = true)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Create a user and print its API token
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Read-only demo account
        #[arg(long)]
        test_user: bool,
    },
    /// Load jobs from a JSON file into a user's collection
    Seed {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
        /// Owner of the seeded jobs; created if missing
        #[arg(long)]
        email: String,
    },
}

fn init_tracing(log_file_path: Option<String>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("jobtrack-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path);

    let (config, config_path) = ApiConfig::load().context("Failed to load config")?;
    tracing::debug!("Loaded config from {:?}", config_path);

    let db = helpers::database::initialize_database(config.database_path())
        .context("Failed to initialize database")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db.clone()).await?,
        Command::AddUser {
            name,
            email,
            test_user,
        } => {
            let user = users::create_user(db.async_connection.clone(), &name, &email, test_user)
                .await?;
            println!("Created user {} <{}>", user.id, user.email);
            println!("API token: {}", user.api_token);
        }
        Command::Seed { file, email } => {
            let user =
                users::get_or_create_user(db.async_connection.clone(), &email, &email, false)
                    .await?;
            let count =
                helpers::seed::seed_jobs(db.async_connection.clone(), user.id, &file).await?;
            println!("Added {} jobs for {}", count, user.email);
        }
    }

    db.close().await
}

async fn serve(config: ApiConfig, db: Arc<Database>) -> anyhow::Result<()> {
    let server_config = config.server();
    tracing::info!(
        "Server will listen on {}:{}",
        server_config.host,
        server_config.port
    );

    // One store shared by both engine components
    let store: Arc<dyn JobStore> = Arc::new(SqliteJobStore::new(db.async_connection.clone()));
    let listing = Arc::new(JobListing::new(store.clone()));
    let aggregator = Arc::new(StatsAggregator::new(store));

    let cors_config = config.cors.clone();
    let server = HttpServer::new(move || {
        let cors = if let Some(cors_config) = &cors_config {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::new("%r %s %Dms"))
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(listing.clone()))
            .app_data(web::Data::new(aggregator.clone()))
            .service(health)
            .configure(jobtrack_api::handlers::configure_routes)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await?;
    Ok(())
}
