mod browser;
mod config;
mod error;
mod models;
mod routes;
mod sessions;

use std::fs;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use browser::loader::{TreeSource, load_initial_tree};
use config::AppConfig;
use routes::register;
use sessions::SessionStore;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub sessions: SessionStore,
    pub max_upload_bytes: usize,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().expect("failed to load config");

    fs::create_dir_all(&config.log_dir).expect("failed to create log directory");
    let file_appender = rolling::never(&config.log_dir, "backend.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let _guard = guard;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("failed to init logging filter");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    let source = TreeSource::from_setting(config.tree_source.as_deref());
    let initial = load_initial_tree(&source, config.fetch_timeout).await;

    info!(
        host = %config.host,
        port = config.port,
        tree_source = %source,
        max_sessions = config.max_sessions,
        "starting Datahub backend"
    );

    let bind_addr = format!("{}:{}", config.host, config.port);
    let shared_state = web::Data::new(AppState {
        sessions: SessionStore::new(initial, config.default_theme, config.max_sessions),
        max_upload_bytes: config.max_upload_bytes,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(shared_state.clone())
            .configure(register)
    })
    .bind(bind_addr)?
    .run()
    .await
}
