//! Backend entry-point: wires REST endpoints, the WebSocket study session,
//! persistence, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::Trace;
use backend::domain::VocabularyService;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{auth, word_sets, words};
use backend::inbound::ws::{state::WsState, study_ws};
use backend::outbound::login::DigestLoginService;
use backend::outbound::persistence::{
    DbPool, DieselUserRepository, DieselWordRepository, DieselWordSetRepository, PoolConfig,
};
use backend::outbound::speech::TracingSpeechSynthesizer;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    run_migrations(database_url.clone()).await?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(std::io::Error::other)?;

    let vocabulary = Arc::new(VocabularyService::new(
        Arc::new(DieselWordRepository::new(pool.clone())),
        Arc::new(DieselWordSetRepository::new(pool.clone())),
    ));
    let login = Arc::new(DigestLoginService::new(Arc::new(
        DieselUserRepository::new(pool),
    )));
    let http_state = web::Data::new(HttpState::new(
        login,
        vocabulary.clone(),
        vocabulary.clone(),
    ));
    let ws_state = web::Data::new(WsState::new(
        vocabulary.clone(),
        vocabulary,
        Arc::new(TracingSpeechSynthesizer),
    ));

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        // The session wraps the whole app so the WebSocket upgrade sees the
        // cookie as well as the REST scope.
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let api = web::scope("/api/v1")
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(words::list_words)
            .service(words::ingest_words)
            .service(words::update_word)
            .service(words::delete_word)
            .service(word_sets::list_word_sets)
            .service(word_sets::create_word_set)
            .service(word_sets::rename_word_set)
            .service(word_sets::delete_word_set);

        let mut app = App::new()
            .app_data(http_state.clone())
            .app_data(ws_state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .wrap(session)
            .service(api)
            .service(study_ws)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(&bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Load the session signing key, falling back to an ephemeral key in
/// development builds.
fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Apply pending schema migrations on a blocking thread.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || -> Result<(), String> {
        let mut conn = PgConnection::establish(&database_url).map_err(|e| e.to_string())?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| e.to_string())?;
        Ok(())
    })
    .await
    .map_err(std::io::Error::other)?
    .map_err(std::io::Error::other)
}
