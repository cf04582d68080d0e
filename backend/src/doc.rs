//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the REST API. It
//! registers every HTTP endpoint from the inbound layer, the shared domain
//! schemas, and the session cookie security scheme. Swagger UI serves the
//! document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Vocabulary backend API",
        description = "HTTP interface for vocabulary management, bulk ingestion, and session-authenticated access."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::words::list_words,
        crate::inbound::http::words::ingest_words,
        crate::inbound::http::words::update_word,
        crate::inbound::http::words::delete_word,
        crate::inbound::http::word_sets::list_word_sets,
        crate::inbound::http::word_sets::create_word_set,
        crate::inbound::http::word_sets::rename_word_set,
        crate::inbound::http::word_sets::delete_word_set,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::User,
        crate::domain::Word,
        crate::domain::PopulatedWord,
        crate::domain::CandidateWord,
        crate::domain::WordSet,
        crate::inbound::http::auth::AuthRequest,
        crate::inbound::http::words::CandidateWordBody,
        crate::inbound::http::words::UpdateWordBody,
        crate::inbound::http::words::IngestOutcomeBody,
        crate::inbound::http::word_sets::WordSetNameBody,
        crate::inbound::http::word_sets::DeletedWordSetBody,
    )),
    tags(
        (name = "auth", description = "Registration and session login"),
        (name = "words", description = "Vocabulary entries and bulk ingestion"),
        (name = "word-sets", description = "Named collections of words"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
