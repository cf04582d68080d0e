//! Words API handlers.
//!
//! ```text
//! GET    /api/v1/words?wordSet=<uuid>
//! POST   /api/v1/words        [{"english":"cat","vietnamese":"mèo","wordSet":"..."}]
//! PUT    /api/v1/words/{id}   {"remembered":true}
//! DELETE /api/v1/words/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    DeleteWordRequest, IngestWordsRequest, ListWordsRequest, UpdateWordRequest,
};
use crate::domain::{CandidateWord, Word, WordId, WordPatch, WordSetId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Query parameters for `GET /api/v1/words`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListWordsQuery {
    /// Optional set filter.
    pub word_set: Option<String>,
}

/// Candidate body for `POST /api/v1/words`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWordBody {
    pub english: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    pub vietnamese: String,
    pub word_set: String,
}

impl CandidateWordBody {
    fn into_domain(self) -> ApiResult<CandidateWord> {
        let word_set = parse_uuid(&self.word_set, FieldName::WordSetId)?;
        Ok(CandidateWord {
            english: self.english,
            phonetic: self.phonetic,
            type_tag: self.type_tag,
            vietnamese: self.vietnamese,
            word_set: WordSetId::from_uuid(word_set),
        })
    }
}

/// Patch body for `PUT /api/v1/words/{id}`. Absent fields are untouched.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWordBody {
    pub english: Option<String>,
    pub phonetic: Option<String>,
    #[serde(rename = "type")]
    pub type_tag: Option<String>,
    pub vietnamese: Option<String>,
    pub remembered: Option<bool>,
}

impl From<UpdateWordBody> for WordPatch {
    fn from(value: UpdateWordBody) -> Self {
        Self {
            english: value.english,
            phonetic: value.phonetic,
            type_tag: value.type_tag,
            vietnamese: value.vietnamese,
            remembered: value.remembered,
        }
    }
}

/// Bulk ingest outcome: persisted words plus rejected duplicates.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcomeBody {
    pub added: Vec<Word>,
    pub duplicated: Vec<CandidateWord>,
}

/// List the words visible to the current user.
#[utoipa::path(
    get,
    path = "/api/v1/words",
    params(ListWordsQuery),
    responses(
        (status = 200, description = "Visible words with their sets"),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["words"],
    operation_id = "listWords"
)]
#[get("/words")]
pub async fn list_words(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListWordsQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let word_set = match &query.word_set {
        Some(raw) => Some(WordSetId::from_uuid(parse_uuid(raw, FieldName::WordSetId)?)),
        None => None,
    };

    let response = state
        .query
        .list_words(ListWordsRequest { user_id, word_set })
        .await?;
    Ok(HttpResponse::Ok().json(response.words))
}

/// Bulk-ingest candidate words.
///
/// Returns `201` when at least one word was persisted and `200` when the
/// whole batch was deduplicated away.
#[utoipa::path(
    post,
    path = "/api/v1/words",
    request_body = Vec<CandidateWordBody>,
    responses(
        (status = 201, description = "Words added", body = IngestOutcomeBody),
        (status = 200, description = "Nothing new to add", body = IngestOutcomeBody),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Target set is read-only", body = crate::domain::Error),
        (status = 404, description = "Target set not found", body = crate::domain::Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["words"],
    operation_id = "ingestWords"
)]
#[post("/words")]
pub async fn ingest_words(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Vec<CandidateWordBody>>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let candidates = payload
        .into_inner()
        .into_iter()
        .map(CandidateWordBody::into_domain)
        .collect::<ApiResult<Vec<_>>>()?;

    let response = state
        .command
        .ingest_words(IngestWordsRequest {
            user_id,
            candidates,
        })
        .await?;

    let body = IngestOutcomeBody {
        added: response.added,
        duplicated: response.duplicated,
    };
    if body.added.is_empty() {
        Ok(HttpResponse::Ok().json(body))
    } else {
        Ok(HttpResponse::Created().json(body))
    }
}

/// Update one of the current user's words.
#[utoipa::path(
    put,
    path = "/api/v1/words/{id}",
    request_body = UpdateWordBody,
    responses(
        (status = 200, description = "Updated word", body = Word),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Word belongs to a default set", body = crate::domain::Error),
        (status = 404, description = "Word not found", body = crate::domain::Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["words"],
    operation_id = "updateWord"
)]
#[put("/words/{id}")]
pub async fn update_word(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateWordBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let word_id = WordId::from_uuid(parse_uuid(&path.into_inner(), FieldName::WordId)?);

    let word = state
        .command
        .update_word(UpdateWordRequest {
            user_id,
            word_id,
            patch: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Ok().json(word))
}

/// Delete one of the current user's words.
#[utoipa::path(
    delete,
    path = "/api/v1/words/{id}",
    responses(
        (status = 200, description = "Deleted word", body = Word),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Word belongs to a default set", body = crate::domain::Error),
        (status = 404, description = "Word not found", body = crate::domain::Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["words"],
    operation_id = "deleteWord"
)]
#[delete("/words/{id}")]
pub async fn delete_word(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let word_id = WordId::from_uuid(parse_uuid(&path.into_inner(), FieldName::WordId)?);

    let word = state
        .command
        .delete_word(DeleteWordRequest { user_id, word_id })
        .await?;
    Ok(HttpResponse::Ok().json(word))
}

#[cfg(test)]
#[path = "words_tests.rs"]
mod tests;
