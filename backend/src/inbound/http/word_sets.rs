//! Word sets API handlers.
//!
//! ```text
//! GET    /api/v1/word-sets
//! POST   /api/v1/word-sets      {"name":"animals"}
//! PUT    /api/v1/word-sets/{id} {"name":"renamed"}
//! DELETE /api/v1/word-sets/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    CreateWordSetRequest, DeleteWordSetRequest, ListWordSetsRequest, RenameWordSetRequest,
};
use crate::domain::{WordSet, WordSetId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Name body for set creation and renaming.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordSetNameBody {
    pub name: String,
}

/// Deletion outcome: the removed set and how many words went with it.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedWordSetBody {
    pub word_set: WordSet,
    pub words_removed: u64,
}

/// List the sets visible to the current user.
#[utoipa::path(
    get,
    path = "/api/v1/word-sets",
    responses(
        (status = 200, description = "Visible word sets", body = [WordSet]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["word-sets"],
    operation_id = "listWordSets"
)]
#[get("/word-sets")]
pub async fn list_word_sets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let response = state
        .query
        .list_word_sets(ListWordSetsRequest { user_id })
        .await?;
    Ok(HttpResponse::Ok().json(response.word_sets))
}

/// Create a set owned by the current user.
#[utoipa::path(
    post,
    path = "/api/v1/word-sets",
    request_body = WordSetNameBody,
    responses(
        (status = 201, description = "Created word set", body = WordSet),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 409, description = "Name already in use", body = crate::domain::Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["word-sets"],
    operation_id = "createWordSet"
)]
#[post("/word-sets")]
pub async fn create_word_set(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WordSetNameBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let word_set = state
        .command
        .create_word_set(CreateWordSetRequest {
            user_id,
            name: payload.into_inner().name,
        })
        .await?;
    Ok(HttpResponse::Created().json(word_set))
}

/// Rename one of the current user's sets.
#[utoipa::path(
    put,
    path = "/api/v1/word-sets/{id}",
    request_body = WordSetNameBody,
    responses(
        (status = 200, description = "Renamed word set", body = WordSet),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Default sets are read-only", body = crate::domain::Error),
        (status = 404, description = "Word set not found", body = crate::domain::Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["word-sets"],
    operation_id = "renameWordSet"
)]
#[put("/word-sets/{id}")]
pub async fn rename_word_set(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<WordSetNameBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let set_id = WordSetId::from_uuid(parse_uuid(&path.into_inner(), FieldName::WordSetId)?);

    let word_set = state
        .command
        .rename_word_set(RenameWordSetRequest {
            user_id,
            set_id,
            name: payload.into_inner().name,
        })
        .await?;
    Ok(HttpResponse::Ok().json(word_set))
}

/// Delete one of the current user's sets and their words in it.
#[utoipa::path(
    delete,
    path = "/api/v1/word-sets/{id}",
    responses(
        (status = 200, description = "Deleted word set", body = DeletedWordSetBody),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Default sets are read-only", body = crate::domain::Error),
        (status = 404, description = "Word set not found", body = crate::domain::Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["word-sets"],
    operation_id = "deleteWordSet"
)]
#[delete("/word-sets/{id}")]
pub async fn delete_word_set(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let set_id = WordSetId::from_uuid(parse_uuid(&path.into_inner(), FieldName::WordSetId)?);

    let response = state
        .command
        .delete_word_set(DeleteWordSetRequest { user_id, set_id })
        .await?;
    Ok(HttpResponse::Ok().json(DeletedWordSetBody {
        word_set: response.word_set,
        words_removed: response.words_removed,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{
        DeleteWordSetResponse, ListWordSetsResponse, MockLoginService, MockVocabularyCommand,
        MockVocabularyQuery, VocabularyCommand, VocabularyQuery,
    };
    use crate::domain::{Error, User, UserId};
    use crate::inbound::http::auth::{AuthRequest, login};

    fn fixture_user_id() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id")
    }

    fn fixture_set(name: &str) -> WordSet {
        let now = Utc::now();
        WordSet {
            id: WordSetId::random(),
            name: name.to_owned(),
            owner: Some(fixture_user_id()),
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_app(
        query: impl VocabularyQuery + 'static,
        command: impl VocabularyCommand + 'static,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let mut login_service = MockLoginService::new();
        login_service.expect_login().returning(|credentials| {
            Ok(User {
                id: fixture_user_id(),
                email: credentials.email,
                created_at: Utc::now(),
            })
        });
        let state = HttpState::new(Arc::new(login_service), Arc::new(query), Arc::new(command));
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(list_word_sets)
                    .service(create_word_set)
                    .service(rename_word_set)
                    .service(delete_word_set),
            )
    }

    async fn login_cookie<S, B>(app: &S) -> actix_web::cookie::Cookie<'static>
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
    {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(&AuthRequest {
                    email: "learner@example.com".into(),
                    password: "secret".into(),
                })
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn listing_requires_a_session() {
        let app = actix_test::init_service(test_app(
            MockVocabularyQuery::new(),
            MockVocabularyCommand::new(),
        ))
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/word-sets")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn listing_returns_visible_sets() {
        let mut query = MockVocabularyQuery::new();
        query
            .expect_list_word_sets()
            .withf(|request| request.user_id == fixture_user_id())
            .return_once(|_| {
                Ok(ListWordSetsResponse {
                    word_sets: vec![fixture_set("animals")],
                })
            });

        let app = actix_test::init_service(test_app(query, MockVocabularyCommand::new())).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/word-sets")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("response JSON");
        let first = &value.as_array().expect("array")[0];
        assert_eq!(first.get("name").and_then(Value::as_str), Some("animals"));
        assert_eq!(first.get("isDefault").and_then(Value::as_bool), Some(false));
    }

    #[actix_web::test]
    async fn creation_returns_created() {
        let mut command = MockVocabularyCommand::new();
        command
            .expect_create_word_set()
            .withf(|request| request.name == "animals")
            .return_once(|request| {
                let now = Utc::now();
                Ok(WordSet {
                    id: WordSetId::random(),
                    name: request.name,
                    owner: Some(request.user_id),
                    is_default: false,
                    created_at: now,
                    updated_at: now,
                })
            });

        let app = actix_test::init_service(test_app(MockVocabularyQuery::new(), command)).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/word-sets")
                .cookie(cookie)
                .set_json(json!({ "name": "animals" }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn duplicate_names_conflict() {
        let mut command = MockVocabularyCommand::new();
        command
            .expect_create_word_set()
            .return_once(|_| Err(Error::conflict("word set name already in use")));

        let app = actix_test::init_service(test_app(MockVocabularyQuery::new(), command)).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/word-sets")
                .cookie(cookie)
                .set_json(json!({ "name": "animals" }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[case(Error::forbidden("default sets are read-only"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("word set not found"), StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn renaming_maps_domain_failures(#[case] error: Error, #[case] expected: StatusCode) {
        let mut command = MockVocabularyCommand::new();
        command
            .expect_rename_word_set()
            .return_once(move |_| Err(error));

        let app = actix_test::init_service(test_app(MockVocabularyQuery::new(), command)).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/word-sets/{}", WordSetId::random()))
                .cookie(cookie)
                .set_json(json!({ "name": "renamed" }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), expected);
    }

    #[actix_web::test]
    async fn deletion_reports_the_cascade_count() {
        let removed = fixture_set("animals");
        let set_id = removed.id;

        let mut command = MockVocabularyCommand::new();
        command
            .expect_delete_word_set()
            .withf(move |request| request.set_id == set_id)
            .return_once(move |_| {
                Ok(DeleteWordSetResponse {
                    word_set: removed,
                    words_removed: 12,
                })
            });

        let app = actix_test::init_service(test_app(MockVocabularyQuery::new(), command)).await;
        let cookie = login_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/word-sets/{set_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("response JSON");
        assert_eq!(value.get("wordsRemoved").and_then(Value::as_u64), Some(12));
    }
}
