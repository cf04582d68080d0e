//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"a@b.c","password":"secret"}
//! POST /api/v1/auth/login    {"email":"a@b.c","password":"secret"}
//! POST /api/v1/auth/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::Credentials;
use crate::domain::{Email, EmailValidationError, Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credential body for `POST /api/v1/auth/register` and `.../login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<AuthRequest> for Credentials {
    type Error = Error;

    fn try_from(value: AuthRequest) -> Result<Self, Self::Error> {
        let email = Email::new(value.email).map_err(map_email_validation_error)?;
        if value.password.is_empty() {
            return Err(Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password" })));
        }
        Ok(Self {
            email,
            password: value.password,
        })
    }
}

fn map_email_validation_error(err: EmailValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "email" }))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = AuthRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<AuthRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let user = state.login.register(credentials).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Login success", body = User, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AuthRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let user = state.login.login(credentials).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Ok().json(user))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Session ended"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::UserId;
    use crate::domain::ports::{
        FixtureVocabularyCommand, FixtureVocabularyQuery, LoginService, MockLoginService,
    };

    fn test_app(
        login_service: impl LoginService + 'static,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(
            Arc::new(login_service),
            Arc::new(FixtureVocabularyQuery),
            Arc::new(FixtureVocabularyCommand),
        );
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(register)
                    .service(login)
                    .service(logout),
            )
    }

    fn fixture_user() -> User {
        User {
            id: UserId::random(),
            email: Email::new("learner@example.com").expect("valid email"),
            created_at: chrono::Utc::now(),
        }
    }

    #[rstest]
    #[case("", "secret", "email")]
    #[case("no-at-sign", "secret", "email")]
    #[case("learner@example.com", "", "password")]
    #[actix_web::test]
    async fn register_rejects_invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let app = actix_test::init_service(test_app(MockLoginService::new())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(&AuthRequest {
                    email: email.into(),
                    password: password.into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        let details = value.get("details").expect("details present");
        assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
    }

    #[actix_web::test]
    async fn register_returns_created_user() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_register()
            .return_once(|credentials| {
                Ok(User {
                    id: UserId::random(),
                    email: credentials.email,
                    created_at: chrono::Utc::now(),
                })
            });
        let app = actix_test::init_service(test_app(login_service)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(&AuthRequest {
                    email: "learner@example.com".into(),
                    password: "secret".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("user payload");
        assert_eq!(
            value.get("email").and_then(Value::as_str),
            Some("learner@example.com")
        );
    }

    #[actix_web::test]
    async fn login_sets_the_session_cookie() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_login()
            .return_once(|_| Ok(fixture_user()));
        let app = actix_test::init_service(test_app(login_service)).await;

        let response = actix_test::call_service(
            &app,
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
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[actix_web::test]
    async fn login_propagates_unauthorised() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_login()
            .return_once(|_| Err(Error::unauthorized("invalid credentials")));
        let app = actix_test::init_service(test_app(login_service)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(&AuthRequest {
                    email: "learner@example.com".into(),
                    password: "wrong".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
