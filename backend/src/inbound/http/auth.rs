//! Auth API handlers: registration and login.
//!
//! ```text
//! POST /auth/register {"email":"ada@example.com","username":"ada","password":"..."}
//! POST /auth/login    {"email":"ada@example.com","password":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{AccessToken, LoginCredentials, Registration};
use crate::domain::user::{Email, User, UserValidationError, Username};
use crate::domain::{ApiResult, Error};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Unique account email.
    pub email: String,
    /// Account name.
    pub username: String,
    /// Chosen password, transmitted once and stored only as a hash.
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Candidate password.
    pub password: String,
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let field = match &err {
        UserValidationError::InvalidId => "id",
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
        UserValidationError::EmptyUsername
        | UserValidationError::UsernameTooShort { .. }
        | UserValidationError::UsernameTooLong { .. }
        | UserValidationError::UsernameInvalidCharacters => "username",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn non_empty_password(password: String) -> Result<String, Error> {
    if password.trim().is_empty() {
        return Err(Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password" })));
    }
    Ok(password)
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: Email::new(value.email).map_err(map_user_validation_error)?,
            username: Username::new(value.username).map_err(map_user_validation_error)?,
            password: non_empty_password(value.password)?,
        })
    }
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: Email::new(value.email).map_err(map_user_validation_error)?,
            password: non_empty_password(value.password)?,
        })
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts().register(registration).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and receive a bearer credential.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AccessToken),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AccessToken>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let token = state.accounts().login(credentials).await?;
    Ok(web::Json(token))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{
        AccountsService, MockAccountsService, MockArticlesCommand, MockArticlesQuery,
        MockTokenService,
    };
    use crate::domain::user::UserId;
    use crate::inbound::http::state::HttpStatePorts;

    fn test_app(
        accounts: MockAccountsService,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = web::Data::new(HttpState::new(HttpStatePorts {
            articles_query: Arc::new(MockArticlesQuery::new()),
            articles_command: Arc::new(MockArticlesCommand::new()),
            accounts: Arc::new(accounts) as Arc<dyn AccountsService>,
            tokens: Arc::new(MockTokenService::new()),
        }));
        App::new().app_data(state).service(register).service(login)
    }

    fn registered_user() -> User {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().expect("valid date");
        User::new(
            UserId::random(),
            Email::new("ada@example.com").expect("valid email"),
            Username::new("ada_lovelace").expect("valid username"),
            created,
            created,
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn register_returns_created_user_without_credentials() {
        let user = registered_user();
        let returned = user.clone();
        let mut accounts = MockAccountsService::new();
        accounts
            .expect_register()
            .withf(|registration| registration.email.as_ref() == "ada@example.com")
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let app = test::init_service(test_app(accounts)).await;
        let request = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(RegisterRequest {
                email: "ada@example.com".into(),
                username: "ada_lovelace".into(),
                password: "correct horse battery staple".into(),
            })
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.get("email").and_then(Value::as_str),
            Some("ada@example.com")
        );
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
    }

    #[rstest]
    #[case("not-an-email", "ada_lovelace", "pw1234", "email")]
    #[case("ada@example.com", "a", "pw1234", "username")]
    #[case("ada@example.com", "ada_lovelace", "   ", "password")]
    #[actix_web::test]
    async fn register_rejects_invalid_fields(
        #[case] email: &str,
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let app = test::init_service(test_app(MockAccountsService::new())).await;
        let request = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(RegisterRequest {
                email: email.into(),
                username: username.into(),
                password: password.into(),
            })
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some(field)
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn register_surfaces_duplicate_email_as_conflict() {
        let mut accounts = MockAccountsService::new();
        accounts
            .expect_register()
            .times(1)
            .returning(|_| Err(Error::conflict("user with this email already exists")));

        let app = test::init_service(test_app(accounts)).await;
        let request = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(RegisterRequest {
                email: "ada@example.com".into(),
                username: "ada_lovelace".into(),
                password: "pw1234".into(),
            })
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_returns_access_token() {
        let mut accounts = MockAccountsService::new();
        accounts.expect_login().times(1).returning(|_| {
            Ok(AccessToken {
                access_token: "signed.jwt".to_owned(),
            })
        });

        let app = test::init_service(test_app(accounts)).await;
        let request = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(LoginRequest {
                email: "ada@example.com".into(),
                password: "pw1234".into(),
            })
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.get("access_token").and_then(Value::as_str),
            Some("signed.jwt")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn login_surfaces_invalid_credentials_as_unauthorised() {
        let mut accounts = MockAccountsService::new();
        accounts
            .expect_login()
            .times(1)
            .returning(|_| Err(Error::unauthorized("Invalid credentials")));

        let app = test::init_service(test_app(accounts)).await;
        let request = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(LoginRequest {
                email: "ada@example.com".into(),
                password: "wrong".into(),
            })
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Invalid credentials")
        );
    }
}
