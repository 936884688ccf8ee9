//! Cognito Hosted UI login: redirect and callback.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use shared_types::{IdTokenResponse, Provider};

use crate::config::CognitoCallbackMode;
use crate::error::{ApiError, ApiResult};
use crate::handlers::found;
use crate::users::NewUser;
use crate::AppState;

use super::cookies::{append_cookie, id_token_cookie, removal_cookie};
use super::{csrf, AuthCallbackParams};

/// Redirect the user to the Cognito Hosted UI.
pub async fn cognito_login(State(state): State<AppState>) -> ApiResult<Response> {
    let cognito = state.cognito_client()?;

    let csrf_state = csrf::new_state();
    let auth_url = cognito.authorization_url(&csrf_state);
    tracing::info!("Redirecting user to Cognito Hosted UI at {}", cognito.config().domain);

    let mut response = found(&auth_url);
    append_cookie(
        &mut response,
        &csrf::state_cookie(&csrf_state, state.session.secure),
    );
    Ok(response)
}

/// Handle the Cognito callback.
///
/// The code is exchanged with the client secret; the resulting ID token is
/// handed to the browser as an `id_token` cookie or returned as JSON.
pub async fn cognito_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AuthCallbackParams>,
) -> Response {
    let mut response = match handle_callback_inner(&state, &headers, params).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };
    append_cookie(&mut response, &removal_cookie(csrf::STATE_COOKIE));
    response
}

async fn handle_callback_inner(
    state: &AppState,
    headers: &HeaderMap,
    params: AuthCallbackParams,
) -> Result<Response, ApiError> {
    if let Some(error) = params.error {
        return Err(ApiError::AuthorizationDenied(error));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Authorization code not found."))?;

    csrf::verify_state(headers, params.state.as_deref())?;

    let cognito = state.cognito_client()?;
    let failed = |e| ApiError::provider("Authentication failed.", e);

    let tokens = cognito.exchange_code(&code).await.map_err(failed)?;

    if let Some(claims) = cognito.verify_id_token(&tokens.id_token).await.map_err(failed)? {
        tracing::info!("OAuth login from Cognito user {}", claims.sub);
        state
            .users
            .get_or_create(NewUser {
                sub: claims.sub,
                provider: Provider::Cognito,
                email: claims.email,
                name: claims.name,
            })
            .await?;
    }

    let response = match cognito.config().callback_mode {
        CognitoCallbackMode::Cookie => {
            let dashboard = cognito.config().dashboard_url();
            let mut response = found(&dashboard);
            append_cookie(
                &mut response,
                &id_token_cookie(tokens.id_token, state.session.secure),
            );
            tracing::info!("Cognito login complete, redirecting to {}", dashboard);
            response
        }
        CognitoCallbackMode::Json => Json(IdTokenResponse {
            message: "Authentication successful!".to_string(),
            id_token: tokens.id_token,
        })
        .into_response(),
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use crate::build_router;
    use crate::config::CognitoCallbackMode;
    use crate::test_support::{
        body_json, cognito_config, id_token_claims, set_cookies, sign_id_token,
        state_cookie_value, test_state, CapturedLogs, FIXTURE_JWKS_JSON, FIXTURE_RSA_PRIVATE_PEM,
    };
    use crate::users::UserStore;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn callback(query: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/auth/callback?{}", query))
            .header(header::COOKIE, "oauth_state=s1")
            .body(Body::empty())
            .unwrap()
    }

    async fn token_endpoint(server: &mut mockito::ServerGuard, id_token: &str) {
        server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "id_token": id_token,
                    "access_token": "at",
                    "refresh_token": "rt",
                    "expires_in": 3600,
                    "token_type": "Bearer"
                })
                .to_string(),
            )
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn test_login_does_not_log_state() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let (state, _users) = test_state(None, Some(cognito_config("https://auth.test")));

        let response = build_router(state)
            .oneshot(Request::builder().uri("/auth/cognito").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let value = state_cookie_value(&response);
        let output = logs.contents();
        assert!(output.contains("Redirecting user to Cognito Hosted UI"));
        assert!(!output.contains(&value));
    }

    #[tokio::test]
    async fn test_login_redirects_to_hosted_ui() {
        let (state, _users) = test_state(None, Some(cognito_config("https://demo.auth.test")));
        let response = build_router(state)
            .oneshot(Request::builder().uri("/auth/cognito").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://demo.auth.test/oauth2/authorize?"));
        assert!(set_cookies(&response)
            .iter()
            .any(|c| c.starts_with("oauth_state=")));
    }

    #[tokio::test]
    async fn test_google_routes_absent_when_only_cognito_configured() {
        let (state, _users) = test_state(None, Some(cognito_config("https://demo.auth.test")));
        let response = build_router(state)
            .oneshot(Request::builder().uri("/auth/google").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_code() {
        let (state, _users) = test_state(None, Some(cognito_config("https://demo.auth.test")));
        let response = build_router(state).oneshot(callback("state=s1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Authorization code not found.");
    }

    #[tokio::test]
    async fn test_cookie_mode_sets_raw_id_token_and_redirects() {
        let mut server = mockito::Server::new_async().await;
        token_endpoint(&mut server, "raw.id.token").await;

        let (state, users) = test_state(None, Some(cognito_config(&server.url())));
        let response = build_router(state)
            .oneshot(callback("code=c&state=s1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://app.example.com/dashboard"
        );
        let cookies = set_cookies(&response);
        let id_cookie = cookies
            .iter()
            .find(|c| c.starts_with("id_token=raw.id.token"))
            .expect("id_token cookie");
        assert!(id_cookie.contains("HttpOnly"));
        assert!(id_cookie.contains("Max-Age=3600"));

        // Unverified tokens are passed through without recording a user.
        assert_eq!(users.len().await, 0);
    }

    #[tokio::test]
    async fn test_json_mode_returns_id_token() {
        let mut server = mockito::Server::new_async().await;
        token_endpoint(&mut server, "raw.id.token").await;

        let mut config = cognito_config(&server.url());
        config.callback_mode = CognitoCallbackMode::Json;
        let (state, _users) = test_state(None, Some(config));
        let response = build_router(state)
            .oneshot(callback("code=c&state=s1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Authentication successful!");
        assert_eq!(body["id_token"], "raw.id.token");
    }

    #[tokio::test]
    async fn test_exchange_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async()
            .await;

        let (state, _users) = test_state(None, Some(cognito_config(&server.url())));
        let response = build_router(state)
            .oneshot(callback("code=c&state=s1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Authentication failed.");
        assert_eq!(body["details"]["error"], "invalid_client");
    }

    #[tokio::test]
    async fn test_verified_login_records_user() {
        let mut server = mockito::Server::new_async().await;
        let issuer = format!("{}/pool", server.url());
        server
            .mock("GET", "/pool/.well-known/jwks.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(FIXTURE_JWKS_JSON)
            .create_async()
            .await;
        let id_token = sign_id_token(
            &id_token_claims(&issuer, "cognito-client", "c0ffee"),
            FIXTURE_RSA_PRIVATE_PEM,
        );
        token_endpoint(&mut server, &id_token).await;

        let mut config = cognito_config(&server.url());
        config.issuer = Some(issuer);
        let (state, users) = test_state(None, Some(config));
        let response = build_router(state)
            .oneshot(callback("code=c&state=s1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let user = users.get("USER#c0ffee").await.unwrap().expect("recorded");
        assert_eq!(user.provider, "cognito");
        assert_eq!(user.email.as_deref(), Some("user@example.com"));
    }

    #[tokio::test]
    async fn test_forged_token_rejected_when_issuer_configured() {
        let mut server = mockito::Server::new_async().await;
        let issuer = format!("{}/pool", server.url());
        server
            .mock("GET", "/pool/.well-known/jwks.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(FIXTURE_JWKS_JSON)
            .create_async()
            .await;
        token_endpoint(&mut server, "not.a.jwt").await;

        let mut config = cognito_config(&server.url());
        config.issuer = Some(issuer);
        let (state, _users) = test_state(None, Some(config));
        let response = build_router(state)
            .oneshot(callback("code=c&state=s1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!set_cookies(&response)
            .iter()
            .any(|c| c.starts_with("id_token=")));
    }
}
