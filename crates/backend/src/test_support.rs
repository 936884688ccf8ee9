//! Fixtures shared by unit tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use axum::{body::Body, http::header, response::Response};
use clap::Parser;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;

use crate::auth::types::{AuthUser, SessionConfig};
use crate::config::{CognitoCallbackMode, CognitoConfig, GoogleConfig, Settings};
use crate::providers::{CognitoClient, GoogleClient};
use crate::users::MemoryUserStore;
use crate::AppState;

pub const FIXTURE_RSA_PRIVATE_PEM: &str = include_str!("../fixtures/test-keys/rsa-private.pem");
pub const FIXTURE_WRONG_RSA_PRIVATE_PEM: &str =
    include_str!("../fixtures/test-keys/wrong-key-private.pem");
pub const FIXTURE_JWKS_JSON: &str = include_str!("../fixtures/test-keys/jwks.json");
pub const FIXTURE_KID: &str = "test-key-1";

const TEST_SECRET: &str = "test-secret-key-for-testing-only";

pub fn settings(extra: &[&str]) -> Settings {
    let mut argv = vec![
        "login-server",
        "--jwt-secret",
        TEST_SECRET,
        "--environment",
        "development",
        "--public-dir",
        "/nonexistent/login-server-public",
    ];
    argv.extend_from_slice(extra);
    Settings::try_parse_from(argv).expect("test settings should parse")
}

pub fn session_config() -> SessionConfig {
    SessionConfig {
        jwt_secret: TEST_SECRET.to_string(),
        cookie_name: "session".to_string(),
        ttl_secs: 300,
        secure: false,
    }
}

pub fn test_user() -> AuthUser {
    AuthUser {
        id: "1122334455".to_string(),
        email: "user@example.com".to_string(),
        name: Some("Test User".to_string()),
        picture: Some("https://img/p.png".to_string()),
        verified_email: Some(true),
    }
}

/// Google settings with every endpoint pointed at `base`.
pub fn google_config(base: &str) -> GoogleConfig {
    GoogleConfig {
        client_id: "google-client".to_string(),
        client_secret: "google-secret".to_string(),
        redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
        prompt: None,
        auth_url: format!("{}/o/oauth2/v2/auth", base),
        token_url: format!("{}/token", base),
        userinfo_url: format!("{}/userinfo", base),
        jwks_url: format!("{}/certs", base),
    }
}

/// Cognito settings with the Hosted UI domain at `domain`.
pub fn cognito_config(domain: &str) -> CognitoConfig {
    CognitoConfig {
        domain: domain.to_string(),
        client_id: "cognito-client".to_string(),
        client_secret: "cognito-secret".to_string(),
        app_base_url: "https://app.example.com".to_string(),
        scopes: "openid profile email phone".to_string(),
        callback_mode: CognitoCallbackMode::Cookie,
        issuer: None,
    }
}

/// App state with an in-memory user store, returned alongside for inspection.
pub fn test_state(
    google: Option<GoogleConfig>,
    cognito: Option<CognitoConfig>,
) -> (AppState, Arc<MemoryUserStore>) {
    let http = reqwest::Client::new();
    let users = Arc::new(MemoryUserStore::new());

    let state = AppState {
        settings: Arc::new(settings(&[])),
        session: Arc::new(session_config()),
        google: google.map(|config| Arc::new(GoogleClient::new(config, http.clone()))),
        cognito: cognito.map(|config| Arc::new(CognitoClient::new(config, http.clone()))),
        users: users.clone(),
    };

    (state, users)
}

/// ID token claims as a provider would issue them, valid for an hour.
pub fn id_token_claims(iss: &str, aud: &str, sub: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    serde_json::json!({
        "iss": iss,
        "aud": aud,
        "sub": sub,
        "email": "user@example.com",
        "email_verified": true,
        "name": "Test User",
        "iat": now,
        "exp": now + 3600,
    })
}

pub fn sign_id_token(claims: &Value, private_pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(FIXTURE_KID.to_string());
    let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("fixture key should load");
    encode(&header, claims, &key).expect("token should sign")
}

pub async fn body_json(response: Response) -> Value {
    let body: Body = response.into_body();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be json")
}

pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}

pub fn state_cookie_value(response: &Response) -> String {
    set_cookies(response)
        .iter()
        .find_map(|c| c.strip_prefix("oauth_state="))
        .and_then(|rest| rest.split(';').next())
        .expect("state cookie set")
        .to_string()
}

/// Log lines written by handlers running on the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(self.0.clone())
    }
}

pub struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
