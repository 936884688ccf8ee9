use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Users
// ============================================================================

/// Persisted user record matching database column order exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "diesel", derive(diesel::Queryable))]
pub struct User {
    pub pk: String, // "USER#<sub>"
    pub sub: String,
    pub provider: String, // stored as VARCHAR: "google", "cognito"
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build the partition key a user is stored under.
    pub fn key_for(sub: &str) -> String {
        format!("USER#{}", sub)
    }
}

/// Identity provider a login went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Cognito,
}

impl Provider {
    pub fn as_str(&self) -> &str {
        match self {
            Provider::Google => "google",
            Provider::Cognito => "cognito",
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "cognito" => Ok(Provider::Cognito),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

// ============================================================================
// API responses
// ============================================================================

/// Profile of the signed-in user, as carried by the session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub verified_email: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

/// Body returned by the Cognito callback when configured to answer with JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenResponse {
    pub message: String,
    pub id_token: String,
}
