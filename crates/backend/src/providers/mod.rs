//! Identity provider clients.

pub mod cognito;
pub mod google;

pub use cognito::CognitoClient;
pub use google::GoogleClient;
