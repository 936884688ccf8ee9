// Database models for Diesel
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::users::NewUser;

/// Insertable struct for new users
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserRow {
    pub pk: String,
    pub sub: String,
    pub provider: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&NewUser> for NewUserRow {
    fn from(user: &NewUser) -> Self {
        NewUserRow {
            pk: user.pk(),
            sub: user.sub.clone(),
            provider: user.provider.as_str().to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: Utc::now(),
        }
    }
}
