use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::subscription_tier::SubscriptionTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    Subscriber,
    Admin,
}

impl ProfileRole {
    pub fn parse(role: String) -> Result<ProfileRole, String> {
        match role.as_str() {
            "subscriber" => Ok(ProfileRole::Subscriber),
            "admin" => Ok(ProfileRole::Admin),
            _ => Err(format!("{} is not a valid profile role", role)),
        }
    }
}

impl AsRef<str> for ProfileRole {
    fn as_ref(&self) -> &str {
        match self {
            ProfileRole::Subscriber => "subscriber",
            ProfileRole::Admin => "admin",
        }
    }
}

/// Dashboard user profile. Its id is the auth provider user id.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: ProfileRole,
    pub subscription_tier: SubscriptionTier,
    pub created_at: DateTime<Utc>,
}
