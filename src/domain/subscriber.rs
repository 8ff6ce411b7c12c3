use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscription_tier::SubscriptionTier;

/// A row of the `subscribers` table. Names are stored as typed in, so they are kept as plain strings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub name: Option<String>,
    pub subscription_tier: SubscriptionTier,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
