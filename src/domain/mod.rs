pub mod new_subscriber;
pub mod newsletter;
pub mod profile;
pub mod subscriber;
pub mod subscriber_email;
pub mod subscriber_filter;
pub mod subscriber_name;
pub mod subscription_tier;
