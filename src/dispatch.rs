use chrono::Utc;
use sqlx::PgPool;
use std::time;
use uuid::Uuid;

use crate::domain::{newsletter::Newsletter, subscriber::Subscriber};
use crate::errors::error_chain_fmt;
use crate::store::{
    newsletter_sends::insert_newsletter_sends, newsletters::get_newsletter,
    subscribers::list_active_subscribers,
};

#[derive(Debug)]
pub struct SendReport {
    pub sent_count: usize,
    pub newsletter_title: String,
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("Newsletter not found")]
    NewsletterNotFound,
    #[error("Newsletter must be published first")]
    NotPublished,
    #[error("No active subscribers found")]
    NoActiveSubscribers,
    #[error("No pro subscribers found for this premium newsletter")]
    NoProSubscribers,
    #[error("No subscribers found")]
    NoEligibleSubscribers,
    #[error("Failed to fetch the newsletter")]
    NewsletterQueryError(#[source] sqlx::Error),
    #[error("Failed to fetch subscribers")]
    SubscribersQueryError(#[source] sqlx::Error),
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Premium newsletters only go to active pro subscribers, any other newsletter goes to every active
/// subscriber.
pub fn eligible_subscribers<'a>(
    newsletter: &Newsletter,
    subscribers: &'a [Subscriber],
) -> Result<Vec<&'a Subscriber>, DispatchError> {
    let active: Vec<&Subscriber> = subscribers
        .iter()
        .filter(|subscriber| subscriber.is_active)
        .collect();

    if active.is_empty() {
        return Err(DispatchError::NoActiveSubscribers);
    }

    let eligible: Vec<&Subscriber> = if newsletter.is_premium {
        active
            .into_iter()
            .filter(|subscriber| subscriber.subscription_tier.is_pro())
            .collect()
    } else {
        active
    };

    if eligible.is_empty() {
        return Err(if newsletter.is_premium {
            DispatchError::NoProSubscribers
        } else {
            DispatchError::NoEligibleSubscribers
        });
    }

    Ok(eligible)
}

/// Records a send of a published newsletter to every eligible subscriber.
///
/// No email leaves the service: each delivery is a log line and the whole send waits `delay` to emulate
/// the latency of a mail provider. Failing to write the send records is logged but still reported as a
/// successful send, and every call records a new batch even for subscribers who already received it.
#[tracing::instrument(name = "Dispatch a newsletter to its subscribers", skip(db_pool, delay))]
pub async fn dispatch_newsletter(
    db_pool: &PgPool,
    newsletter_id: Uuid,
    delay: time::Duration,
) -> Result<SendReport, DispatchError> {
    let newsletter = get_newsletter(db_pool, newsletter_id)
        .await
        .map_err(DispatchError::NewsletterQueryError)?
        .ok_or(DispatchError::NewsletterNotFound)?;

    if newsletter.is_draft() {
        return Err(DispatchError::NotPublished);
    }

    let subscribers = list_active_subscribers(db_pool)
        .await
        .map_err(DispatchError::SubscribersQueryError)?;
    let eligible = eligible_subscribers(&newsletter, &subscribers)?;
    let subscriber_ids: Vec<Uuid> = eligible.iter().map(|subscriber| subscriber.id).collect();

    if let Err(err) =
        insert_newsletter_sends(db_pool, newsletter.id, &subscriber_ids, Utc::now()).await
    {
        tracing::error!("Error creating send records: {:?}", err);
    }

    tracing::info!(
        "Simulating email send to {} subscribers",
        eligible.len()
    );
    for subscriber in &eligible {
        tracing::info!(
            "Sending \"{}\" to {}",
            newsletter.title,
            subscriber.email.as_ref()
        );
    }

    tokio::time::sleep(delay).await;

    Ok(SendReport {
        sent_count: eligible.len(),
        newsletter_title: newsletter.title,
    })
}
